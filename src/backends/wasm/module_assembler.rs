//! Module Assembler
//!
//! Drives the function assembler over a module's functions in declaration order.
//! Order only decides function indices, never execution semantics.

use crate::backends::wasm::function_assembler::assemble_function;
use crate::backends::wasm::module_builder::WasmModuleBuilder;
use crate::codegen_log;
use crate::compiler_frontend::compiler_messages::compiler_errors::CompilerError;
use crate::compiler_frontend::typed_ir::nodes::Module;

/// Assemble every function of `module` onto the builder.
///
/// Stops at the first failing function. The caller must then discard the builder,
/// which may already hold the functions registered before the failure.
pub fn assemble_module(module: &Module, builder: &mut WasmModuleBuilder) -> Result<(), CompilerError> {
    codegen_log!(format!(
        "[WASM] Assembling module {} ({} functions)",
        module.name,
        module.functions.len()
    ));

    for function in &module.functions {
        assemble_function(function, &module.name, builder)?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/module_assembler_tests.rs"]
mod tests;
