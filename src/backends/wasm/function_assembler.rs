//! Function Assembler
//!
//! Builds one function's signature and locals, lowers its body and registers the
//! result on the module builder under `module_name + function_name`.

use crate::backends::wasm::error::WasmGenerationError;
use crate::backends::wasm::instruction_lowerer::InstructionLowerer;
use crate::backends::wasm::machine_ir::MachineNode;
use crate::backends::wasm::module_builder::WasmModuleBuilder;
use crate::backends::wasm::type_mapper::{map_type, map_value_slot};
use crate::codegen_log;
use crate::compiler_frontend::compiler_messages::compiler_errors::{CompilerError, ErrorMetaDataKey};
use crate::compiler_frontend::typed_ir::nodes::Function;
use wasm_encoder::ValType;

/// The registration key of a function. No separator is inserted.
pub fn qualified_name(module_name: &str, function_name: &str) -> String {
    format!("{module_name}{function_name}")
}

/// Assemble a function and register it on the builder, returning its function index.
///
/// Nothing is registered if any part of the function fails.
pub fn assemble_function(
    function: &Function,
    module_name: &str,
    builder: &mut WasmModuleBuilder,
) -> Result<u32, CompilerError> {
    let name = qualified_name(module_name, &function.name);
    codegen_log!(format!("[WASM] Assembling function {name}"));

    let parts = match build_function_parts(function) {
        Ok(parts) => parts,
        Err(e) => {
            codegen_log!(format!("[WASM] Function {name} failed: {e:?}"));
            return Err(e
                .to_compiler_error()
                .with_metadata(ErrorMetaDataKey::FunctionName, name));
        }
    };

    Ok(builder.add_function(
        name,
        parts.params,
        parts.results,
        parts.locals,
        parts.body,
    ))
}

struct FunctionParts {
    params: Vec<ValType>,
    results: Vec<ValType>,
    locals: Vec<ValType>,
    body: MachineNode,
}

// Parameters, return type, body, then locals
fn build_function_parts(function: &Function) -> Result<FunctionParts, WasmGenerationError> {
    let params = function
        .params
        .iter()
        .map(|param| map_value_slot(*param, "function parameter"))
        .collect::<Result<Vec<_>, _>>()?;

    // A function returning Never has no result values
    let results: Vec<ValType> = map_type(function.return_type)?
        .to_val_type()
        .into_iter()
        .collect();

    let mut lowerer = InstructionLowerer::new();
    let body = lowerer.lower(&function.body)?;
    if !lowerer.is_balanced() {
        return Err(WasmGenerationError::unreachable(
            "control flow frames left open after lowering a function body",
        ));
    }

    let locals = function
        .locals
        .iter()
        .map(|local| map_value_slot(*local, "local slot"))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FunctionParts {
        params,
        results,
        locals,
        body,
    })
}

#[cfg(test)]
#[path = "tests/function_assembler_tests.rs"]
mod tests;
