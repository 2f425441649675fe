//! WASM Codegen Encoder
//!
//! The entry point of the backend. One generation request owns one module builder:
//!
//! 1. Assemble every module (lower each function body and register it)
//! 2. Optionally print the module dump
//! 3. Emit the builder into bytes
//! 4. Optionally validate the bytes with wasmparser
//!
//! The first failure anywhere aborts the request and no bytes are returned.

use crate::backends::wasm::emitter::emit;
use crate::backends::wasm::module_assembler::assemble_module;
use crate::backends::wasm::module_builder::WasmModuleBuilder;
use crate::backends::wasm::validator::validate_wasm_module;
use crate::compiler_frontend::compiler_messages::compiler_errors::CompilerError;
use crate::compiler_frontend::typed_ir::decode::modules_from_json;
use crate::compiler_frontend::typed_ir::nodes::Module;
use crate::settings::CodegenConfig;
use crate::{codegen_log, timer_log};
use rustc_hash::FxHashMap;
use std::time::Instant;

/// Generate one WASM binary containing every function of every module.
pub fn generate_wasm(modules: &[Module], config: &CodegenConfig) -> Result<Vec<u8>, CompilerError> {
    let _time = Instant::now();

    let mut builder = WasmModuleBuilder::new();
    for module in modules {
        codegen_log!(crate::compiler_frontend::typed_ir::display::display_module(module));
        assemble_module(module, &mut builder)?;
    }

    timer_log!(_time, "Modules assembled in: ");

    if config.print_module {
        builder.print();
    }

    // Names have to be collected before the builder is consumed
    let function_names: FxHashMap<u32, String> = if config.validate_output {
        builder
            .function_names()
            .enumerate()
            .map(|(index, name)| (index as u32, name.to_owned()))
            .collect()
    } else {
        FxHashMap::default()
    };

    let _time = Instant::now();
    let wasm_bytes = emit(builder, config);
    timer_log!(_time, "WASM emitted in: ");

    if config.validate_output {
        validate_wasm_module(&wasm_bytes, "Generated WASM module", function_names)
            .map_err(|e| e.to_compiler_error())?;
    }

    Ok(wasm_bytes)
}

/// Generate WASM for a single module.
pub fn generate_module_wasm(module: &Module, config: &CodegenConfig) -> Result<Vec<u8>, CompilerError> {
    generate_wasm(std::slice::from_ref(module), config)
}

/// Decode a JSON array of modules and generate WASM for them.
pub fn generate_wasm_from_json(source: &str, config: &CodegenConfig) -> Result<Vec<u8>, CompilerError> {
    let modules = modules_from_json(source)?;
    generate_wasm(&modules, config)
}

#[cfg(test)]
#[path = "tests/encode_tests.rs"]
mod tests;
