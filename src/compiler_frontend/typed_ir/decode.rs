//! Typed IR decoding
//!
//! Front ends running out of process hand their modules over as JSON. Decoding goes
//! straight into the typed node enums, so a missing field or a wrong literal type is
//! caught here instead of halfway through lowering.

use crate::backends::wasm::error::WasmGenerationError;
use crate::compiler_frontend::compiler_messages::compiler_errors::CompilerError;
use crate::compiler_frontend::typed_ir::nodes::Module;

/// Decode an array of modules.
pub fn modules_from_json(source: &str) -> Result<Vec<Module>, CompilerError> {
    serde_json::from_str::<Vec<Module>>(source).map_err(|e| decode_error(&e))
}

/// Decode a single module.
pub fn module_from_json(source: &str) -> Result<Module, CompilerError> {
    serde_json::from_str::<Module>(source).map_err(|e| decode_error(&e))
}

pub fn modules_to_json(modules: &[Module]) -> Result<String, CompilerError> {
    serde_json::to_string_pretty(modules).map_err(|e| decode_error(&e))
}

fn decode_error(error: &serde_json::Error) -> CompilerError {
    WasmGenerationError::type_mismatch(
        "a well-formed typed IR document",
        format!("{error} (line {}, column {})", error.line(), error.column()),
        "typed IR decoding",
    )
    .to_compiler_error()
}

#[cfg(test)]
#[path = "tests/decode_tests.rs"]
mod tests;
