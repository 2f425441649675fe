//! WASM Module Validation
//!
//! Optional post-emission check using wasmparser. Lowering only checks the local shape
//! of each instruction, so an ill-typed tree from the front end (say an i32 add over f64
//! operands) still emits. Running the validator turns that into an error instead of
//! handing invalid bytes to a runtime.

use crate::backends::wasm::error::WasmGenerationError;
use rustc_hash::FxHashMap;

pub struct WasmValidator {
    /// Mapping from function indices to their names for better error reporting
    function_names: FxHashMap<u32, String>,
    /// Current validation context for error reporting
    current_context: String,
}

impl WasmValidator {
    pub fn new() -> Self {
        WasmValidator {
            function_names: FxHashMap::default(),
            current_context: "WASM module".to_string(),
        }
    }

    /// Set function names so errors can point at a function instead of an offset.
    pub fn set_function_names(&mut self, names: FxHashMap<u32, String>) {
        self.function_names = names;
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.current_context = context.into();
    }

    /// Validate a complete WASM module.
    ///
    /// A module the backend emitted but wasmparser rejects means an upstream
    /// contract was broken, so failures are reported as Unreachable.
    pub fn validate_module(&self, wasm_bytes: &[u8]) -> Result<(), WasmGenerationError> {
        match wasmparser::validate(wasm_bytes) {
            Ok(_) => Ok(()),
            Err(e) => Err(self.describe_error(&e, wasm_bytes)),
        }
    }

    fn describe_error(
        &self,
        error: &wasmparser::BinaryReaderError,
        wasm_bytes: &[u8],
    ) -> WasmGenerationError {
        let location = match self.function_at_offset(wasm_bytes, error.offset()) {
            Some(name) => format!(" in function '{name}'"),
            None => String::new(),
        };

        WasmGenerationError::unreachable(format!(
            "{} failed validation{location}: {} (at offset {})",
            self.current_context,
            error.message(),
            error.offset()
        ))
    }

    /// Find the defined function whose body contains `offset`.
    fn function_at_offset(&self, wasm_bytes: &[u8], offset: usize) -> Option<&str> {
        let mut function_index = 0u32;

        for payload in wasmparser::Parser::new(0).parse_all(wasm_bytes) {
            let Ok(payload) = payload else {
                return None;
            };

            if let wasmparser::Payload::CodeSectionEntry(body) = payload {
                if body.range().contains(&offset) {
                    return self.function_names.get(&function_index).map(String::as_str);
                }
                function_index += 1;
            }
        }

        None
    }
}

impl Default for WasmValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a WASM module with error reporting in one step.
pub fn validate_wasm_module(
    wasm_bytes: &[u8],
    context: &str,
    function_names: FxHashMap<u32, String>,
) -> Result<(), WasmGenerationError> {
    let mut validator = WasmValidator::new();
    validator.set_context(context);
    validator.set_function_names(function_names);
    validator.validate_module(wasm_bytes)
}

#[cfg(test)]
#[path = "tests/validator_tests.rs"]
mod tests;
