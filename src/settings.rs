use crate::compiler_frontend::compiler_messages::compiler_errors::CompilerError;
use crate::return_config_error;
use serde::{Deserialize, Serialize};

/// Options for one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodegenConfig {
    /// Write a "name" custom section mapping function indices to qualified names
    pub emit_name_section: bool,

    /// Export every function under its qualified name.
    /// Duplicate qualified names make the module invalid when this is on.
    pub export_functions: bool,

    /// Run wasmparser over the emitted bytes before returning them
    pub validate_output: bool,

    /// Print the module dump right before emission
    pub print_module: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        CodegenConfig {
            emit_name_section: true,
            export_functions: false,
            validate_output: false,
            print_module: false,
        }
    }
}

impl CodegenConfig {
    /// Parse a config from TOML. Missing keys keep their default values.
    pub fn from_toml_str(source: &str) -> Result<Self, CompilerError> {
        match toml::from_str::<CodegenConfig>(source) {
            Ok(config) => Ok(config),
            Err(e) => return_config_error!("Could not parse codegen config: {}", e),
        }
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
