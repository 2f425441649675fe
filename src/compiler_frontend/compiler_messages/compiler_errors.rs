use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum ErrorMetaDataKey {
    CompilationStage,
    FunctionName,
    InstructionKind,
    Label,

    // Optional suggestion
    PrimarySuggestion,

    // Data type information
    ExpectedType,
    FoundType,
}

/// The single structured error a generation request surfaces to its caller.
/// The first failure anywhere aborts the request, so there is never more than one.
#[derive(Debug, Clone)]
pub struct CompilerError {
    pub msg: String,
    pub error_type: ErrorType,

    // Structured context for tooling, kept separate from the display message
    pub metadata: HashMap<ErrorMetaDataKey, String>,
}

impl CompilerError {
    pub fn new(msg: impl Into<String>, error_type: ErrorType) -> CompilerError {
        CompilerError {
            msg: msg.into(),
            error_type,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: ErrorMetaDataKey, value: impl Into<String>) -> Self {
        self.metadata.insert(key, value.into());
        self
    }

    pub fn new_metadata_entry(&mut self, key: ErrorMetaDataKey, value: impl Into<String>) {
        self.metadata.insert(key, value.into());
    }

    pub fn get_metadata(&self, key: ErrorMetaDataKey) -> Option<&str> {
        self.metadata.get(&key).map(String::as_str)
    }

    /// Create a malformed config error
    pub fn new_config_error(msg: impl Into<String>) -> Self {
        CompilerError {
            msg: msg.into(),
            error_type: ErrorType::Config,
            metadata: HashMap::new(),
        }
    }
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", error_type_to_str(&self.error_type), self.msg)?;
        if let Some(function_name) = self.get_metadata(ErrorMetaDataKey::FunctionName) {
            write!(f, " (in function '{function_name}')")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompilerError {}

// The four lowering failure kinds plus config loading.
// None of them are recoverable within a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    NotFound,
    NotImplemented,
    TypeMismatch,
    Unreachable,
    Config,
}

pub fn error_type_to_str(e_type: &ErrorType) -> &'static str {
    match e_type {
        ErrorType::NotFound => "Expected function or field not found",
        ErrorType::NotImplemented => "An operation is not implemented",
        ErrorType::TypeMismatch => "Type mismatch occurred in instruction",
        ErrorType::Unreachable => "This should not be reached",
        ErrorType::Config => "Malformed Config",
    }
}

/// Returns a new CompilerError for a malformed codegen config.
///
/// Usage:
/// `return_config_error!("message")` or `return_config_error!("Unknown key '{}'", key)`;
#[macro_export]
macro_rules! return_config_error {
    ($fmt:expr, $($arg:expr),+ $(,)?) => {
        return Err($crate::compiler_frontend::compiler_messages::compiler_errors::CompilerError::new_config_error(
            format!($fmt, $($arg),+),
        ))
    };
    ($msg:expr) => {
        return Err($crate::compiler_frontend::compiler_messages::compiler_errors::CompilerError::new_config_error(
            $msg,
        ))
    };
}
