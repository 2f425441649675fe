//! WASM Generation Error Types
//!
//! The closed set of failures the lowering core can produce. Every lowering function
//! returns `Result<_, WasmGenerationError>` and the first error short-circuits the
//! whole walk with `?`. Errors carry structured context and are only turned into a
//! display message when converted into a `CompilerError` at the function boundary,
//! where the assembler also attaches the qualified function name.

use crate::compiler_frontend::compiler_messages::compiler_errors::{
    CompilerError, ErrorMetaDataKey, ErrorType,
};
use crate::compiler_frontend::typed_ir::nodes::{MathOp, ValueType};

#[derive(Debug, Clone, PartialEq)]
pub enum WasmGenerationError {
    /// Something the instruction refers to does not exist, such as a break label
    /// with no enclosing block of that name.
    NotFound {
        /// What was looked up
        item: String,
        /// Where the lookup happened
        context: String,
    },

    /// An instruction kind the front end knows about but the backend cannot lower yet.
    NotImplemented {
        /// The offending instruction kind
        instruction: &'static str,
    },

    /// A value type with no machine mapping, or malformed literal/signature data.
    TypeMismatch {
        expected: String,
        found: String,
        context: String,
    },

    /// An internal invariant was violated. Never expected for valid input.
    Unreachable {
        context: String,
        /// The operator/type pair outside the supported table, when that is the cause
        operation: Option<(MathOp, ValueType)>,
    },
}

impl WasmGenerationError {
    pub fn not_found(item: impl Into<String>, context: impl Into<String>) -> Self {
        WasmGenerationError::NotFound {
            item: item.into(),
            context: context.into(),
        }
    }

    pub fn not_implemented(instruction: &'static str) -> Self {
        WasmGenerationError::NotImplemented { instruction }
    }

    pub fn type_mismatch(
        expected: impl Into<String>,
        found: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        WasmGenerationError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
            context: context.into(),
        }
    }

    pub fn unreachable(context: impl Into<String>) -> Self {
        WasmGenerationError::Unreachable {
            context: context.into(),
            operation: None,
        }
    }

    pub fn unsupported_operation(op: MathOp, value_type: ValueType) -> Self {
        WasmGenerationError::Unreachable {
            context: format!("{op} is not defined for {value_type}"),
            operation: Some((op, value_type)),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            WasmGenerationError::NotFound { .. } => ErrorType::NotFound,
            WasmGenerationError::NotImplemented { .. } => ErrorType::NotImplemented,
            WasmGenerationError::TypeMismatch { .. } => ErrorType::TypeMismatch,
            WasmGenerationError::Unreachable { .. } => ErrorType::Unreachable,
        }
    }

    /// Convert to CompilerError with appropriate metadata.
    pub fn to_compiler_error(self) -> CompilerError {
        let error_type = self.error_type();

        let mut error = match self {
            WasmGenerationError::NotFound { item, context } => {
                CompilerError::new(format!("'{item}' not found in {context}"), error_type)
                    .with_metadata(ErrorMetaDataKey::Label, item)
                    .with_metadata(
                        ErrorMetaDataKey::PrimarySuggestion,
                        "Only break to a label of an enclosing block",
                    )
            }

            WasmGenerationError::NotImplemented { instruction } => {
                CompilerError::new(format!("{instruction} is not yet implemented"), error_type)
                    .with_metadata(ErrorMetaDataKey::InstructionKind, instruction)
            }

            WasmGenerationError::TypeMismatch {
                expected,
                found,
                context,
            } => CompilerError::new(
                format!("Type mismatch in {context}: expected {expected}, found {found}"),
                error_type,
            )
            .with_metadata(ErrorMetaDataKey::ExpectedType, expected)
            .with_metadata(ErrorMetaDataKey::FoundType, found),

            WasmGenerationError::Unreachable { context, operation } => {
                let mut error = CompilerError::new(context, error_type);
                if let Some((op, value_type)) = operation {
                    error.new_metadata_entry(ErrorMetaDataKey::InstructionKind, op.op_name());
                    error.new_metadata_entry(ErrorMetaDataKey::FoundType, value_type.type_name());
                    error.new_metadata_entry(
                        ErrorMetaDataKey::PrimarySuggestion,
                        "Arithmetic needs a numeric type and Mod an integer one",
                    );
                }
                error
            }
        };

        error.new_metadata_entry(ErrorMetaDataKey::CompilationStage, "WASM Generation");
        error
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
