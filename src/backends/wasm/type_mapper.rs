//! Value type to machine type mapping.
//!
//! Booleans, pointers and strings travel as 32-bit words and tagged unions pack
//! their discriminant and payload into one 64-bit word. Those representations are
//! fixed by the front end; this table only has to agree with them.

use crate::backends::wasm::error::WasmGenerationError;
use crate::compiler_frontend::typed_ir::nodes::ValueType;
use std::fmt;
use wasm_encoder::{BlockType, ValType};

/// The primitive representations of the target machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineType {
    Word32,
    Word64,
    Float32,
    Float64,
    /// No runtime value: code that never completes normally or discards its result
    Unreachable,
}

impl MachineType {
    /// The wasm value type, or None for `Unreachable` which has no runtime value.
    pub fn to_val_type(self) -> Option<ValType> {
        match self {
            MachineType::Word32 => Some(ValType::I32),
            MachineType::Word64 => Some(ValType::I64),
            MachineType::Float32 => Some(ValType::F32),
            MachineType::Float64 => Some(ValType::F64),
            MachineType::Unreachable => None,
        }
    }

    pub fn to_block_type(self) -> BlockType {
        self.to_val_type()
            .map(BlockType::Result)
            .unwrap_or(BlockType::Empty)
    }

    pub fn type_name(self) -> &'static str {
        match self {
            MachineType::Word32 => "i32",
            MachineType::Word64 => "i64",
            MachineType::Float32 => "f32",
            MachineType::Float64 => "f64",
            MachineType::Unreachable => "unreachable",
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Map a source value type to its machine representation.
///
/// `Nothing` has no representation and fails instead of defaulting to something.
pub fn map_type(value_type: ValueType) -> Result<MachineType, WasmGenerationError> {
    match value_type {
        ValueType::Int32 | ValueType::Bool | ValueType::Ptr | ValueType::Str => {
            Ok(MachineType::Word32)
        }
        ValueType::Int64 | ValueType::Union => Ok(MachineType::Word64),
        ValueType::Float32 => Ok(MachineType::Float32),
        ValueType::Float64 => Ok(MachineType::Float64),
        ValueType::Never => Ok(MachineType::Unreachable),
        ValueType::Nothing => Err(WasmGenerationError::type_mismatch(
            "a value type with a machine representation",
            value_type.type_name(),
            "type mapping",
        )),
    }
}

/// Map a type that has to exist as a runtime value (parameters and locals).
pub fn map_value_slot(
    value_type: ValueType,
    context: &str,
) -> Result<ValType, WasmGenerationError> {
    map_type(value_type)?.to_val_type().ok_or_else(|| {
        WasmGenerationError::type_mismatch("a runtime value type", value_type.type_name(), context)
    })
}

#[cfg(test)]
#[path = "tests/type_mapper_tests.rs"]
mod tests;
