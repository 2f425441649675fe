//! Typed IR Nodes
//!
//! The tree-shaped program representation handed to the WASM backend by the front end.
//! Modules own their functions, functions own a single root instruction, and every
//! instruction owns its children exclusively. The backend never mutates these trees.

use crate::backends::wasm::error::WasmGenerationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source-level value types. Each one has a fixed machine representation
/// (see `backends::wasm::type_mapper`), except `Nothing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Int32,
    Float64,
    Bool,
    Str,
    Union,
    Ptr,
    Nothing,
    Never,
    Int64,
    Float32,
}

impl ValueType {
    pub const ALL: [ValueType; 10] = [
        ValueType::Int32,
        ValueType::Float64,
        ValueType::Bool,
        ValueType::Str,
        ValueType::Union,
        ValueType::Ptr,
        ValueType::Nothing,
        ValueType::Never,
        ValueType::Int64,
        ValueType::Float32,
    ];

    /// Decode the legacy enum ordinal used by front ends that pass types as integers.
    pub fn from_ordinal(ordinal: u32) -> Result<ValueType, WasmGenerationError> {
        ValueType::ALL
            .get(ordinal as usize)
            .copied()
            .ok_or_else(|| {
                WasmGenerationError::type_mismatch(
                    "a value type ordinal between 0 and 9",
                    ordinal.to_string(),
                    "value type decoding",
                )
            })
    }

    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn type_name(self) -> &'static str {
        match self {
            ValueType::Int32 => "Int32",
            ValueType::Float64 => "Float64",
            ValueType::Bool => "Bool",
            ValueType::Str => "Str",
            ValueType::Union => "Union",
            ValueType::Ptr => "Ptr",
            ValueType::Nothing => "Nothing",
            ValueType::Never => "Never",
            ValueType::Int64 => "Int64",
            ValueType::Float32 => "Float32",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Arithmetic operators carried by `Instruction::BinaryOp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl MathOp {
    pub const ALL: [MathOp; 5] = [MathOp::Add, MathOp::Sub, MathOp::Mul, MathOp::Div, MathOp::Mod];

    /// Decode the legacy operator ordinal.
    /// An unknown operator can only come from a broken front end, so this is Unreachable.
    pub fn from_ordinal(ordinal: u32) -> Result<MathOp, WasmGenerationError> {
        MathOp::ALL.get(ordinal as usize).copied().ok_or_else(|| {
            WasmGenerationError::unreachable(format!("unknown math operator ordinal {ordinal}"))
        })
    }

    pub fn op_name(self) -> &'static str {
        match self {
            MathOp::Add => "Add",
            MathOp::Sub => "Sub",
            MathOp::Mul => "Mul",
            MathOp::Div => "Div",
            MathOp::Mod => "Mod",
        }
    }
}

impl fmt::Display for MathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op_name())
    }
}

/// One node of the input expression tree.
///
/// The first eight variants are lowered by the backend. The remaining ones are
/// understood by the front end but have no lowering yet and fail with NotImplemented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    ConstInt32(i32),
    ConstFloat64(f64),
    ConstBool(bool),
    LocalGet {
        index: u32,
        value_type: ValueType,
    },
    Block {
        label: String,
        value_type: ValueType,
        children: Vec<Instruction>,
    },
    BinaryOp {
        op: MathOp,
        value_type: ValueType,
        lhs: Box<Instruction>,
        rhs: Box<Instruction>,
    },
    Break {
        label: String,
        #[serde(default)]
        value: Option<Box<Instruction>>,
    },
    If {
        condition: Box<Instruction>,
        then_body: Box<Instruction>,
        #[serde(default)]
        else_body: Option<Box<Instruction>>,
    },

    // Recognised, not lowered
    StoreLocal {
        index: u32,
        value: Box<Instruction>,
    },
    PropertyAccess {
        pointer: Box<Instruction>,
        offset: u32,
        value_type: ValueType,
    },
    PropertyAssignment {
        pointer: Box<Instruction>,
        offset: u32,
        value: Box<Instruction>,
    },
    ContainerAlloc {
        bytes: u32,
    },
    StackAlloc {
        amount: u32,
    },
    StackFree {
        amount: u32,
    },
}

impl Instruction {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Instruction::ConstInt32(_) => "ConstInt32",
            Instruction::ConstFloat64(_) => "ConstFloat64",
            Instruction::ConstBool(_) => "ConstBool",
            Instruction::LocalGet { .. } => "LocalGet",
            Instruction::Block { .. } => "Block",
            Instruction::BinaryOp { .. } => "BinaryOp",
            Instruction::Break { .. } => "Break",
            Instruction::If { .. } => "If",
            Instruction::StoreLocal { .. } => "StoreLocal",
            Instruction::PropertyAccess { .. } => "PropertyAccess",
            Instruction::PropertyAssignment { .. } => "PropertyAssignment",
            Instruction::ContainerAlloc { .. } => "ContainerAlloc",
            Instruction::StackAlloc { .. } => "StackAlloc",
            Instruction::StackFree { .. } => "StackFree",
        }
    }

    pub fn local_get(index: u32, value_type: ValueType) -> Self {
        Instruction::LocalGet { index, value_type }
    }

    pub fn block(label: impl Into<String>, value_type: ValueType, children: Vec<Instruction>) -> Self {
        Instruction::Block {
            label: label.into(),
            value_type,
            children,
        }
    }

    pub fn binary(op: MathOp, value_type: ValueType, lhs: Instruction, rhs: Instruction) -> Self {
        Instruction::BinaryOp {
            op,
            value_type,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn br(label: impl Into<String>, value: Option<Instruction>) -> Self {
        Instruction::Break {
            label: label.into(),
            value: value.map(Box::new),
        }
    }

    pub fn if_else(
        condition: Instruction,
        then_body: Instruction,
        else_body: Option<Instruction>,
    ) -> Self {
        Instruction::If {
            condition: Box::new(condition),
            then_body: Box::new(then_body),
            else_body: else_body.map(Box::new),
        }
    }
}

/// A function as produced by the front end.
/// `locals` lists only the extra local slots; parameters occupy the first indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub params: Vec<ValueType>,
    pub return_type: ValueType,
    #[serde(default)]
    pub locals: Vec<ValueType>,
    pub body: Instruction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            functions: Vec::new(),
        }
    }

    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }
}
