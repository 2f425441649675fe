//! Machine IR
//!
//! The immutable tree the instruction lowerer produces. It mirrors the shape of the
//! input tree, but every type is already a machine type, every operator is a concrete
//! opcode and every break already knows its relative branch depth. Emission is a
//! plain walk over this tree.

use crate::backends::wasm::type_mapper::MachineType;
use wasm_encoder::{Ieee64, Instruction};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MachineLiteral {
    I32(i32),
    F64(f64),
}

impl MachineLiteral {
    pub fn machine_type(self) -> MachineType {
        match self {
            MachineLiteral::I32(_) => MachineType::Word32,
            MachineLiteral::F64(_) => MachineType::Float64,
        }
    }

    pub fn to_instruction(self) -> Instruction<'static> {
        match self {
            MachineLiteral::I32(value) => Instruction::I32Const(value),
            MachineLiteral::F64(value) => Instruction::F64Const(Ieee64::from(value)),
        }
    }
}

/// Concrete binary opcodes. Only the combinations the target supports exist here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineOp {
    I32Add,
    I32Sub,
    I32Mul,
    I32DivS,
    I32RemS,

    I64Add,
    I64Sub,
    I64Mul,
    I64DivS,
    I64RemS,

    F32Add,
    F32Sub,
    F32Mul,
    F32Div,

    F64Add,
    F64Sub,
    F64Mul,
    F64Div,
}

impl MachineOp {
    pub fn result_type(self) -> MachineType {
        match self {
            MachineOp::I32Add
            | MachineOp::I32Sub
            | MachineOp::I32Mul
            | MachineOp::I32DivS
            | MachineOp::I32RemS => MachineType::Word32,
            MachineOp::I64Add
            | MachineOp::I64Sub
            | MachineOp::I64Mul
            | MachineOp::I64DivS
            | MachineOp::I64RemS => MachineType::Word64,
            MachineOp::F32Add | MachineOp::F32Sub | MachineOp::F32Mul | MachineOp::F32Div => {
                MachineType::Float32
            }
            MachineOp::F64Add | MachineOp::F64Sub | MachineOp::F64Mul | MachineOp::F64Div => {
                MachineType::Float64
            }
        }
    }

    pub fn to_instruction(self) -> Instruction<'static> {
        match self {
            MachineOp::I32Add => Instruction::I32Add,
            MachineOp::I32Sub => Instruction::I32Sub,
            MachineOp::I32Mul => Instruction::I32Mul,
            MachineOp::I32DivS => Instruction::I32DivS,
            MachineOp::I32RemS => Instruction::I32RemS,
            MachineOp::I64Add => Instruction::I64Add,
            MachineOp::I64Sub => Instruction::I64Sub,
            MachineOp::I64Mul => Instruction::I64Mul,
            MachineOp::I64DivS => Instruction::I64DivS,
            MachineOp::I64RemS => Instruction::I64RemS,
            MachineOp::F32Add => Instruction::F32Add,
            MachineOp::F32Sub => Instruction::F32Sub,
            MachineOp::F32Mul => Instruction::F32Mul,
            MachineOp::F32Div => Instruction::F32Div,
            MachineOp::F64Add => Instruction::F64Add,
            MachineOp::F64Sub => Instruction::F64Sub,
            MachineOp::F64Mul => Instruction::F64Mul,
            MachineOp::F64Div => Instruction::F64Div,
        }
    }

    pub fn op_name(self) -> &'static str {
        match self {
            MachineOp::I32Add => "i32.add",
            MachineOp::I32Sub => "i32.sub",
            MachineOp::I32Mul => "i32.mul",
            MachineOp::I32DivS => "i32.div_s",
            MachineOp::I32RemS => "i32.rem_s",
            MachineOp::I64Add => "i64.add",
            MachineOp::I64Sub => "i64.sub",
            MachineOp::I64Mul => "i64.mul",
            MachineOp::I64DivS => "i64.div_s",
            MachineOp::I64RemS => "i64.rem_s",
            MachineOp::F32Add => "f32.add",
            MachineOp::F32Sub => "f32.sub",
            MachineOp::F32Mul => "f32.mul",
            MachineOp::F32Div => "f32.div",
            MachineOp::F64Add => "f64.add",
            MachineOp::F64Sub => "f64.sub",
            MachineOp::F64Mul => "f64.mul",
            MachineOp::F64Div => "f64.div",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MachineNode {
    Const(MachineLiteral),
    LocalGet {
        index: u32,
        machine_type: MachineType,
    },
    Block {
        label: String,
        machine_type: MachineType,
        children: Vec<MachineNode>,
    },
    Binary {
        op: MachineOp,
        lhs: Box<MachineNode>,
        rhs: Box<MachineNode>,
    },
    Break {
        label: String,
        /// Number of enclosing structured frames between the break and its target
        depth: u32,
        value: Option<Box<MachineNode>>,
    },
    If {
        condition: Box<MachineNode>,
        then_body: Box<MachineNode>,
        else_body: Option<Box<MachineNode>>,
        machine_type: MachineType,
    },
    /// Evaluates its operand and discards the value
    Drop(Box<MachineNode>),
}

impl MachineNode {
    /// The machine type of the value this node leaves on the stack.
    pub fn machine_type(&self) -> MachineType {
        match self {
            MachineNode::Const(literal) => literal.machine_type(),
            MachineNode::LocalGet { machine_type, .. } => *machine_type,
            MachineNode::Block { machine_type, .. } => *machine_type,
            MachineNode::Binary { op, .. } => op.result_type(),
            MachineNode::Break { .. } => MachineType::Unreachable,
            MachineNode::If { machine_type, .. } => *machine_type,
            MachineNode::Drop(_) => MachineType::Unreachable,
        }
    }
}

/// Renders a machine node as a WAT-style s-expression.
pub fn display_machine_node(node: &MachineNode, indent: usize) -> String {
    let indent_str = "  ".repeat(indent);
    let mut output = String::new();

    match node {
        MachineNode::Const(MachineLiteral::I32(value)) => {
            output.push_str(&format!("{indent_str}(i32.const {value})\n"));
        }
        MachineNode::Const(MachineLiteral::F64(value)) => {
            output.push_str(&format!("{indent_str}(f64.const {value:?})\n"));
        }

        MachineNode::LocalGet {
            index,
            machine_type,
        } => {
            output.push_str(&format!(
                "{indent_str}(local.get {index} (; {machine_type} ;))\n"
            ));
        }

        MachineNode::Block {
            label,
            machine_type,
            children,
        } => {
            output.push_str(&format!(
                "{indent_str}(block ${label}{}\n",
                display_result(*machine_type)
            ));
            for child in children {
                output.push_str(&display_machine_node(child, indent + 1));
            }
            output.push_str(&format!("{indent_str})\n"));
        }

        MachineNode::Binary { op, lhs, rhs } => {
            output.push_str(&format!("{indent_str}({}\n", op.op_name()));
            output.push_str(&display_machine_node(lhs, indent + 1));
            output.push_str(&display_machine_node(rhs, indent + 1));
            output.push_str(&format!("{indent_str})\n"));
        }

        MachineNode::Break { label, value, .. } => match value {
            Some(value) => {
                output.push_str(&format!("{indent_str}(br ${label}\n"));
                output.push_str(&display_machine_node(value, indent + 1));
                output.push_str(&format!("{indent_str})\n"));
            }
            None => output.push_str(&format!("{indent_str}(br ${label})\n")),
        },

        MachineNode::If {
            condition,
            then_body,
            else_body,
            machine_type,
        } => {
            output.push_str(&format!("{indent_str}(if{}\n", display_result(*machine_type)));
            output.push_str(&display_machine_node(condition, indent + 1));
            output.push_str(&format!("{indent_str}  (then\n"));
            output.push_str(&display_machine_node(then_body, indent + 2));
            output.push_str(&format!("{indent_str}  )\n"));
            if let Some(else_body) = else_body {
                output.push_str(&format!("{indent_str}  (else\n"));
                output.push_str(&display_machine_node(else_body, indent + 2));
                output.push_str(&format!("{indent_str}  )\n"));
            }
            output.push_str(&format!("{indent_str})\n"));
        }

        MachineNode::Drop(value) => {
            output.push_str(&format!("{indent_str}(drop\n"));
            output.push_str(&display_machine_node(value, indent + 1));
            output.push_str(&format!("{indent_str})\n"));
        }
    }

    output
}

fn display_result(machine_type: MachineType) -> String {
    match machine_type.to_val_type() {
        Some(_) => format!(" (result {machine_type})"),
        None => String::new(),
    }
}

