//! Instruction Lowering Engine
//!
//! Recursively converts typed IR instructions into machine IR. Children are always
//! lowered before their parent and in source order:
//! - Block children in declaration order
//! - BinaryOp left operand, then right operand, then opcode selection
//! - Break value before the branch
//! - If condition, then body, then else body
//!
//! An if without an else never produces a value; a then body value is dropped.
//!
//! The first failure aborts the walk; nothing lowered so far is kept.

use crate::backends::wasm::control_flow::ControlFlowManager;
use crate::backends::wasm::error::WasmGenerationError;
use crate::backends::wasm::machine_ir::{MachineLiteral, MachineNode, MachineOp};
use crate::backends::wasm::type_mapper::{MachineType, map_type};
use crate::codegen_log;
use crate::compiler_frontend::typed_ir::nodes::{Instruction, MathOp, ValueType};

/// Lowers one instruction tree. A fresh lowerer is used for each function body,
/// since break targets never cross function boundaries.
pub struct InstructionLowerer {
    control_flow: ControlFlowManager,
}

impl Default for InstructionLowerer {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionLowerer {
    pub fn new() -> Self {
        InstructionLowerer {
            control_flow: ControlFlowManager::new(),
        }
    }

    /// Lower a single instruction and everything below it.
    pub fn lower(&mut self, instruction: &Instruction) -> Result<MachineNode, WasmGenerationError> {
        codegen_log!(format!("[WASM] Lowering {}", instruction.kind_name()));

        match instruction {
            // =========================================================================
            // Literals
            // Bool is a word32 holding 0 or 1
            // =========================================================================
            Instruction::ConstInt32(value) => Ok(MachineNode::Const(MachineLiteral::I32(*value))),

            Instruction::ConstFloat64(value) => {
                Ok(MachineNode::Const(MachineLiteral::F64(*value)))
            }

            Instruction::ConstBool(value) => {
                Ok(MachineNode::Const(MachineLiteral::I32(i32::from(*value))))
            }

            Instruction::LocalGet { index, value_type } => Ok(MachineNode::LocalGet {
                index: *index,
                machine_type: map_type(*value_type)?,
            }),

            // =========================================================================
            // Structured control flow
            // =========================================================================
            Instruction::Block {
                label,
                value_type,
                children,
            } => {
                let machine_type = map_type(*value_type)?;

                self.control_flow.enter_block(label);
                let lowered = self.lower_sequence(children);
                self.control_flow.exit_block()?;

                Ok(MachineNode::Block {
                    label: label.to_owned(),
                    machine_type,
                    children: lowered?,
                })
            }

            Instruction::Break { label, value } => {
                let value = match value {
                    Some(value) => Some(Box::new(self.lower(value)?)),
                    None => None,
                };
                let depth = self.control_flow.resolve_label(label)?;

                Ok(MachineNode::Break {
                    label: label.to_owned(),
                    depth,
                    value,
                })
            }

            Instruction::If {
                condition,
                then_body,
                else_body,
            } => {
                // The condition is evaluated before the if opens its frame
                let condition = self.lower(condition)?;
                let condition_type = condition.machine_type();
                if !matches!(
                    condition_type,
                    MachineType::Word32 | MachineType::Unreachable
                ) {
                    return Err(WasmGenerationError::type_mismatch(
                        MachineType::Word32.type_name(),
                        condition_type.type_name(),
                        "if condition",
                    ));
                }

                self.control_flow.enter_if();
                let branches = self.lower_branches(then_body, else_body.as_deref());
                self.control_flow.exit_block()?;
                let (then_body, else_body) = branches?;

                // A value left by a then body with no alternative path is discarded
                let then_body = match (&else_body, then_body.machine_type().to_val_type()) {
                    (None, Some(_)) => MachineNode::Drop(Box::new(then_body)),
                    _ => then_body,
                };

                let machine_type = match &else_body {
                    // Without an alternative path the if can't produce a value
                    None => MachineType::Unreachable,
                    Some(else_body) => match then_body.machine_type() {
                        MachineType::Unreachable => else_body.machine_type(),
                        then_type => then_type,
                    },
                };

                Ok(MachineNode::If {
                    condition: Box::new(condition),
                    then_body: Box::new(then_body),
                    else_body: else_body.map(Box::new),
                    machine_type,
                })
            }

            // =========================================================================
            // Arithmetic
            // Operands first, then the opcode for the (op, type) pair
            // =========================================================================
            Instruction::BinaryOp {
                op,
                value_type,
                lhs,
                rhs,
            } => {
                let lhs = self.lower(lhs)?;
                let rhs = self.lower(rhs)?;
                let op = select_machine_op(*op, *value_type)?;

                Ok(MachineNode::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                })
            }

            Instruction::StoreLocal { .. }
            | Instruction::PropertyAccess { .. }
            | Instruction::PropertyAssignment { .. }
            | Instruction::ContainerAlloc { .. }
            | Instruction::StackAlloc { .. }
            | Instruction::StackFree { .. } => Err(WasmGenerationError::not_implemented(
                instruction.kind_name(),
            )),
        }
    }

    fn lower_sequence(
        &mut self,
        instructions: &[Instruction],
    ) -> Result<Vec<MachineNode>, WasmGenerationError> {
        let mut lowered = Vec::with_capacity(instructions.len());
        for instruction in instructions {
            lowered.push(self.lower(instruction)?);
        }
        Ok(lowered)
    }

    fn lower_branches(
        &mut self,
        then_body: &Instruction,
        else_body: Option<&Instruction>,
    ) -> Result<(MachineNode, Option<MachineNode>), WasmGenerationError> {
        let then_body = self.lower(then_body)?;
        let else_body = match else_body {
            Some(else_body) => Some(self.lower(else_body)?),
            None => None,
        };
        Ok((then_body, else_body))
    }

    pub fn is_balanced(&self) -> bool {
        self.control_flow.is_balanced()
    }
}

/// Lower a function body or any other root instruction with a fresh label scope.
pub fn lower_instruction(instruction: &Instruction) -> Result<MachineNode, WasmGenerationError> {
    InstructionLowerer::new().lower(instruction)
}

/// Pick the concrete opcode for an arithmetic operator at a value type.
///
/// Integers support all five operators with signed division and remainder.
/// Floats have no remainder. Every other pair is a front end bug.
pub fn select_machine_op(op: MathOp, value_type: ValueType) -> Result<MachineOp, WasmGenerationError> {
    let machine_op = match (value_type, op) {
        (ValueType::Int32, MathOp::Add) => MachineOp::I32Add,
        (ValueType::Int32, MathOp::Sub) => MachineOp::I32Sub,
        (ValueType::Int32, MathOp::Mul) => MachineOp::I32Mul,
        (ValueType::Int32, MathOp::Div) => MachineOp::I32DivS,
        (ValueType::Int32, MathOp::Mod) => MachineOp::I32RemS,

        (ValueType::Int64, MathOp::Add) => MachineOp::I64Add,
        (ValueType::Int64, MathOp::Sub) => MachineOp::I64Sub,
        (ValueType::Int64, MathOp::Mul) => MachineOp::I64Mul,
        (ValueType::Int64, MathOp::Div) => MachineOp::I64DivS,
        (ValueType::Int64, MathOp::Mod) => MachineOp::I64RemS,

        (ValueType::Float32, MathOp::Add) => MachineOp::F32Add,
        (ValueType::Float32, MathOp::Sub) => MachineOp::F32Sub,
        (ValueType::Float32, MathOp::Mul) => MachineOp::F32Mul,
        (ValueType::Float32, MathOp::Div) => MachineOp::F32Div,

        (ValueType::Float64, MathOp::Add) => MachineOp::F64Add,
        (ValueType::Float64, MathOp::Sub) => MachineOp::F64Sub,
        (ValueType::Float64, MathOp::Mul) => MachineOp::F64Mul,
        (ValueType::Float64, MathOp::Div) => MachineOp::F64Div,

        _ => return Err(WasmGenerationError::unsupported_operation(op, value_type)),
    };

    Ok(machine_op)
}

#[cfg(test)]
#[path = "tests/instruction_lowerer_tests.rs"]
mod tests;
