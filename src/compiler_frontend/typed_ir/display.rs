//! Typed IR Pretty-Printing
//!
//! Human-readable rendering of input trees for the codegen logs.

use crate::compiler_frontend::typed_ir::nodes::{Function, Instruction, Module};

pub fn display_module(module: &Module) -> String {
    let mut output = format!("=== Module {} ===\n", module.name);
    for function in &module.functions {
        output.push_str(&display_function(function));
    }
    output
}

pub fn display_function(function: &Function) -> String {
    let params: Vec<String> = function.params.iter().map(|p| p.to_string()).collect();
    let mut output = format!(
        "fn {}({}) -> {} {{\n",
        function.name,
        params.join(", "),
        function.return_type
    );

    if !function.locals.is_empty() {
        let locals: Vec<String> = function.locals.iter().map(|l| l.to_string()).collect();
        output.push_str(&format!("  locals: {}\n", locals.join(", ")));
    }

    output.push_str(&display_instruction(&function.body, 1));
    output.push_str("}\n");
    output
}

pub fn display_instruction(instruction: &Instruction, indent: usize) -> String {
    let indent_str = "  ".repeat(indent);
    let mut output = String::new();

    match instruction {
        Instruction::ConstInt32(value) => output.push_str(&format!("{indent_str}{value}i32\n")),
        Instruction::ConstFloat64(value) => {
            output.push_str(&format!("{indent_str}{value:?}f64\n"))
        }
        Instruction::ConstBool(value) => output.push_str(&format!("{indent_str}{value}\n")),

        Instruction::LocalGet { index, value_type } => {
            output.push_str(&format!("{indent_str}local {index}: {value_type}\n"))
        }

        Instruction::Block {
            label,
            value_type,
            children,
        } => {
            output.push_str(&format!("{indent_str}block '{label}: {value_type} {{\n"));
            for child in children {
                output.push_str(&display_instruction(child, indent + 1));
            }
            output.push_str(&format!("{indent_str}}}\n"));
        }

        Instruction::BinaryOp {
            op,
            value_type,
            lhs,
            rhs,
        } => {
            output.push_str(&format!("{indent_str}{op}<{value_type}>\n"));
            output.push_str(&display_instruction(lhs, indent + 1));
            output.push_str(&display_instruction(rhs, indent + 1));
        }

        Instruction::Break { label, value } => {
            output.push_str(&format!("{indent_str}break '{label}\n"));
            if let Some(value) = value {
                output.push_str(&display_instruction(value, indent + 1));
            }
        }

        Instruction::If {
            condition,
            then_body,
            else_body,
        } => {
            output.push_str(&format!("{indent_str}if\n"));
            output.push_str(&display_instruction(condition, indent + 1));
            output.push_str(&format!("{indent_str}then\n"));
            output.push_str(&display_instruction(then_body, indent + 1));
            if let Some(else_body) = else_body {
                output.push_str(&format!("{indent_str}else\n"));
                output.push_str(&display_instruction(else_body, indent + 1));
            }
        }

        // Shown by kind only
        other => output.push_str(&format!("{indent_str}<{}>\n", other.kind_name())),
    }

    output
}

#[cfg(test)]
#[path = "tests/display_tests.rs"]
mod tests;
