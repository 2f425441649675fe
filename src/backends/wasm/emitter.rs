//! Module Emitter
//!
//! Serializes a fully assembled `WasmModuleBuilder` into WASM bytes. The builder is
//! taken by value so it can only be emitted once. Everything that can go wrong has
//! already been checked while lowering, so emission itself has no failure path.
//!
//! Sections are written in the order the binary format requires:
//! Type, Function, Export, Code, then the custom "name" section.

use crate::backends::wasm::machine_ir::MachineNode;
use crate::backends::wasm::module_builder::{RegisteredFunction, WasmModuleBuilder};
use crate::codegen_log;
use crate::settings::CodegenConfig;
use wasm_encoder::{
    CodeSection, ExportKind, ExportSection, Function, FunctionSection, Instruction, Module,
    NameMap, NameSection, TypeSection, ValType,
};

/// Consume the builder and produce the binary module.
pub fn emit(builder: WasmModuleBuilder, config: &CodegenConfig) -> Vec<u8> {
    let (types, functions) = builder.into_parts();

    let mut type_section = TypeSection::new();
    for func_type in &types {
        type_section
            .ty()
            .function(func_type.params.clone(), func_type.results.clone());
    }

    let mut function_section = FunctionSection::new();
    let mut code_section = CodeSection::new();
    let mut export_section = ExportSection::new();
    let mut function_names = NameMap::new();

    for (index, registered) in functions.iter().enumerate() {
        let function_index = index as u32;
        codegen_log!(format!(
            "[WASM] Emitting function {} as index {}",
            registered.name, function_index
        ));

        function_section.function(registered.type_index);
        code_section.function(&encode_function(registered));
        function_names.append(function_index, &registered.name);

        if config.export_functions {
            export_section.export(&registered.name, ExportKind::Func, function_index);
        }
    }

    let mut module = Module::new();

    if !types.is_empty() {
        module.section(&type_section);
    }
    if !functions.is_empty() {
        module.section(&function_section);
    }
    if config.export_functions && !functions.is_empty() {
        module.section(&export_section);
    }
    if !functions.is_empty() {
        module.section(&code_section);
    }
    if config.emit_name_section && !functions.is_empty() {
        let mut name_section = NameSection::new();
        name_section.functions(&function_names);
        module.section(&name_section);
    }

    // The machine IR is dropped here, after the last section has been encoded
    module.finish()
}

/// Encode one function body, including its local declarations.
pub fn encode_function(registered: &RegisteredFunction) -> Function {
    let mut function = Function::new(group_locals(&registered.locals));
    emit_node(&registered.body, &mut function);
    function.instruction(&Instruction::End);
    function
}

/// Collapse consecutive locals of the same type into (count, type) runs.
pub fn group_locals(locals: &[ValType]) -> Vec<(u32, ValType)> {
    let mut groups: Vec<(u32, ValType)> = Vec::new();
    for local in locals {
        match groups.last_mut() {
            Some((count, val_type)) if val_type == local => *count += 1,
            _ => groups.push((1, *local)),
        }
    }
    groups
}

/// Write a machine node to the function body in stack order.
fn emit_node(node: &MachineNode, function: &mut Function) {
    match node {
        MachineNode::Const(literal) => {
            function.instruction(&literal.to_instruction());
        }

        MachineNode::LocalGet { index, .. } => {
            function.instruction(&Instruction::LocalGet(*index));
        }

        // Stack: [] -> [result]
        MachineNode::Block {
            machine_type,
            children,
            ..
        } => {
            function.instruction(&Instruction::Block(machine_type.to_block_type()));
            for child in children {
                emit_node(child, function);
            }
            function.instruction(&Instruction::End);
        }

        // Stack: [lhs, rhs] -> [result]
        MachineNode::Binary { op, lhs, rhs } => {
            emit_node(lhs, function);
            emit_node(rhs, function);
            function.instruction(&op.to_instruction());
        }

        MachineNode::Break { depth, value, .. } => {
            if let Some(value) = value {
                emit_node(value, function);
            }
            function.instruction(&Instruction::Br(*depth));
        }

        // Stack: [i32 (condition)] -> [result]
        MachineNode::If {
            condition,
            then_body,
            else_body,
            machine_type,
        } => {
            emit_node(condition, function);
            function.instruction(&Instruction::If(machine_type.to_block_type()));
            emit_node(then_body, function);
            if let Some(else_body) = else_body {
                function.instruction(&Instruction::Else);
                emit_node(else_body, function);
            }
            function.instruction(&Instruction::End);
        }

        // Stack: [value] -> []
        MachineNode::Drop(value) => {
            emit_node(value, function);
            function.instruction(&Instruction::Drop);
        }
    }
}

#[cfg(test)]
#[path = "tests/emitter_tests.rs"]
mod tests;
