//! WASM Module Builder
//!
//! Accumulates the functions of a generation request before emission. Each function is
//! registered with its qualified name, its signature (deduplicated into the type table)
//! and its lowered machine IR body. The builder owns that IR until the emitter consumes
//! the whole builder.
//!
//! Function indices follow registration order. Names are not checked for collisions:
//! keeping qualified names unique is up to the front end.

use crate::backends::wasm::machine_ir::display_machine_node;
use crate::backends::wasm::machine_ir::MachineNode;
use rustc_hash::FxHashMap;
use wasm_encoder::ValType;

/// Represents a registered function type for deduplication
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub params: Vec<ValType>,
    pub results: Vec<ValType>,
}

impl FunctionType {
    pub fn new(params: Vec<ValType>, results: Vec<ValType>) -> Self {
        FunctionType { params, results }
    }

    /// Check if this is a void function type
    pub fn is_void(&self) -> bool {
        self.params.is_empty() && self.results.is_empty()
    }
}

/// A function waiting to be emitted.
#[derive(Debug, Clone)]
pub struct RegisteredFunction {
    /// Module name concatenated with the function name
    pub name: String,
    pub type_index: u32,
    /// Local slots after the parameters, in declaration order
    pub locals: Vec<ValType>,
    pub body: MachineNode,
}

#[derive(Debug, Default)]
pub struct WasmModuleBuilder {
    types: Vec<FunctionType>,
    functions: Vec<RegisteredFunction>,

    // Type deduplication map: FunctionType -> type index
    type_cache: FxHashMap<FunctionType, u32>,
}

impl WasmModuleBuilder {
    pub fn new() -> Self {
        WasmModuleBuilder {
            types: Vec::new(),
            functions: Vec::new(),
            type_cache: FxHashMap::default(),
        }
    }

    // =========================================================================
    // Type Table
    // =========================================================================

    /// Add a function type and return its index.
    /// Uses type deduplication to avoid duplicate type entries.
    pub fn add_function_type(&mut self, params: Vec<ValType>, results: Vec<ValType>) -> u32 {
        let func_type = FunctionType::new(params, results);

        if let Some(&existing_index) = self.type_cache.get(&func_type) {
            return existing_index;
        }

        let type_index = self.types.len() as u32;
        self.types.push(func_type.clone());
        self.type_cache.insert(func_type, type_index);

        type_index
    }

    /// Check if a function type exists and return its index
    pub fn find_type(&self, params: &[ValType], results: &[ValType]) -> Option<u32> {
        let func_type = FunctionType::new(params.to_vec(), results.to_vec());
        self.type_cache.get(&func_type).copied()
    }

    pub fn function_type(&self, type_index: u32) -> Option<&FunctionType> {
        self.types.get(type_index as usize)
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// Register a function and return its function index.
    pub fn add_function(
        &mut self,
        name: String,
        params: Vec<ValType>,
        results: Vec<ValType>,
        locals: Vec<ValType>,
        body: MachineNode,
    ) -> u32 {
        let type_index = self.add_function_type(params, results);
        let function_index = self.functions.len() as u32;

        self.functions.push(RegisteredFunction {
            name,
            type_index,
            locals,
            body,
        });

        function_index
    }

    /// Get the index of the first function registered under `name`
    pub fn get_function_index(&self, name: &str) -> Option<u32> {
        self.functions
            .iter()
            .position(|function| function.name == name)
            .map(|index| index as u32)
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|function| function.name.as_str())
    }

    pub fn functions(&self) -> &[RegisteredFunction] {
        &self.functions
    }

    pub fn function_count(&self) -> u32 {
        self.functions.len() as u32
    }

    pub fn type_count(&self) -> u32 {
        self.types.len() as u32
    }

    /// Hand the accumulated types and functions over to the emitter.
    pub(crate) fn into_parts(self) -> (Vec<FunctionType>, Vec<RegisteredFunction>) {
        (self.types, self.functions)
    }

    // =========================================================================
    // Debug Dump
    // =========================================================================

    /// Renders the module as WAT-style text for debugging.
    pub fn dump(&self) -> String {
        let mut output = String::from("(module\n");

        for (index, func_type) in self.types.iter().enumerate() {
            output.push_str(&format!(
                "  (type (;{index};) (func{}))\n",
                display_signature(func_type)
            ));
        }

        for function in &self.functions {
            let signature = self
                .function_type(function.type_index)
                .map(display_signature)
                .unwrap_or_default();

            output.push_str(&format!("  (func ${}{}\n", function.name, signature));
            if !function.locals.is_empty() {
                output.push_str(&format!("    (local{})\n", display_val_types(&function.locals)));
            }
            output.push_str(&display_machine_node(&function.body, 2));
            output.push_str("  )\n");
        }

        output.push_str(")\n");
        output
    }

    /// Print the debug dump to the terminal.
    pub fn print(&self) {
        saying::say!(self.dump());
    }
}

fn display_signature(func_type: &FunctionType) -> String {
    let mut output = String::new();
    if !func_type.params.is_empty() {
        output.push_str(&format!(" (param{})", display_val_types(&func_type.params)));
    }
    if !func_type.results.is_empty() {
        output.push_str(&format!(" (result{})", display_val_types(&func_type.results)));
    }
    output
}

fn display_val_types(types: &[ValType]) -> String {
    types
        .iter()
        .map(|val_type| match val_type {
            ValType::I32 => " i32",
            ValType::I64 => " i64",
            ValType::F32 => " f32",
            ValType::F64 => " f64",
            _ => " ref",
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/module_builder_tests.rs"]
mod tests;
