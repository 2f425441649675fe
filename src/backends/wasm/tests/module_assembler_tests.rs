use super::assemble_module;
use crate::backends::wasm::module_builder::WasmModuleBuilder;
use crate::compiler_frontend::compiler_messages::compiler_errors::{ErrorMetaDataKey, ErrorType};
use crate::compiler_frontend::typed_ir::nodes::{Function, Instruction, Module, ValueType};

fn returns_const(name: &str, value: i32) -> Function {
    Function {
        name: name.to_string(),
        params: vec![],
        return_type: ValueType::Int32,
        locals: vec![],
        body: Instruction::ConstInt32(value),
    }
}

#[test]
fn registers_functions_in_declaration_order() {
    let module = Module::new("app")
        .with_function(returns_const("main", 0))
        .with_function(returns_const("helper", 1))
        .with_function(returns_const("other", 2));

    let mut builder = WasmModuleBuilder::new();
    assemble_module(&module, &mut builder).unwrap();

    assert_eq!(
        builder.function_names().collect::<Vec<_>>(),
        vec!["appmain", "apphelper", "appother"]
    );
    // All three share one signature
    assert_eq!(builder.type_count(), 1);
}

#[test]
fn empty_module_registers_nothing() {
    let mut builder = WasmModuleBuilder::new();
    assemble_module(&Module::new("empty"), &mut builder).unwrap();
    assert_eq!(builder.function_count(), 0);
}

#[test]
fn first_failing_function_stops_assembly() {
    let mut broken = returns_const("broken", 0);
    broken.body = Instruction::ContainerAlloc { bytes: 16 };

    let mut also_broken = returns_const("also_broken", 0);
    also_broken.return_type = ValueType::Nothing;

    let module = Module::new("m")
        .with_function(returns_const("ok", 1))
        .with_function(broken)
        .with_function(also_broken)
        .with_function(returns_const("never_reached", 2));

    let mut builder = WasmModuleBuilder::new();
    let error = assemble_module(&module, &mut builder).unwrap_err();

    assert_eq!(error.error_type, ErrorType::NotImplemented);
    assert_eq!(error.get_metadata(ErrorMetaDataKey::FunctionName), Some("mbroken"));
    assert_eq!(builder.get_function_index("mnever_reached"), None);
}

#[test]
fn module_and_function_names_can_collide() {
    let module = Module::new("a")
        .with_function(returns_const("a", 1))
        .with_function(returns_const("a", 2));

    let mut builder = WasmModuleBuilder::new();
    assemble_module(&module, &mut builder).unwrap();

    assert_eq!(builder.function_count(), 2);
    assert!(builder.function_names().all(|name| name == "aa"));
}
