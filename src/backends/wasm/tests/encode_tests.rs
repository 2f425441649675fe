//! End to end tests for a whole generation request.

use super::{generate_module_wasm, generate_wasm, generate_wasm_from_json};
use crate::compiler_frontend::compiler_messages::compiler_errors::{ErrorMetaDataKey, ErrorType};
use crate::compiler_frontend::typed_ir::nodes::{Function, Instruction, MathOp, Module, ValueType};
use crate::settings::CodegenConfig;
use proptest::prelude::*;
use wasmparser::{Parser, Payload};

fn add_function(name: &str) -> Function {
    Function {
        name: name.to_string(),
        params: vec![ValueType::Int32, ValueType::Int32],
        return_type: ValueType::Int32,
        locals: vec![],
        body: Instruction::binary(
            MathOp::Add,
            ValueType::Int32,
            Instruction::local_get(0, ValueType::Int32),
            Instruction::local_get(1, ValueType::Int32),
        ),
    }
}

fn failing_function(name: &str) -> Function {
    Function {
        name: name.to_string(),
        params: vec![],
        return_type: ValueType::Float64,
        locals: vec![],
        body: Instruction::binary(
            MathOp::Mod,
            ValueType::Float64,
            Instruction::ConstFloat64(5.0),
            Instruction::ConstFloat64(2.0),
        ),
    }
}

fn validating() -> CodegenConfig {
    CodegenConfig {
        validate_output: true,
        ..CodegenConfig::default()
    }
}

fn defined_function_count(bytes: &[u8]) -> u32 {
    let mut count = 0;
    for payload in Parser::new(0).parse_all(bytes) {
        if let Payload::FunctionSection(reader) = payload.unwrap() {
            count += reader.count();
        }
    }
    count
}

#[test]
fn modules_share_one_output_module() {
    let modules = vec![
        Module::new("a").with_function(add_function("add")),
        Module::new("b")
            .with_function(add_function("add"))
            .with_function(add_function("plus")),
    ];

    let bytes = generate_wasm(&modules, &validating()).unwrap();
    assert_eq!(&bytes[0..4], b"\0asm");
    assert_eq!(defined_function_count(&bytes), 3);
}

#[test]
fn single_module_entry_point() {
    let module = Module::new("m").with_function(add_function("f"));
    let bytes = generate_module_wasm(&module, &validating()).unwrap();
    assert_eq!(defined_function_count(&bytes), 1);
}

#[test]
fn float_remainder_produces_no_bytes() {
    let module = Module::new("m")
        .with_function(add_function("ok"))
        .with_function(failing_function("rem"));

    let error = generate_module_wasm(&module, &CodegenConfig::default()).unwrap_err();
    assert_eq!(error.error_type, ErrorType::Unreachable);
    assert_eq!(error.get_metadata(ErrorMetaDataKey::FunctionName), Some("mrem"));
    assert_eq!(error.get_metadata(ErrorMetaDataKey::InstructionKind), Some("Mod"));
    assert_eq!(error.get_metadata(ErrorMetaDataKey::FoundType), Some("Float64"));
}

#[test]
fn failure_in_a_later_module_discards_earlier_ones() {
    let modules = vec![
        Module::new("first").with_function(add_function("f")),
        Module::new("second").with_function(failing_function("g")),
    ];

    let error = generate_wasm(&modules, &CodegenConfig::default()).unwrap_err();
    assert_eq!(
        error.get_metadata(ErrorMetaDataKey::FunctionName),
        Some("secondg")
    );
}

#[test]
fn validation_failure_is_reported_as_unreachable() {
    let module = Module::new("m").with_function(Function {
        name: "bad".to_string(),
        params: vec![],
        return_type: ValueType::Int32,
        locals: vec![],
        // Declared Int32 but the operands are floats
        body: Instruction::binary(
            MathOp::Add,
            ValueType::Int32,
            Instruction::ConstFloat64(1.0),
            Instruction::ConstInt32(2),
        ),
    });

    assert!(generate_module_wasm(&module, &CodegenConfig::default()).is_ok());

    let error = generate_module_wasm(&module, &validating()).unwrap_err();
    assert_eq!(error.error_type, ErrorType::Unreachable);
    assert!(error.msg.contains("mbad"), "{}", error.msg);
}

#[test]
fn print_module_does_not_change_output() {
    let module = Module::new("m").with_function(add_function("f"));
    let printing = CodegenConfig {
        print_module: true,
        ..CodegenConfig::default()
    };

    assert_eq!(
        generate_module_wasm(&module, &printing).unwrap(),
        generate_module_wasm(&module, &CodegenConfig::default()).unwrap()
    );
}

#[test]
fn json_input_generates_the_same_bytes() {
    let module = Module::new("m").with_function(add_function("f"));
    let json = serde_json::to_string(&vec![module.clone()]).unwrap();

    assert_eq!(
        generate_wasm_from_json(&json, &CodegenConfig::default()).unwrap(),
        generate_module_wasm(&module, &CodegenConfig::default()).unwrap()
    );
}

#[test]
fn malformed_json_is_a_type_mismatch() {
    let error = generate_wasm_from_json("[{\"name\": 3}]", &CodegenConfig::default()).unwrap_err();
    assert_eq!(error.error_type, ErrorType::TypeMismatch);
}

proptest! {
    #[test]
    fn n_functions_yield_n_entries(count in 0usize..12) {
        let mut module = Module::new("p");
        for index in 0..count {
            module = module.with_function(add_function(&format!("f{index}")));
        }

        let bytes = generate_module_wasm(&module, &validating()).unwrap();
        prop_assert_eq!(defined_function_count(&bytes) as usize, count);
    }

    #[test]
    fn any_failing_function_yields_no_binary(count in 1usize..8, failing in 0usize..8) {
        let failing = failing % count;
        let mut module = Module::new("p");
        for index in 0..count {
            let name = format!("f{index}");
            let function = if index == failing {
                failing_function(&name)
            } else {
                add_function(&name)
            };
            module = module.with_function(function);
        }

        let result = generate_module_wasm(&module, &CodegenConfig::default());
        let expected_name = format!("pf{failing}");
        prop_assert!(result.is_err());
        let error = result.unwrap_err();
        prop_assert_eq!(
            error.get_metadata(ErrorMetaDataKey::FunctionName),
            Some(expected_name.as_str())
        );
    }
}
