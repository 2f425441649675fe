//! Tests for the value type to machine type table.

use super::{MachineType, map_type, map_value_slot};
use crate::backends::wasm::error::WasmGenerationError;
use crate::compiler_frontend::compiler_messages::compiler_errors::ErrorType;
use crate::compiler_frontend::typed_ir::nodes::ValueType;
use proptest::prelude::*;
use wasm_encoder::{BlockType, ValType};

#[test]
fn maps_every_documented_type() {
    let expected = [
        (ValueType::Int32, MachineType::Word32),
        (ValueType::Bool, MachineType::Word32),
        (ValueType::Ptr, MachineType::Word32),
        (ValueType::Str, MachineType::Word32),
        (ValueType::Int64, MachineType::Word64),
        (ValueType::Union, MachineType::Word64),
        (ValueType::Float32, MachineType::Float32),
        (ValueType::Float64, MachineType::Float64),
        (ValueType::Never, MachineType::Unreachable),
    ];

    for (value_type, machine_type) in expected {
        assert_eq!(
            map_type(value_type),
            Ok(machine_type),
            "unexpected mapping for {value_type}"
        );
    }
}

#[test]
fn nothing_fails_with_type_mismatch() {
    let error = map_type(ValueType::Nothing).expect_err("Nothing has no machine type");
    assert_eq!(error.error_type(), ErrorType::TypeMismatch);

    let WasmGenerationError::TypeMismatch { found, .. } = error else {
        panic!("expected a type mismatch");
    };
    assert_eq!(found, "Nothing");
}

#[test]
fn unknown_ordinal_fails_with_type_mismatch() {
    let error = ValueType::from_ordinal(10).expect_err("only ten value types exist");
    assert_eq!(error.error_type(), ErrorType::TypeMismatch);
}

#[test]
fn ordinals_follow_declaration_order() {
    assert_eq!(ValueType::from_ordinal(0), Ok(ValueType::Int32));
    assert_eq!(ValueType::from_ordinal(6), Ok(ValueType::Nothing));
    assert_eq!(ValueType::from_ordinal(9), Ok(ValueType::Float32));
}

#[test]
fn unreachable_has_no_runtime_value() {
    assert_eq!(MachineType::Unreachable.to_val_type(), None);
    assert!(matches!(
        MachineType::Unreachable.to_block_type(),
        BlockType::Empty
    ));
    assert!(matches!(
        MachineType::Word64.to_block_type(),
        BlockType::Result(ValType::I64)
    ));
}

#[test]
fn never_is_rejected_as_a_value_slot() {
    let error = map_value_slot(ValueType::Never, "local slot").expect_err("Never has no slot");
    assert_eq!(error.error_type(), ErrorType::TypeMismatch);

    assert_eq!(map_value_slot(ValueType::Bool, "local slot"), Ok(ValType::I32));
}

proptest! {
    #[test]
    fn mapping_is_total_except_nothing(ordinal in 0u32..10) {
        let value_type = ValueType::from_ordinal(ordinal).unwrap();
        let mapped = map_type(value_type);

        if value_type == ValueType::Nothing {
            prop_assert_eq!(mapped.unwrap_err().error_type(), ErrorType::TypeMismatch);
        } else {
            prop_assert!(mapped.is_ok());
        }
    }

    #[test]
    fn mapping_is_deterministic(ordinal in 0u32..10) {
        let value_type = ValueType::from_ordinal(ordinal).unwrap();
        prop_assert_eq!(map_type(value_type), map_type(value_type));
    }
}
