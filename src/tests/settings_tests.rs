use super::CodegenConfig;
use crate::compiler_frontend::compiler_messages::compiler_errors::ErrorType;

#[test]
fn defaults_match_codegen_contract() {
    let defaults = CodegenConfig::default();
    assert!(defaults.emit_name_section);
    assert!(!defaults.export_functions);
    assert!(!defaults.validate_output);
    assert!(!defaults.print_module);
}

#[test]
fn empty_toml_keeps_defaults() {
    assert_eq!(CodegenConfig::from_toml_str("").unwrap(), CodegenConfig::default());
}

#[test]
fn toml_overrides_selected_keys() {
    let config = CodegenConfig::from_toml_str(
        r#"
        export_functions = true
        validate_output = true
        "#,
    )
    .unwrap();

    assert!(config.emit_name_section);
    assert!(config.export_functions);
    assert!(config.validate_output);
    assert!(!config.print_module);
}

#[test]
fn unknown_keys_are_a_config_error() {
    let error = CodegenConfig::from_toml_str("optimize = true").unwrap_err();
    assert_eq!(error.error_type, ErrorType::Config);
    assert!(error.msg.starts_with("Could not parse codegen config"));
}

#[test]
fn wrong_value_type_is_a_config_error() {
    let error = CodegenConfig::from_toml_str("print_module = \"yes\"").unwrap_err();
    assert_eq!(error.error_type, ErrorType::Config);
}
