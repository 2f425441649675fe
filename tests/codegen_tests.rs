use std::fs;
use std::path::{Path, PathBuf};
use wasm_lowering::{CodegenConfig, ErrorType, generate_wasm_from_json};

fn case_files(folder: &str) -> Vec<PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/cases").join(folder);
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();
    paths
}

// "not_found_break_label.json" → NotFound
fn expected_error_type(path: &Path) -> ErrorType {
    let stem = path.file_stem().unwrap().to_str().unwrap();
    let prefixes = [
        ("not_found", ErrorType::NotFound),
        ("not_implemented", ErrorType::NotImplemented),
        ("type_mismatch", ErrorType::TypeMismatch),
        ("unreachable", ErrorType::Unreachable),
    ];

    prefixes
        .iter()
        .find(|(prefix, _)| stem.starts_with(prefix))
        .map(|(_, error_type)| *error_type)
        .unwrap_or_else(|| panic!("{stem} does not name an error type"))
}

fn config() -> CodegenConfig {
    CodegenConfig {
        validate_output: true,
        export_functions: true,
        ..CodegenConfig::default()
    }
}

#[test]
fn test_all_success_cases() {
    let mut errors = Vec::new();

    for path in case_files("success") {
        let source = fs::read_to_string(&path).unwrap();
        match generate_wasm_from_json(&source, &config()) {
            Ok(wasm) => {
                if let Err(e) = wasmparser::validate(&wasm) {
                    errors.push(format!("{}: invalid module: {e}", path.display()));
                }
            }
            Err(e) => errors.push(format!("{}: {e}", path.display())),
        }
    }

    if !errors.is_empty() {
        panic!("Some tests failed:\n{}", errors.join("\n"));
    }
}

#[test]
fn test_all_failure_cases() {
    let mut errors = Vec::new();

    for path in case_files("failure") {
        let source = fs::read_to_string(&path).unwrap();
        let expected = expected_error_type(&path);

        match generate_wasm_from_json(&source, &config()) {
            Ok(_) => errors.push(format!("{}: expected {expected:?}, got bytes", path.display())),
            Err(e) if e.error_type != expected => errors.push(format!(
                "{}: expected {expected:?}, got {:?} ({e})",
                path.display(),
                e.error_type
            )),
            Err(_) => {}
        }
    }

    if !errors.is_empty() {
        panic!("Some tests failed:\n{}", errors.join("\n"));
    }
}

#[test]
fn add_over_literals_exports_mf() {
    let source = fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/cases/success/add_literals.json"),
    )
    .unwrap();

    let wasm = generate_wasm_from_json(&source, &config()).unwrap();

    let mut exports = Vec::new();
    for payload in wasmparser::Parser::new(0).parse_all(&wasm) {
        if let wasmparser::Payload::ExportSection(reader) = payload.unwrap() {
            for export in reader {
                exports.push(export.unwrap().name.to_string());
            }
        }
    }

    assert_eq!(exports, vec!["mf"]);
}

#[test]
fn config_from_toml_drives_generation() {
    let config = CodegenConfig::from_toml_str("emit_name_section = false").unwrap();
    let source = fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/cases/success/mixed_types.json"),
    )
    .unwrap();

    let wasm = generate_wasm_from_json(&source, &config).unwrap();

    let has_custom_section = wasmparser::Parser::new(0)
        .parse_all(&wasm)
        .any(|payload| matches!(payload, Ok(wasmparser::Payload::CustomSection(_))));
    assert!(!has_custom_section);
}
