use std::fs;
use ts2pydantic::{Config, ConvertError, Converter, convert_with_config, with_banner};

fn write_config(dir: &std::path::Path, files: &[&str]) -> std::path::PathBuf {
    let config = format!(
        r#"{{
            "input": {{ "typeDir": "types", "files": [{}] }},
            "output": {{ "dir": "out", "filename": "models.py" }},
            "typeMapping": {{ "string": "str", "number": "float", "Date": "datetime" }},
            "customTypes": {{}},
            "enumTypes": {{}},
            "imports": [
                "from pydantic import BaseModel, Field",
                "from typing import Optional, List, Dict, Union"
            ]
        }}"#,
        files
            .iter()
            .map(|f| format!("\"{}\"", f))
            .collect::<Vec<_>>()
            .join(", ")
    );
    let path = dir.join("config.json");
    fs::write(&path, config).unwrap();
    path
}

#[test]
fn missing_file_warns_and_run_proceeds() {
    let dir = tempfile::tempdir().unwrap();
    let types = dir.path().join("types");
    fs::create_dir_all(&types).unwrap();
    fs::write(types.join("course.d.ts"), "interface Course {\n  id: string\n}\n").unwrap();
    fs::write(types.join("general.d.ts"), "type ID = string\n").unwrap();

    let config_path = write_config(dir.path(), &["course.d.ts", "missing.d.ts", "general.d.ts"]);
    let result = convert_with_config(&config_path).unwrap();

    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("missing.d.ts"));
    assert!(result.code.contains("class Course(BaseModel):"));
    assert!(result.code.contains("ID = str"));
    assert_eq!(result.declarations.len(), 2);
}

#[test]
fn all_files_missing_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("types")).unwrap();

    let config_path = write_config(dir.path(), &["missing.d.ts", "also-missing.d.ts"]);
    let result = convert_with_config(&config_path);

    assert!(matches!(result, Err(ConvertError::MissingInputs)));
}

#[test]
fn unreadable_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let result = convert_with_config(&dir.path().join("no-such-config.json"));
    assert!(matches!(result, Err(ConvertError::Config(_))));
}

#[test]
fn malformed_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    let result = convert_with_config(&path);
    assert!(matches!(result, Err(ConvertError::Config(_))));
}

#[test]
fn parse_error_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let types = dir.path().join("types");
    fs::create_dir_all(&types).unwrap();
    fs::write(types.join("broken.d.ts"), "interface A {\n  x: string\n").unwrap();

    let config_path = write_config(dir.path(), &["broken.d.ts"]);
    match convert_with_config(&config_path) {
        Err(ConvertError::Parse { file, rendered }) => {
            assert!(file.ends_with("broken.d.ts"));
            assert!(rendered.contains("broken.d.ts"));
        }
        other => panic!("expected parse error, got {:?}", other.map(|r| r.code)),
    }
}

#[test]
fn paths_resolve_against_config_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(dir.path(), &["course.d.ts"]);
    let config = Config::load(&config_path).unwrap();
    let converter = Converter::new(config, dir.path());

    assert_eq!(
        converter.input_files(),
        vec![dir.path().join("types").join("course.d.ts")]
    );
    assert_eq!(
        converter.output_path(),
        dir.path().join("out").join("models.py")
    );
}

#[test]
fn runs_are_identical_modulo_banner_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let types = dir.path().join("types");
    fs::create_dir_all(&types).unwrap();
    fs::write(types.join("course.d.ts"), "interface Course {\n  id: string\n}\n").unwrap();

    let config_path = write_config(dir.path(), &["course.d.ts"]);
    let first = convert_with_config(&config_path).unwrap();
    let second = convert_with_config(&config_path).unwrap();

    assert_eq!(first.code, second.code);

    let stamp = chrono::Utc::now();
    assert_eq!(with_banner(&first.code, stamp), with_banner(&second.code, stamp));
    assert!(with_banner(&first.code, stamp).contains("do not edit it by hand"));
}
