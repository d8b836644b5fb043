// tests/config_loading.rs

use std::io::Write;

use tempfile::NamedTempFile;

use taskrelay::config::load_and_validate;
use taskrelay::errors::TaskRelayError;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_and_validates_a_pipeline_file() {
    let file = write_config(
        r#"
[task.A]
next = ["B", "C"]

[task.B]
after = ["A"]
next = ["D"]

[task.C]
after = ["A"]
next = ["D", "E"]

[task.D]
after = ["B", "C"]
next = ["E"]

[task.E]
after = ["C", "D"]
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.tasks().len(), 5);
    assert_eq!(cfg.roots(), vec!["A".to_string()]);

    let specs = cfg.specs();
    let d = specs.iter().find(|s| s.id == "D").unwrap();
    assert_eq!(d.parents, vec!["B".to_string(), "C".to_string()]);
    assert_eq!(d.children, vec!["E".to_string()]);
}

#[test]
fn empty_config_is_rejected() {
    let file = write_config("");

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, TaskRelayError::ConfigError(_)));
}

#[test]
fn unknown_parent_reference_is_rejected() {
    let file = write_config(
        r#"
[task.A]
after = ["missing"]
"#,
    );

    let err = load_and_validate(file.path()).unwrap_err();
    match err {
        TaskRelayError::ConfigError(msg) => {
            assert!(msg.contains("unknown parent 'missing'"), "got: {msg}");
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn unknown_child_reference_is_rejected() {
    let file = write_config(
        r#"
[task.A]
next = ["missing"]
"#,
    );

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, TaskRelayError::ConfigError(_)));
}

#[test]
fn self_reference_is_rejected() {
    let file = write_config(
        r#"
[task.A]
next = ["A"]
"#,
    );

    let err = load_and_validate(file.path()).unwrap_err();
    match err {
        TaskRelayError::ConfigError(msg) => {
            assert!(msg.contains("cannot list itself"), "got: {msg}");
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn unknown_fields_are_a_parse_error() {
    let file = write_config(
        r#"
[task.A]
cmd = "echo hi"
"#,
    );

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, TaskRelayError::TomlError(_)));
}
