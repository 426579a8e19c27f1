//! Integration tests for loading scripter options from TOML files

use std::io::Write;

use tempfile::NamedTempFile;

use rust_sqlscripter::model::ServerRoleSyntax;
use rust_sqlscripter::{ScriptError, ScripterOptions};

use crate::common::{orders_catalog, scripter};

/// Helper to create a temp TOML file with content
fn create_config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_options_file() {
    let file = create_config_file(
        r#"
database = "Sales"
include_drop = false
include_permissions = false
comment_scripts = false
server_role_syntax = "sp_add_srv_role_member"
"#,
    );
    let options = ScripterOptions::load(file.path()).unwrap();

    assert_eq!(options.database.as_deref(), Some("Sales"));
    assert!(!options.include_drop);
    assert!(!options.include_permissions);
    assert!(!options.comment_scripts);
    assert!(options.include_indexes);
    assert!(options.include_use);
    assert_eq!(options.server_role_syntax, ServerRoleSyntax::SpAddSrvRoleMember);
}

#[test]
fn test_empty_file_gives_defaults() {
    let file = create_config_file("");
    assert_eq!(
        ScripterOptions::load(file.path()).unwrap(),
        ScripterOptions::default()
    );
}

#[test]
fn test_invalid_file_names_path() {
    let file = create_config_file("include_drop = \"sometimes\"\n");
    let err = ScripterOptions::load(file.path()).unwrap_err();
    match &err {
        ScriptError::Config { path, .. } => assert_eq!(path, file.path()),
        other => panic!("Expected config error, got {:?}", other),
    }
    assert!(err.to_string().contains("Invalid configuration"));
}

#[test]
fn test_flags_layer_over_file() {
    let file = create_config_file("include_indexes = false\n");
    let options = ScripterOptions::load(file.path())
        .unwrap()
        .to_builder()
        .include_drop(false)
        .build();
    assert!(!options.include_indexes);
    assert!(!options.include_drop);

    let mut s = scripter(orders_catalog(), options);
    let script = s.script_table("dbo.Orders").unwrap();
    assert!(!script.contains("-- INDEXES"));
    assert!(script.contains("-- FOREIGN KEYS"));
}
