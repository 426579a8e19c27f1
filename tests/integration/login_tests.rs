//! Integration tests for login scripting

use pretty_assertions::assert_eq;

use rust_sqlscripter::catalog::{MemoryCatalog, SqlValue};
use rust_sqlscripter::model::ServerRoleSyntax;
use rust_sqlscripter::{ScriptError, ScripterOptions};

use crate::common::{login_row, options, scripter};

fn logins_catalog() -> MemoryCatalog {
    MemoryCatalog::new().respond(
        "-- fetching logins",
        vec![
            login_row("zed", None),
            login_row("app", Some("bulkadmin")),
            login_row("app", Some("dbcreator")),
            login_row("CORP\\ops", None)
                .with("type", "U")
                .with("sid", vec![0x01u8, 0x05])
                .with("password_hash", SqlValue::Null)
                .with("is_policy_checked", SqlValue::Null)
                .with("is_disabled", true),
        ],
    )
}

#[test]
fn test_logins_sorted_with_guarded_drops() {
    let mut s = scripter(logins_catalog(), options());
    let script = s.script_logins().unwrap();

    assert_eq!(
        script,
        "IF SUSER_ID('app') IS NOT NULL\n  DROP LOGIN [app];\nGO\n\n\
         CREATE LOGIN [app] WITH PASSWORD = 0xabcd HASHED, SID = 0x0102, DEFAULT_DATABASE = [master], CHECK_POLICY = ON;\n\
         ALTER SERVER ROLE [bulkadmin] ADD MEMBER [app];\n\
         ALTER SERVER ROLE [dbcreator] ADD MEMBER [app];\nGO\n\n\
         IF SUSER_ID('CORP\\ops') IS NOT NULL\n  DROP LOGIN [CORP\\ops];\nGO\n\n\
         CREATE LOGIN [CORP\\ops] FROM WINDOWS WITH DEFAULT_DATABASE = [master];\n\
         ALTER LOGIN [CORP\\ops] DISABLE;\nGO\n\n\
         IF SUSER_ID('zed') IS NOT NULL\n  DROP LOGIN [zed];\nGO\n\n\
         CREATE LOGIN [zed] WITH PASSWORD = 0xabcd HASHED, SID = 0x0102, DEFAULT_DATABASE = [master], CHECK_POLICY = ON;\nGO\n\n"
    );
    assert_eq!(s.catalog().call_count(), 1);
}

#[test]
fn test_legacy_role_syntax_without_drops() {
    let options = ScripterOptions::builder()
        .include_drop(false)
        .server_role_syntax(ServerRoleSyntax::SpAddSrvRoleMember)
        .build();
    let mut s = scripter(logins_catalog(), options);
    let script = s.script_logins().unwrap();

    assert!(!script.contains("DROP LOGIN"));
    assert!(script.contains("EXEC sp_addsrvrolemember 'app', 'bulkadmin';\nEXEC sp_addsrvrolemember 'app', 'dbcreator';\nGO"));
    assert!(!script.contains("ALTER SERVER ROLE"));
}

#[test]
fn test_plaintext_password_for_login_without_hash() {
    let catalog = MemoryCatalog::new().respond(
        "-- fetching logins",
        vec![login_row("svc", None).with("password_hash", SqlValue::Null)],
    );
    let mut s = scripter(catalog, options());
    let logins: Vec<_> = s
        .load_logins()
        .unwrap()
        .into_iter()
        .map(|l| l.with_password("it's secret"))
        .collect();

    assert_eq!(
        s.render_logins(&logins).unwrap(),
        "IF SUSER_ID('svc') IS NOT NULL\n  DROP LOGIN [svc];\nGO\n\n\
         CREATE LOGIN [svc] WITH PASSWORD = 'it''s secret', SID = 0x0102, DEFAULT_DATABASE = [master], CHECK_POLICY = ON;\nGO\n\n"
    );
}

#[test]
fn test_sql_login_without_visible_hash_fails() {
    let catalog = MemoryCatalog::new().respond(
        "-- fetching logins",
        vec![login_row("app", None).with("password_hash", SqlValue::Null)],
    );
    let mut s = scripter(catalog, options());
    let err = s.script_logins().unwrap_err();
    assert!(matches!(err, ScriptError::MissingPassword { ref login } if login == "[app]"));
    assert!(err.to_string().contains("[app]"));
}

#[test]
fn test_windows_group_scripted_from_windows() {
    let catalog = MemoryCatalog::new().respond(
        "-- fetching logins",
        vec![login_row("CORP\\dba", None)
            .with("type", "G")
            .with("password_hash", SqlValue::Null)
            .with("is_policy_checked", SqlValue::Null)],
    );
    let options = ScripterOptions::builder().include_drop(false).build();
    let mut s = scripter(catalog, options);
    assert_eq!(
        s.script_logins().unwrap(),
        "CREATE LOGIN [CORP\\dba] FROM WINDOWS WITH DEFAULT_DATABASE = [master];\nGO\n\n"
    );
}

#[test]
fn test_no_use_preamble_for_logins() {
    let options = ScripterOptions::builder().database("Sales").build();
    let mut s = scripter(logins_catalog(), options);
    assert!(!s.script_logins().unwrap().contains("USE [Sales]"));
}
