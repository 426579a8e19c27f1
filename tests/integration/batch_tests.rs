//! Integration tests for whole-schema scripting

use pretty_assertions::assert_eq;

use rust_sqlscripter::catalog::{MemoryCatalog, Row};
use rust_sqlscripter::{ScriptError, ScripterOptions};

use crate::common::{
    column_row, constraint_row, extended_property_row, foreign_key_row, index_rows, object_row,
    options, permission_row, schema_catalog, scripter, table_row,
};

fn count_calls(tables: usize) -> usize {
    let mut s = scripter(schema_catalog(tables), options());
    s.script_schema().unwrap();
    s.catalog().call_count()
}

// ============================================================================
// Query Count Tests
// ============================================================================

#[test]
fn test_query_count_independent_of_table_count() {
    let five = count_calls(5);
    let fifty = count_calls(50);
    assert_eq!(five, fifty);
    // objects, tables, columns, foreign keys, constraints, indexes,
    // permissions, extended properties
    assert_eq!(five, 8);
}

#[test]
fn test_query_count_with_modules() {
    let options = ScripterOptions::builder().include_modules(true).build();
    let mut s = scripter(schema_catalog(3), options);
    s.script_schema().unwrap();
    assert_eq!(s.catalog().call_count(), 10);
    assert_eq!(s.query_count(), 10);
}

#[test]
fn test_every_table_is_scripted_with_its_own_slice() {
    let mut s = scripter(schema_catalog(3), options());
    let objects = s.load_schema().unwrap();

    assert_eq!(objects.len(), 3);
    for object in &objects {
        assert_eq!(object.related.indexes.len(), 1);
        assert_eq!(object.related.indexes[0].table, object.object.name);
        assert_eq!(object.related.permissions.len(), 1);
        assert_eq!(object.related.permissions[0].major_name, object.object.name);
    }
}

// ============================================================================
// Ordering and Assembly Tests
// ============================================================================

#[test]
fn test_tables_sorted_by_name_and_use_appears_once() {
    let catalog = MemoryCatalog::new()
        .respond(
            "-- fetching all objects",
            vec![object_row("dbo", "beta", "U"), object_row("dbo", "Alpha", "U")],
        )
        .respond(
            "-- fetching all tables",
            vec![table_row("dbo", "beta"), table_row("dbo", "Alpha")],
        )
        .respond(
            "-- fetching all columns",
            vec![
                column_row("dbo", "beta", "b", 1, "int", 4),
                column_row("dbo", "Alpha", "a", 1, "int", 4),
            ],
        );
    let options = ScripterOptions::builder()
        .database("Sales")
        .include_drop(false)
        .build();
    let mut s = scripter(catalog, options);
    let script = s.script_schema().unwrap();

    assert_eq!(
        script,
        "USE [Sales];\nGO\n\n\
         CREATE TABLE [dbo].[Alpha] (\n    [a] int NULL\n)\nON [PRIMARY];\nGO\n\n\
         CREATE TABLE [dbo].[beta] (\n    [b] int NULL\n)\nON [PRIMARY];\nGO\n\n"
    );
}

#[test]
fn test_owner_matching_is_case_insensitive() {
    let catalog = MemoryCatalog::new()
        .respond("-- fetching all objects", vec![object_row("dbo", "Orders", "U")])
        .respond("-- fetching all tables", vec![table_row("dbo", "Orders")])
        .respond(
            "-- fetching all columns",
            vec![column_row("DBO", "ORDERS", "id", 1, "int", 4)],
        )
        .respond(
            "-- fetching all foreign keys",
            vec![foreign_key_row("dbo", "orders", "FK_Orders_Customers", "customer_id", "Customers", "id")],
        )
        .respond(
            "-- fetching all extended properties",
            vec![extended_property_row("Dbo", "table", "ORDERS", None, "MS_Description", "x")],
        );
    let mut s = scripter(catalog, options());
    let objects = s.load_schema().unwrap();

    assert_eq!(objects.len(), 1);
    let related = &objects[0].related;
    assert_eq!(related.foreign_keys.len(), 1);
    assert_eq!(related.extended_properties.len(), 1);
    assert!(objects[0].body.script().unwrap().contains("[id] int NULL"));
}

#[test]
fn test_dotted_names_do_not_share_an_owner() {
    let catalog = MemoryCatalog::new()
        .respond(
            "-- fetching all objects",
            vec![object_row("a", "b.c", "U"), object_row("a.b", "c", "U")],
        )
        .respond(
            "-- fetching all tables",
            vec![table_row("a", "b.c"), table_row("a.b", "c")],
        )
        .respond(
            "-- fetching all columns",
            vec![
                column_row("a", "b.c", "left_col", 1, "int", 4),
                column_row("a.b", "c", "right_col", 1, "int", 4),
            ],
        )
        .respond(
            "-- fetching all permissions",
            vec![permission_row("a.b", "c", "SELECT", "reporting")],
        );
    let mut s = scripter(catalog, options());
    let objects = s.load_schema().unwrap();

    assert_eq!(objects.len(), 2);
    let (first, second) = (&objects[0], &objects[1]);
    assert_eq!((first.object.schema.as_str(), first.object.name.as_str()), ("a", "b.c"));
    assert_eq!((second.object.schema.as_str(), second.object.name.as_str()), ("a.b", "c"));

    let first_body = first.body.script().unwrap();
    assert!(first_body.contains("[left_col]"));
    assert!(!first_body.contains("[right_col]"));
    assert!(second.body.script().unwrap().contains("[right_col]"));

    assert!(first.related.permissions.is_empty());
    assert_eq!(second.related.permissions.len(), 1);
}

#[test]
fn test_foreign_keys_and_constraints_script_in_name_order() {
    let catalog = MemoryCatalog::new()
        .respond("-- fetching all objects", vec![object_row("dbo", "Orders", "U")])
        .respond("-- fetching all tables", vec![table_row("dbo", "Orders")])
        .respond(
            "-- fetching all columns",
            vec![column_row("dbo", "Orders", "qty", 1, "int", 4)],
        )
        .respond(
            "-- fetching all foreign keys",
            vec![
                foreign_key_row("dbo", "Orders", "FK_z", "qty", "Zones", "id"),
                foreign_key_row("dbo", "Orders", "fk_M", "qty", "Markets", "id"),
            ],
        )
        .respond(
            "-- fetching all constraints",
            vec![
                constraint_row("dbo", "Orders", "CK_b", "([qty]<(100))"),
                constraint_row("dbo", "Orders", "ck_A", "([qty]>(0))"),
            ],
        );
    let options = ScripterOptions::builder()
        .include_drop(false)
        .comment_scripts(false)
        .build();
    let mut s = scripter(catalog, options);
    let script = s.script_schema().unwrap();

    let position = |needle: &str| {
        script
            .find(needle)
            .unwrap_or_else(|| panic!("{} missing from:\n{}", needle, script))
    };
    assert!(position("[fk_M]") < position("[FK_z]"));
    assert!(position("[ck_A]") < position("[CK_b]"));
    assert!(position("[FK_z]") < position("[ck_A]"));
}

#[test]
fn test_multi_column_foreign_key_is_one_statement() {
    let mut second = foreign_key_row("dbo", "Lines", "FK_Lines_Orders", "order_region", "Orders", "region");
    second.insert("delete_action", "CASCADE");
    let mut first = foreign_key_row("dbo", "Lines", "FK_Lines_Orders", "order_id", "Orders", "id");
    first.insert("delete_action", "CASCADE");

    let catalog = MemoryCatalog::new()
        .respond("-- fetching all objects", vec![object_row("dbo", "Lines", "U")])
        .respond("-- fetching all tables", vec![table_row("dbo", "Lines")])
        .respond(
            "-- fetching all columns",
            vec![column_row("dbo", "Lines", "order_id", 1, "int", 4)],
        )
        .respond("-- fetching all foreign keys", vec![first, second]);
    let mut s = scripter(catalog, options());
    let objects = s.load_schema().unwrap();

    let fks = &objects[0].related.foreign_keys;
    assert_eq!(fks.len(), 1);
    assert_eq!(
        fks[0].script(),
        "ALTER TABLE [dbo].[Lines] ADD CONSTRAINT [FK_Lines_Orders] FOREIGN KEY ([order_id], [order_region]) \
         REFERENCES [dbo].[Orders] ([id], [region]) ON DELETE CASCADE;"
    );
}

#[test]
fn test_modules_follow_tables_by_kind() {
    let catalog = MemoryCatalog::new()
        .respond(
            "-- fetching all objects",
            vec![
                object_row("dbo", "pLoad", "P"),
                object_row("dbo", "vOrders", "V"),
                object_row("dbo", "T000", "U"),
            ],
        )
        .respond("-- fetching all tables", vec![table_row("dbo", "T000")])
        .respond(
            "-- fetching all columns",
            vec![column_row("dbo", "T000", "id", 1, "int", 4)],
        )
        .respond(
            "-- fetching all modules",
            vec![
                Row::new()
                    .with("schema", "dbo")
                    .with("name", "pLoad")
                    .with("definition", "CREATE PROCEDURE dbo.pLoad AS SELECT 1"),
                Row::new()
                    .with("schema", "dbo")
                    .with("name", "vOrders")
                    .with("definition", "CREATE VIEW dbo.vOrders AS SELECT 1 AS x"),
            ],
        );
    let options = ScripterOptions::builder().include_modules(true).build();
    let mut s = scripter(catalog, options);
    let objects = s.load_schema().unwrap();

    let names: Vec<&str> = objects.iter().map(|o| o.object.name.as_str()).collect();
    assert_eq!(names, vec!["T000", "vOrders", "pLoad"]);
}

#[test]
fn test_trigger_in_batch_gets_no_permissions() {
    let catalog = MemoryCatalog::new()
        .respond("-- fetching all objects", vec![object_row("dbo", "trAudit", "TR")])
        .respond(
            "-- fetching all modules",
            vec![Row::new()
                .with("schema", "dbo")
                .with("name", "trAudit")
                .with("definition", "CREATE TRIGGER dbo.trAudit ON DATABASE FOR CREATE_TABLE AS PRINT 1")],
        )
        .respond(
            "-- fetching all permissions",
            vec![permission_row("dbo", "trAudit", "EXECUTE", "public")],
        )
        .respond(
            "-- fetching all indexes",
            index_rows("dbo", "trAudit", "IX", "NONCLUSTERED", false, &[("x", false)]),
        );
    let options = ScripterOptions::builder().include_modules(true).build();
    let mut s = scripter(catalog, options);
    let objects = s.load_schema().unwrap();

    assert_eq!(objects.len(), 1);
    assert!(objects[0].related.permissions.is_empty());
    assert!(objects[0].related.indexes.is_empty());
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_batch_catalog_failure_propagates() {
    let catalog = schema_catalog(2).fail_on("-- fetching all permissions");
    let mut s = scripter(catalog, options());
    let err = s.script_schema().unwrap_err();
    assert!(matches!(err, ScriptError::Catalog { context, .. } if context == "fetching all permissions"));
}

#[test]
fn test_batch_zero_column_table_fails() {
    let catalog = MemoryCatalog::new()
        .respond("-- fetching all objects", vec![object_row("dbo", "Empty", "U")])
        .respond("-- fetching all tables", vec![table_row("dbo", "Empty")]);
    let mut s = scripter(catalog, options());
    assert!(matches!(
        s.script_schema(),
        Err(ScriptError::NoColumns { .. })
    ));
}
