//! Unit tests for extended property scoping

use pretty_assertions::assert_eq;

use rust_sqlscripter::model::ExtendedProperty;
use rust_sqlscripter::scripter::queries::{self, Scope};

use crate::common::extended_property_row;

#[test]
fn test_object_level_property() {
    let row = extended_property_row("dbo", "table", "Orders", None, "MS_Description", "Orders");
    let property = ExtendedProperty::from_row(&row).unwrap();
    assert_eq!(property.levels.len(), 2);
    assert_eq!(property.owner(), Some(("dbo", "Orders")));
    assert_eq!(
        property.script(),
        "EXEC sp_addextendedproperty 'MS_Description', 'Orders', 'schema', 'dbo', 'table', 'Orders';"
    );
}

#[test]
fn test_column_level_property() {
    let row = extended_property_row(
        "dbo",
        "table",
        "Orders",
        Some(("column", "name")),
        "MS_Description",
        "Customer's name",
    );
    let property = ExtendedProperty::from_row(&row).unwrap();
    assert_eq!(
        property.script(),
        "EXEC sp_addextendedproperty 'MS_Description', 'Customer''s name', 'schema', 'dbo', 'table', 'Orders', 'column', 'name';"
    );
    assert_eq!(
        property.drop_script(),
        "EXEC sp_dropextendedproperty 'MS_Description', 'schema', 'dbo', 'table', 'Orders', 'column', 'name';"
    );
}

/// Index-scoped properties come back from the catalog query with a level-2
/// type derived from the owning table, i.e. `column`, while the level-2 name
/// is the index name. The scripter renders what the catalog returns.
#[test]
fn test_index_property_is_labelled_column() {
    let sql = queries::extended_properties(Scope::All);
    assert!(sql.contains("when o.type = 'U' then 'column'"));
    assert!(!sql.contains("then 'index'"));

    let row = extended_property_row(
        "dbo",
        "table",
        "Orders",
        Some(("column", "IX_Orders_Name")),
        "MS_Description",
        "Lookup by name",
    );
    let property = ExtendedProperty::from_row(&row).unwrap();
    assert_eq!(property.levels[2].level_type, "column");
    assert!(property
        .script()
        .ends_with("'table', 'Orders', 'column', 'IX_Orders_Name';"));
}
