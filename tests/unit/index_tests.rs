//! Unit tests for index grouping and rendering

use pretty_assertions::assert_eq;

use rust_sqlscripter::catalog::Row;
use rust_sqlscripter::grouping::build_grouped;
use rust_sqlscripter::model::{Index, IndexType};

use crate::common::index_rows;

fn build(rows: &[Row]) -> Vec<Index> {
    build_grouped(rows, &["schema", "table", "name"], Index::from_rows).unwrap()
}

// ============================================================================
// Grouping Tests
// ============================================================================

#[test]
fn test_three_rows_make_one_index() {
    let rows = index_rows(
        "dbo",
        "Orders",
        "IX_Orders_Customer",
        "NONCLUSTERED",
        false,
        &[("customer_id", false), ("created_at", false), ("total", true)],
    );
    let indexes = build(&rows);

    assert_eq!(indexes.len(), 1);
    let index = &indexes[0];
    let keys: Vec<&str> = index.key_columns().map(|c| c.column_name.as_str()).collect();
    let included: Vec<&str> = index
        .included_columns()
        .map(|c| c.column_name.as_str())
        .collect();
    assert_eq!(keys, vec!["customer_id", "created_at"]);
    assert_eq!(included, vec!["total"]);
    assert_eq!(
        index.script(),
        "CREATE INDEX [IX_Orders_Customer] ON [dbo].[Orders] ([customer_id], [created_at]) INCLUDE ([total]) ON [PRIMARY];"
    );
}

#[test]
fn test_same_name_on_two_tables_is_two_indexes() {
    let mut rows = index_rows("dbo", "A", "IX_Name", "NONCLUSTERED", false, &[("x", false)]);
    rows.extend(index_rows("dbo", "B", "IX_Name", "NONCLUSTERED", false, &[("y", false)]));
    let indexes = build(&rows);
    assert_eq!(indexes.len(), 2);
    assert_eq!(indexes[0].table, "A");
    assert_eq!(indexes[1].table, "B");
}

// ============================================================================
// Primary Key Tests
// ============================================================================

#[test]
fn test_primary_key_lists_key_columns_only() {
    let mut rows = index_rows(
        "dbo",
        "Orders",
        "PK_Orders",
        "CLUSTERED",
        true,
        &[("id", false), ("region", false)],
    );
    rows[1].insert("is_descending_key", true);
    rows[0].insert("fill_factor", 90);

    let indexes = build(&rows);
    assert_eq!(
        indexes[0].script(),
        "ALTER TABLE [dbo].[Orders] ADD CONSTRAINT [PK_Orders] PRIMARY KEY CLUSTERED ([id], [region]);"
    );
}

#[test]
fn test_nonclustered_primary_key() {
    let rows = index_rows("dbo", "Orders", "PK_Orders", "NONCLUSTERED", true, &[("id", false)]);
    assert_eq!(
        build(&rows)[0].script(),
        "ALTER TABLE [dbo].[Orders] ADD CONSTRAINT [PK_Orders] PRIMARY KEY NONCLUSTERED ([id]);"
    );
}

// ============================================================================
// Option Tests
// ============================================================================

#[test]
fn test_unique_clustered_with_options() {
    let mut rows = index_rows("dbo", "Orders", "UX_Orders_Ref", "CLUSTERED", false, &[("ref", false)]);
    rows[0].insert("is_unique", true);
    rows[0].insert("is_padded", true);
    rows[0].insert("ignore_dup_key", true);
    rows[0].insert("fill_factor", 80);
    rows[0].insert("is_descending_key", true);
    rows[0].insert("data_space", "INDEXES");

    assert_eq!(
        build(&rows)[0].script(),
        "CREATE UNIQUE CLUSTERED INDEX [UX_Orders_Ref] ON [dbo].[Orders] ([ref] DESC) \
         WITH (PAD_INDEX = ON, IGNORE_DUP_KEY = ON, FILLFACTOR = 80) ON [INDEXES];"
    );
}

#[test]
fn test_filtered_index() {
    let mut rows = index_rows("dbo", "Orders", "IX_Open", "NONCLUSTERED", false, &[("status", false)]);
    rows[0].insert("has_filter", true);
    rows[0].insert("filter_definition", "([status]='open')");

    assert_eq!(
        build(&rows)[0].script(),
        "CREATE INDEX [IX_Open] ON [dbo].[Orders] ([status]) WHERE ([status]='open') ON [PRIMARY];"
    );
}

#[test]
fn test_columnstore_type_keyword() {
    let rows = index_rows(
        "dbo",
        "Facts",
        "CCI_Facts",
        "NONCLUSTERED COLUMNSTORE",
        false,
        &[("amount", false)],
    );
    let index = &build(&rows)[0];
    assert_eq!(index.index_type, IndexType::NonClusteredColumnstore);
    assert!(index
        .script()
        .starts_with("CREATE NONCLUSTERED COLUMNSTORE INDEX [CCI_Facts]"));
}

// ============================================================================
// Ordering and Drop Tests
// ============================================================================

#[test]
fn test_script_order_primary_key_then_clustered_then_rest() {
    let mut rows = index_rows("dbo", "T", "IX_b", "NONCLUSTERED", false, &[("b", false)]);
    rows.extend(index_rows("dbo", "T", "IX_a", "NONCLUSTERED", false, &[("a", false)]));
    rows.extend(index_rows("dbo", "T", "CX_T", "CLUSTERED", false, &[("c", false)]));
    rows.extend(index_rows("dbo", "T", "PK_T", "NONCLUSTERED", true, &[("id", false)]));

    let mut indexes = build(&rows);
    indexes.sort_by(Index::script_order);
    let names: Vec<&str> = indexes.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["PK_T", "CX_T", "IX_a", "IX_b"]);
}

#[test]
fn test_drop_scripts() {
    let pk = &build(&index_rows("dbo", "T", "PK_T", "CLUSTERED", true, &[("id", false)]))[0];
    assert_eq!(
        pk.drop_script(),
        "IF OBJECT_ID('[dbo].[PK_T]') IS NOT NULL\n  ALTER TABLE [dbo].[T] DROP CONSTRAINT [PK_T];"
    );

    let ix = &build(&index_rows("dbo", "T", "IX_T", "NONCLUSTERED", false, &[("a", false)]))[0];
    assert_eq!(
        ix.drop_script(),
        "IF EXISTS (SELECT 1 FROM sys.indexes WHERE object_id = OBJECT_ID('[dbo].[T]') AND name = 'IX_T')\n  DROP INDEX [IX_T] ON [dbo].[T];"
    );
}
