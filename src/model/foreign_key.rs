//! Foreign keys

use crate::catalog::{Row, RowReader};
use crate::error::{Result, ScriptError};
use crate::quoting::{qualified, quote, quotename};

/// Catalog descriptor for "no referential action".
pub const NO_ACTION: &str = "NO_ACTION";

/// One referencing/referenced column pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyColumn {
    pub referencing: String,
    pub referenced: String,
}

/// A foreign key constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: String,
    pub schema: String,
    pub table: String,
    pub referenced_schema: String,
    pub referenced_table: String,
    /// Column pairs in constraint order
    pub columns: Vec<ForeignKeyColumn>,
    /// `delete_referential_action_desc`, e.g. `CASCADE`; defaults to `NO_ACTION`
    pub delete_action: String,
    pub update_action: String,
}

impl ForeignKey {
    /// Build from the rows of one key, one row per column pair.
    pub fn from_rows(rows: &[&Row]) -> Result<Self> {
        let header = rows.first().ok_or_else(|| ScriptError::EmptyGroup {
            key: "foreign key".to_string(),
        })?;
        let r = RowReader::new(header, "foreign key");

        let columns = rows
            .iter()
            .map(|row| {
                let c = RowReader::new(row, "foreign key column");
                Ok(ForeignKeyColumn {
                    referencing: c.string("referencing_column")?,
                    referenced: c.string("referenced_column")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: r.string("name")?,
            schema: r.string("schema")?,
            table: r.string("table")?,
            referenced_schema: r.string("referenced_table_schema")?,
            referenced_table: r.string("referenced_table")?,
            columns,
            delete_action: r
                .opt_string("delete_action")?
                .unwrap_or_else(|| NO_ACTION.to_string()),
            update_action: r
                .opt_string("update_action")?
                .unwrap_or_else(|| NO_ACTION.to_string()),
        })
    }

    pub fn script(&self) -> String {
        let referencing = self
            .columns
            .iter()
            .map(|c| quotename(&c.referencing))
            .collect::<Vec<_>>()
            .join(", ");
        let referenced = self
            .columns
            .iter()
            .map(|c| quotename(&c.referenced))
            .collect::<Vec<_>>()
            .join(", ");

        let mut parts = vec![
            format!("ALTER TABLE {}", qualified(&self.schema, &self.table)),
            format!("ADD CONSTRAINT {}", quotename(&self.name)),
            format!("FOREIGN KEY ({})", referencing),
            format!(
                "REFERENCES {}",
                qualified(&self.referenced_schema, &self.referenced_table)
            ),
            format!("({})", referenced),
        ];
        if self.delete_action != NO_ACTION {
            parts.push(format!("ON DELETE {}", action_sql(&self.delete_action)));
        }
        if self.update_action != NO_ACTION {
            parts.push(format!("ON UPDATE {}", action_sql(&self.update_action)));
        }
        format!("{};", parts.join(" "))
    }

    pub fn drop_script(&self) -> String {
        format!(
            "IF OBJECT_ID({}) IS NOT NULL\n  ALTER TABLE {} DROP CONSTRAINT {};",
            quote(&qualified(&self.schema, &self.name)),
            qualified(&self.schema, &self.table),
            quotename(&self.name)
        )
    }
}

/// `SET_NULL` → `SET NULL`; the catalog descriptor uses underscores.
fn action_sql(action: &str) -> String {
    action.replace('_', " ")
}
