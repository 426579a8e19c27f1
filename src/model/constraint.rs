//! Check constraints

use crate::catalog::{Row, RowReader};
use crate::error::Result;
use crate::quoting::{qualified, quote, quotename};

/// A CHECK constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub name: String,
    pub schema: String,
    pub table: String,
    /// Boolean expression exactly as the catalog stores it
    pub definition: String,
}

impl Constraint {
    pub fn from_row(row: &Row) -> Result<Self> {
        let r = RowReader::new(row, "constraint");
        Ok(Self {
            name: r.string("name")?,
            schema: r.string("schema")?,
            table: r.string("table")?,
            definition: r.string("definition")?,
        })
    }

    pub fn script(&self) -> String {
        format!(
            "ALTER TABLE {} ADD CONSTRAINT {} CHECK {};",
            qualified(&self.schema, &self.table),
            quotename(&self.name),
            self.definition
        )
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
