//! Tables

use crate::catalog::{Row, RowReader};
use crate::error::{Result, ScriptError};
use crate::quoting::{qualified, quotename};

use super::Column;

/// A table and its columns. Related objects live in
/// [`ScriptObject`](super::ScriptObject), not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub columns: Vec<Column>,
    /// Filegroup of the heap or clustered index
    pub data_space: String,
    /// Filegroup for large object data, when the table has one
    pub lob_space: Option<String>,
}

impl Table {
    /// Build from a table-header row and the table's columns.
    pub fn from_row(row: &Row, columns: Vec<Column>) -> Result<Self> {
        let r = RowReader::new(row, "table");
        Ok(Self {
            schema: r.string("schema")?,
            name: r.string("name")?,
            columns,
            data_space: r.opt_string("data_space")?.unwrap_or_else(|| "PRIMARY".to_string()),
            lob_space: r.opt_string("lob_space")?,
        })
    }

    pub fn qualified_name(&self) -> String {
        qualified(&self.schema, &self.name)
    }

    /// CREATE TABLE statement.
    pub fn script(&self) -> Result<String> {
        let name_width = self
            .columns
            .iter()
            .map(|c| quotename(&c.name).chars().count())
            .max()
            .ok_or_else(|| ScriptError::NoColumns {
                table: self.qualified_name(),
            })?;

        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.ordinal);

        let mut lines = vec![format!("CREATE TABLE {} (", self.qualified_name())];
        lines.push(
            columns
                .iter()
                .map(|c| format!("    {}", c.definition(name_width)))
                .collect::<Vec<_>>()
                .join(",\n"),
        );
        lines.push(")".to_string());
        lines.push(format!("ON {}", quotename(&self.data_space)));
        if let Some(lob) = self
            .lob_space
            .as_deref()
            .filter(|lob| *lob != self.data_space)
        {
            lines.push(format!("TEXTIMAGE_ON {}", quotename(lob)));
        }

        Ok(format!("{};", lines.join("\n")))
    }
}
