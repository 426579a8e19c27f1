//! Table columns

use crate::catalog::{Row, RowReader};
use crate::error::Result;
use crate::quoting::quotename;

use super::type_spec::type_spec;

/// How a column gets its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// Stored column, optionally an identity.
    Stored { identity: Option<Identity> },
    /// `AS <definition>`
    Computed { definition: String },
}

/// `IDENTITY(seed,increment)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub seed: i64,
    pub increment: i64,
}

/// A table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// `column_id`, orders columns within the table
    pub ordinal: i64,
    pub sql_type: String,
    pub max_length: i64,
    pub precision: i64,
    pub scale: i64,
    pub is_nullable: bool,
    pub kind: ColumnKind,
    pub default_definition: Option<String>,
}

impl Column {
    /// Build from a columns-query row.
    ///
    /// Required: `name`, `column_id`, `type`. `max_length`, `precision` and
    /// `scale` default to 0; identity seed and increment default to 1.
    pub fn from_row(row: &Row) -> Result<Self> {
        let r = RowReader::new(row, "column");
        let kind = if r.flag("is_computed")? {
            ColumnKind::Computed {
                definition: r.string("computed_definition")?,
            }
        } else if r.flag("is_identity")? {
            ColumnKind::Stored {
                identity: Some(Identity {
                    seed: r.opt_int("seed_value")?.unwrap_or(1),
                    increment: r.opt_int("increment_value")?.unwrap_or(1),
                }),
            }
        } else {
            ColumnKind::Stored { identity: None }
        };

        Ok(Self {
            name: r.string("name")?,
            ordinal: r.int("column_id")?,
            sql_type: r.string("type")?,
            max_length: r.opt_int("max_length")?.unwrap_or(0),
            precision: r.opt_int("precision")?.unwrap_or(0),
            scale: r.opt_int("scale")?.unwrap_or(0),
            is_nullable: r.flag("is_nullable")?,
            kind,
            default_definition: r.opt_string("default_definition")?,
        })
    }

    pub fn type_spec(&self) -> String {
        type_spec(&self.sql_type, self.max_length, self.precision, self.scale)
    }

    /// Column definition as it appears inside CREATE TABLE.
    ///
    /// The quoted name is padded to `name_width`, the longest quoted column
    /// name in the table, so the type specs line up.
    pub fn definition(&self, name_width: usize) -> String {
        let mut parts = vec![format!(
            "{:<width$}",
            quotename(&self.name),
            width = name_width
        )];

        match &self.kind {
            ColumnKind::Computed { definition } => {
                parts.push(format!("AS {}", definition));
            }
            ColumnKind::Stored { identity } => {
                parts.push(self.type_spec());
                if let Some(id) = identity {
                    parts.push(format!("IDENTITY({},{})", id.seed, id.increment));
                }
                parts.push(if self.is_nullable { "NULL" } else { "NOT NULL" }.to_string());
                if let Some(default) = &self.default_definition {
                    parts.push(format!("DEFAULT {}", default));
                }
            }
        }

        parts.join(" ")
    }
}
