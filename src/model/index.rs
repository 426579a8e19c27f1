//! Indexes and primary keys

use std::cmp::Ordering;
use std::fmt;

use crate::catalog::{Row, RowReader};
use crate::error::{Result, ScriptError};
use crate::quoting::{qualified, quote, quotename};

/// Physical index type, from `sys.indexes.type_desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexType {
    Clustered,
    NonClustered,
    ClusteredColumnstore,
    NonClusteredColumnstore,
    Xml,
    Spatial,
    Other(String),
}

impl IndexType {
    pub fn from_desc(desc: &str) -> Self {
        match desc.to_ascii_uppercase().as_str() {
            "CLUSTERED" => IndexType::Clustered,
            "NONCLUSTERED" => IndexType::NonClustered,
            "CLUSTERED COLUMNSTORE" => IndexType::ClusteredColumnstore,
            "NONCLUSTERED COLUMNSTORE" => IndexType::NonClusteredColumnstore,
            "XML" => IndexType::Xml,
            "SPATIAL" => IndexType::Spatial,
            _ => IndexType::Other(desc.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IndexType::Clustered => "CLUSTERED",
            IndexType::NonClustered => "NONCLUSTERED",
            IndexType::ClusteredColumnstore => "CLUSTERED COLUMNSTORE",
            IndexType::NonClusteredColumnstore => "NONCLUSTERED COLUMNSTORE",
            IndexType::Xml => "XML",
            IndexType::Spatial => "SPATIAL",
            IndexType::Other(s) => s,
        }
    }

    pub fn is_clustered(&self) -> bool {
        matches!(
            self,
            IndexType::Clustered | IndexType::ClusteredColumnstore
        )
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    pub column_name: String,
    pub is_descending: bool,
    pub is_included: bool,
    /// `index_column_id`
    pub ordinal: i64,
}

impl IndexColumn {
    pub fn from_row(row: &Row) -> Result<Self> {
        let r = RowReader::new(row, "index column");
        Ok(Self {
            column_name: r.string("column_name")?,
            is_descending: r.flag("is_descending_key")?,
            is_included: r.flag("is_included_column")?,
            ordinal: r.opt_int("index_column_id")?.unwrap_or(0),
        })
    }
}

/// An index or primary key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    pub schema: String,
    pub table: String,
    pub index_type: IndexType,
    pub is_primary_key: bool,
    pub is_unique: bool,
    pub is_unique_constraint: bool,
    pub fill_factor: i64,
    pub is_padded: bool,
    pub ignore_dup_key: bool,
    pub filter_definition: Option<String>,
    pub data_space: String,
    /// Key and included columns, in query order
    pub columns: Vec<IndexColumn>,
}

impl Index {
    /// Build one index from the rows of its group.
    ///
    /// The first row supplies the index header; every row supplies one
    /// column. An empty group is an error.
    pub fn from_rows(rows: &[&Row]) -> Result<Self> {
        let header = rows.first().ok_or_else(|| ScriptError::EmptyGroup {
            key: "index".to_string(),
        })?;
        let r = RowReader::new(header, "index");

        Ok(Self {
            name: r.string("name")?,
            schema: r.string("schema")?,
            table: r.string("table")?,
            index_type: IndexType::from_desc(&r.string("type")?),
            is_primary_key: r.flag("is_primary_key")?,
            is_unique: r.flag("is_unique")?,
            is_unique_constraint: r.flag("is_unique_constraint")?,
            fill_factor: r.opt_int("fill_factor")?.unwrap_or(0),
            is_padded: r.flag("is_padded")?,
            ignore_dup_key: r.flag("ignore_dup_key")?,
            filter_definition: r.opt_string("filter_definition")?,
            data_space: r
                .opt_string("data_space")?
                .unwrap_or_else(|| "PRIMARY".to_string()),
            columns: rows
                .iter()
                .map(|row| IndexColumn::from_row(row))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    pub fn key_columns(&self) -> impl Iterator<Item = &IndexColumn> {
        self.columns.iter().filter(|c| !c.is_included)
    }

    pub fn included_columns(&self) -> impl Iterator<Item = &IndexColumn> {
        self.columns.iter().filter(|c| c.is_included)
    }

    pub fn qualified_table(&self) -> String {
        qualified(&self.schema, &self.table)
    }

    /// Sort rank: primary key, then clustered, then the rest.
    pub fn priority(&self) -> u8 {
        if self.is_primary_key {
            0
        } else if self.index_type.is_clustered() {
            1
        } else {
            2
        }
    }

    /// Ordering used when scripting: by [`priority`](Self::priority), then name.
    pub fn script_order(a: &Index, b: &Index) -> Ordering {
        a.priority()
            .cmp(&b.priority())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    }

    pub fn script(&self) -> String {
        if self.is_primary_key {
            // Key columns only: no DESC, INCLUDE, WITH or filegroup here.
            let keys = self
                .key_columns()
                .map(|c| quotename(&c.column_name))
                .collect::<Vec<_>>()
                .join(", ");
            return format!(
                "ALTER TABLE {} ADD CONSTRAINT {} PRIMARY KEY {} ({});",
                self.qualified_table(),
                quotename(&self.name),
                self.index_type,
                keys
            );
        }

        let mut parts = vec!["CREATE".to_string()];
        if self.is_unique || self.is_unique_constraint {
            parts.push("UNIQUE".to_string());
        }
        if self.index_type != IndexType::NonClustered {
            parts.push(self.index_type.to_string());
        }
        parts.push(format!("INDEX {}", quotename(&self.name)));
        parts.push(format!("ON {}", self.qualified_table()));
        parts.push(format!("({})", column_list(self.key_columns())));

        let included: Vec<&IndexColumn> = self.included_columns().collect();
        if !included.is_empty() {
            parts.push(format!("INCLUDE ({})", column_list(included.into_iter())));
        }
        if let Some(filter) = &self.filter_definition {
            parts.push(format!("WHERE {}", filter));
        }

        let mut options = Vec::new();
        if self.is_padded {
            options.push("PAD_INDEX = ON".to_string());
        }
        if self.ignore_dup_key {
            options.push("IGNORE_DUP_KEY = ON".to_string());
        }
        if self.fill_factor > 0 {
            options.push(format!("FILLFACTOR = {}", self.fill_factor));
        }
        if !options.is_empty() {
            parts.push(format!("WITH ({})", options.join(", ")));
        }

        parts.push(format!("ON {}", quotename(&self.data_space)));
        format!("{};", parts.join(" "))
    }

    pub fn drop_script(&self) -> String {
        let table = self.qualified_table();
        if self.is_primary_key {
            format!(
                "IF OBJECT_ID({}) IS NOT NULL\n  ALTER TABLE {} DROP CONSTRAINT {};",
                quote(&qualified(&self.schema, &self.name)),
                table,
                quotename(&self.name)
            )
        } else {
            format!(
                "IF EXISTS (SELECT 1 FROM sys.indexes WHERE object_id = OBJECT_ID({}) AND name = {})\n  DROP INDEX {} ON {};",
                quote(&table),
                quote(&self.name),
                quotename(&self.name),
                table
            )
        }
    }
}

fn column_list<'a>(columns: impl Iterator<Item = &'a IndexColumn>) -> String {
    columns
        .map(|c| {
            if c.is_descending {
                format!("{} DESC", quotename(&c.column_name))
            } else {
                quotename(&c.column_name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
