//! Grouping of flat catalog rows into nested entities.
//!
//! A join such as indexes × index columns returns one row per child with the
//! parent's fields repeated. [`group_rows`] partitions those rows by a key
//! that identifies the parent across owners (schema, table and index name,
//! never the index name alone), keeping partitions in first-seen order and
//! rows in query order. Each partition is then handed to the entity's
//! `from_rows` constructor, which takes header fields from the first row.
//!
//! [`partition_by_owner`] is the second half of whole-schema scripting: it
//! files built entities under the lowercased `[schema].[name]` of the object
//! they belong to, so each object can take its slice without another query.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::catalog::{Row, RowReader};
use crate::error::{Result, ScriptError};
use crate::quoting::quotename;

/// Rows sharing one grouping key
#[derive(Debug, Clone)]
pub struct RowGroup<'a> {
    key: String,
    rows: Vec<&'a Row>,
}

impl<'a> RowGroup<'a> {
    /// A group must have at least one row.
    pub fn new(key: String, rows: Vec<&'a Row>) -> Result<Self> {
        if rows.is_empty() {
            return Err(ScriptError::EmptyGroup { key });
        }
        Ok(Self { key, rows })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn rows(&self) -> &[&'a Row] {
        &self.rows
    }
}

/// Build the grouping key for a row from the named fields.
///
/// Each part is bracket-quoted so that names containing dots cannot collide.
pub fn group_key(row: &Row, fields: &[&str]) -> Result<String> {
    let r = RowReader::new(row, "grouped row");
    let parts = fields
        .iter()
        .map(|f| r.string(f).map(|v| quotename(&v)))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("."))
}

/// Partition rows by the values of `key_fields`.
pub fn group_rows<'a>(rows: &'a [Row], key_fields: &[&str]) -> Result<Vec<RowGroup<'a>>> {
    let mut groups: IndexMap<String, Vec<&'a Row>> = IndexMap::new();
    for row in rows {
        groups
            .entry(group_key(row, key_fields)?)
            .or_default()
            .push(row);
    }
    groups
        .into_iter()
        .map(|(key, rows)| RowGroup::new(key, rows))
        .collect()
}

/// Group rows and build one entity per group.
pub fn build_grouped<T>(
    rows: &[Row],
    key_fields: &[&str],
    build: impl Fn(&[&Row]) -> Result<T>,
) -> Result<Vec<T>> {
    group_rows(rows, key_fields)?
        .iter()
        .map(|g| build(g.rows()))
        .collect()
}

/// File entities under the case-insensitive key of their owning object.
///
/// Entities keep their relative order within each owner.
pub fn partition_by_owner<T>(
    items: impl IntoIterator<Item = T>,
    owner: impl Fn(&T) -> String,
) -> HashMap<String, Vec<T>> {
    let mut map: HashMap<String, Vec<T>> = HashMap::new();
    for item in items {
        map.entry(owner(&item).to_lowercase())
            .or_default()
            .push(item);
    }
    map
}
