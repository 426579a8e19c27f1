//! In-memory catalog serving canned rows.

use super::{Catalog, CatalogError, Row};

/// A [`Catalog`] that answers queries from registered responses.
///
/// Each response is keyed by a tag. A query matches the first registered tag
/// that its leading comment line (`-- fetching ...`) starts with, so
/// `"-- fetching all columns"` answers the whole-schema column query and
/// `"-- fetching columns"` the single-table one. Unmatched queries return no
/// rows. Every call is counted and recorded.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    responses: Vec<(String, Vec<Row>)>,
    failures: Vec<String>,
    log: Vec<String>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register rows returned for queries whose first line starts with `tag`.
    pub fn respond(mut self, tag: &str, rows: Vec<Row>) -> Self {
        self.responses.push((tag.to_string(), rows));
        self
    }

    /// Make queries whose first line starts with `tag` fail.
    pub fn fail_on(mut self, tag: &str) -> Self {
        self.failures.push(tag.to_string());
        self
    }

    /// Number of statements issued so far, of any kind.
    pub fn call_count(&self) -> usize {
        self.log.len()
    }

    /// Every statement issued, in order.
    pub fn statements(&self) -> &[String] {
        &self.log
    }

    fn first_line(sql: &str) -> &str {
        sql.trim_start().lines().next().unwrap_or("").trim()
    }
}

impl Catalog for MemoryCatalog {
    fn query_rows(&mut self, sql: &str) -> Result<Vec<Row>, CatalogError> {
        self.log.push(sql.to_string());
        let head = Self::first_line(sql);
        if let Some(tag) = self.failures.iter().find(|t| head.starts_with(t.as_str())) {
            return Err(format!("simulated failure for '{}'", tag).into());
        }
        Ok(self
            .responses
            .iter()
            .find(|(tag, _)| head.starts_with(tag.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }

    fn execute(&mut self, sql: &str) -> Result<(), CatalogError> {
        self.log.push(sql.to_string());
        let head = Self::first_line(sql);
        if self.failures.iter().any(|t| head.starts_with(t.as_str())) {
            return Err(format!("simulated failure for '{}'", head).into());
        }
        Ok(())
    }
}
