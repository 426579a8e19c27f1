//! Catalog access.
//!
//! The scripter only ever talks to the database through [`Catalog`]: send SQL
//! text, get rows back. [`MssqlCatalog`] is the live SQL Server
//! implementation; [`MemoryCatalog`] serves canned rows and counts calls.

mod memory;
mod mssql;
mod row;

pub use memory::MemoryCatalog;
pub use mssql::{ConnectionConfig, MssqlCatalog};
pub use row::{Row, RowReader, SqlValue};

/// Error raised by a catalog implementation.
pub type CatalogError = Box<dyn std::error::Error + Send + Sync>;

/// Something that can run SQL against a database and hand back results.
///
/// Calls are synchronous and sequential. Implementations surface failures
/// as they happen and never retry.
pub trait Catalog {
    /// Run a row-returning query.
    fn query_rows(&mut self, sql: &str) -> Result<Vec<Row>, CatalogError>;

    /// Run a statement that returns no rows.
    fn execute(&mut self, sql: &str) -> Result<(), CatalogError>;

    /// Run a query and return one column of every row, by position.
    fn query_column(&mut self, sql: &str, column: usize) -> Result<Vec<SqlValue>, CatalogError> {
        Ok(self
            .query_rows(sql)?
            .iter()
            .map(|r| r.get_index(column).cloned().unwrap_or(SqlValue::Null))
            .collect())
    }

    /// Run a query and return the first field of the first row.
    fn query_scalar(&mut self, sql: &str) -> Result<Option<SqlValue>, CatalogError> {
        Ok(self
            .query_rows(sql)?
            .first()
            .and_then(|r| r.get_index(0).cloned()))
    }
}

impl<C: Catalog + ?Sized> Catalog for &mut C {
    fn query_rows(&mut self, sql: &str) -> Result<Vec<Row>, CatalogError> {
        (**self).query_rows(sql)
    }

    fn execute(&mut self, sql: &str) -> Result<(), CatalogError> {
        (**self).execute(sql)
    }

    fn query_column(&mut self, sql: &str, column: usize) -> Result<Vec<SqlValue>, CatalogError> {
        (**self).query_column(sql, column)
    }

    fn query_scalar(&mut self, sql: &str) -> Result<Option<SqlValue>, CatalogError> {
        (**self).query_scalar(sql)
    }
}
