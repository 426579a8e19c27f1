//! rust-sqlscripter: T-SQL scripts from live SQL Server catalog metadata
//!
//! This library reads the system catalog of a SQL Server database and
//! produces re-runnable T-SQL for its schema objects: tables with their
//! indexes, foreign keys, check constraints, permissions and extended
//! properties, modules, synonyms and server logins.
//!
//! The catalog is reached through the [`catalog::Catalog`] trait, so the
//! scripting logic runs the same against a live server
//! ([`catalog::MssqlCatalog`]) or canned rows ([`catalog::MemoryCatalog`]).

pub mod catalog;
pub mod config;
pub mod error;
pub mod grouping;
pub mod model;
pub mod quoting;
pub mod scripter;

pub use catalog::{Catalog, ConnectionConfig, MemoryCatalog, MssqlCatalog};
pub use config::ScripterOptions;
pub use error::{Result, ScriptError};
pub use scripter::Scripter;

/// Connect to a server and return a scripter bound to it.
pub fn connect(
    connection: &ConnectionConfig,
    options: ScripterOptions,
) -> Result<Scripter<MssqlCatalog>> {
    let catalog = MssqlCatalog::connect(connection).map_err(|e| {
        ScriptError::catalog(
            format!("connecting to {}:{}", connection.host, connection.port),
            e,
        )
    })?;
    Scripter::new(catalog, options)
}
