//! Error types for rust-sqlscripter

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors that can occur while scripting schema objects
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Catalog query failed while {context}")]
    Catalog {
        context: String,
        #[source]
        source: CatalogError,
    },

    #[error("Table {table} has no columns")]
    NoColumns { table: String },

    #[error("Row group '{key}' is empty")]
    EmptyGroup { key: String },

    #[error("Catalog row for {entity} is missing required field '{field}'")]
    MissingField { entity: &'static str, field: String },

    #[error("Field '{field}' of {entity} row is not {expected}")]
    InvalidField {
        entity: &'static str,
        field: String,
        expected: &'static str,
    },

    #[error("Extended property '{property}' has scope level {level} without the level above it")]
    InvalidScopeLevel { property: String, level: usize },

    #[error("Unknown object type code: {code}")]
    UnknownObjectType { code: String },

    #[error("Object not found: {name}")]
    ObjectNotFound { name: String },

    #[error("Object {name} is a {actual}, not a {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("No definition available for {name} (the module may be encrypted)")]
    MissingDefinition { name: String },

    #[error("SQL login {login} has no readable password hash and no password was supplied")]
    MissingPassword { login: String },

    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl ScriptError {
    /// Wrap a catalog failure with a description of what was being fetched.
    pub fn catalog(context: impl Into<String>, source: CatalogError) -> Self {
        ScriptError::Catalog {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T, E = ScriptError> = std::result::Result<T, E>;
