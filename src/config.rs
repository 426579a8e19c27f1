//! Scripter configuration
//!
//! [`ScripterOptions`] is an immutable value. Start from the defaults and
//! override with [`ScripterOptions::builder`], or load a TOML file where
//! every key is optional:
//!
//! ```toml
//! database = "Sales"
//! include_drop = false
//! comment_scripts = false
//! server_role_syntax = "sp_add_srv_role_member"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, ScriptError};
use crate::model::ServerRoleSyntax;

/// Batch separator written between statements that must run separately.
pub const BATCH_SEPARATOR: &str = "GO";

/// What the scripter includes in its output
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScripterOptions {
    /// Database to script. The scripter switches to it on construction and,
    /// with `include_use`, starts each script with `USE`.
    pub database: Option<String>,
    /// Emit `USE [database]` first (only when `database` is set)
    pub include_use: bool,
    /// Emit a guarded DROP before the definition
    pub include_drop: bool,
    pub include_permissions: bool,
    /// Check constraints
    pub include_constraints: bool,
    pub include_indexes: bool,
    pub include_foreign_keys: bool,
    pub include_extended_properties: bool,
    /// Banner comment before each related-object section
    pub comment_scripts: bool,
    /// Whole-schema scripting also covers views, procedures, functions,
    /// synonyms and triggers
    pub include_modules: bool,
    /// How logins are added to server roles
    pub server_role_syntax: ServerRoleSyntax,
}

impl Default for ScripterOptions {
    fn default() -> Self {
        Self {
            database: None,
            include_use: true,
            include_drop: true,
            include_permissions: true,
            include_constraints: true,
            include_indexes: true,
            include_foreign_keys: true,
            include_extended_properties: true,
            comment_scripts: true,
            include_modules: false,
            server_role_syntax: ServerRoleSyntax::AlterServerRole,
        }
    }
}

impl ScripterOptions {
    pub fn builder() -> ScripterOptionsBuilder {
        ScripterOptionsBuilder::default()
    }

    /// Parse options from TOML text; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ScriptError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text).map_err(|e| ScriptError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Builder seeded with these options, for layering CLI flags over a file.
    pub fn to_builder(&self) -> ScripterOptionsBuilder {
        ScripterOptionsBuilder {
            options: self.clone(),
        }
    }
}

/// Defaults-then-override builder for [`ScripterOptions`]
#[derive(Debug, Clone, Default)]
pub struct ScripterOptionsBuilder {
    options: ScripterOptions,
}

macro_rules! flag_setters {
    ($($field:ident),* $(,)?) => {
        $(
            pub fn $field(mut self, value: bool) -> Self {
                self.options.$field = value;
                self
            }
        )*
    };
}

impl ScripterOptionsBuilder {
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.options.database = Some(database.into());
        self
    }

    pub fn server_role_syntax(mut self, syntax: ServerRoleSyntax) -> Self {
        self.options.server_role_syntax = syntax;
        self
    }

    flag_setters!(
        include_use,
        include_drop,
        include_permissions,
        include_constraints,
        include_indexes,
        include_foreign_keys,
        include_extended_properties,
        comment_scripts,
        include_modules,
    );

    pub fn build(self) -> ScripterOptions {
        self.options
    }
}
