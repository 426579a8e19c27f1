//! Object and column permissions

use crate::catalog::{Row, RowReader};
use crate::error::{Result, ScriptError};
use crate::quoting::{qualified, quotename};

/// `sys.database_permissions.state_desc`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Grant,
    GrantWithGrantOption,
    Deny,
    Revoke,
}

impl PermissionState {
    pub fn from_desc(desc: &str) -> Option<Self> {
        match desc.to_ascii_uppercase().as_str() {
            "GRANT" => Some(PermissionState::Grant),
            "GRANT_WITH_GRANT_OPTION" => Some(PermissionState::GrantWithGrantOption),
            "DENY" => Some(PermissionState::Deny),
            "REVOKE" => Some(PermissionState::Revoke),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            PermissionState::Grant | PermissionState::GrantWithGrantOption => "GRANT",
            PermissionState::Deny => "DENY",
            PermissionState::Revoke => "REVOKE",
        }
    }
}

/// A permission on an object, or on one column of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub state: PermissionState,
    pub permission_name: String,
    pub major_schema: String,
    pub major_name: String,
    /// Column, for column-level permissions
    pub minor_name: Option<String>,
    pub grantee: String,
}

impl Permission {
    pub fn from_row(row: &Row) -> Result<Self> {
        let r = RowReader::new(row, "permission");
        let state = r.string("grant_or_deny")?;
        Ok(Self {
            state: PermissionState::from_desc(&state).ok_or(ScriptError::InvalidField {
                entity: "permission",
                field: "grant_or_deny".to_string(),
                expected: "GRANT, GRANT_WITH_GRANT_OPTION, DENY or REVOKE",
            })?,
            permission_name: r.string("permission_name")?,
            major_schema: r.string("major_schema")?,
            major_name: r.string("major_name")?,
            minor_name: r.opt_string("minor_name")?,
            grantee: r.string("grantee")?,
        })
    }

    pub fn script(&self) -> String {
        let mut parts = vec![format!(
            "{} {} ON {}",
            self.state.keyword(),
            self.permission_name,
            qualified(&self.major_schema, &self.major_name)
        )];
        if let Some(column) = &self.minor_name {
            parts.push(format!("({})", quotename(column)));
        }
        parts.push(
            if self.state == PermissionState::Revoke {
                "FROM"
            } else {
                "TO"
            }
            .to_string(),
        );
        parts.push(quotename(&self.grantee));
        if self.state == PermissionState::GrantWithGrantOption {
            parts.push("WITH GRANT OPTION".to_string());
        }
        format!("{};", parts.join(" "))
    }
}
