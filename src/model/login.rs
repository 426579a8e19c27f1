//! Server logins

use serde::Deserialize;

use crate::catalog::{Row, RowReader};
use crate::error::{Result, ScriptError};
use crate::quoting::{binary_literal, quote, quotename};

/// Statement form used to add a login to a server role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerRoleSyntax {
    /// `ALTER SERVER ROLE ... ADD MEMBER` (SQL Server 2012 and later)
    #[default]
    AlterServerRole,
    /// `EXEC sp_addsrvrolemember` (before 2012)
    SpAddSrvRoleMember,
}

/// Kind of server principal, from `sys.server_principals.type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginType {
    /// `S`
    Sql,
    /// `U`
    WindowsUser,
    /// `G`
    WindowsGroup,
}

impl LoginType {
    pub fn from_code(code: &str) -> Result<Self> {
        match code.trim() {
            "S" => Ok(LoginType::Sql),
            "U" => Ok(LoginType::WindowsUser),
            "G" => Ok(LoginType::WindowsGroup),
            _ => Err(ScriptError::InvalidField {
                entity: "login",
                field: "type".to_string(),
                expected: "one of S, U or G",
            }),
        }
    }
}

/// A server login and its role memberships
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub name: String,
    pub login_type: LoginType,
    pub sid: Option<Vec<u8>>,
    /// NULL unless the connection holds CONTROL SERVER
    pub password_hash: Option<Vec<u8>>,
    /// Plaintext password to use when no hash is available
    pub password: Option<String>,
    pub default_database_name: Option<String>,
    pub is_policy_checked: Option<bool>,
    pub is_disabled: bool,
    pub server_roles: Vec<String>,
}

impl Login {
    /// Build from the rows of one login, one row per server role
    /// membership (`role_name` NULL when the login has none).
    pub fn from_rows(rows: &[&Row]) -> Result<Self> {
        let header = rows.first().ok_or_else(|| ScriptError::EmptyGroup {
            key: "login".to_string(),
        })?;
        let r = RowReader::new(header, "login");

        let mut server_roles = Vec::new();
        for row in rows {
            let role = RowReader::new(row, "login").opt_string("role_name")?;
            if let Some(role) = role {
                if !server_roles.contains(&role) {
                    server_roles.push(role);
                }
            }
        }

        Ok(Self {
            name: r.string("name")?,
            login_type: LoginType::from_code(&r.string("type")?)?,
            sid: r.opt_bytes("sid")?,
            password_hash: r.opt_bytes("password_hash")?,
            password: None,
            default_database_name: r.opt_string("default_database_name")?,
            is_policy_checked: r.opt_flag("is_policy_checked")?,
            is_disabled: r.flag("is_disabled")?,
            server_roles,
        })
    }

    /// Same login, authenticated with a plaintext password when it has no hash.
    pub fn with_password(self, password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            ..self
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(
            self.login_type,
            LoginType::WindowsUser | LoginType::WindowsGroup
        )
    }

    /// The text after `WITH` in CREATE LOGIN, or `None` when there is nothing
    /// to put there.
    fn properties(&self) -> Result<Option<String>> {
        let mut props = Vec::new();

        if !self.is_windows() {
            if let Some(hash) = &self.password_hash {
                props.push(format!("PASSWORD = {} HASHED", binary_literal(hash)));
            } else if let Some(password) = &self.password {
                props.push(format!("PASSWORD = {}", quote(password)));
            } else {
                return Err(ScriptError::MissingPassword {
                    login: quotename(&self.name),
                });
            }
        }
        if !self.is_windows() {
            if let Some(sid) = &self.sid {
                props.push(format!("SID = {}", binary_literal(sid)));
            }
        }
        if let Some(db) = &self.default_database_name {
            props.push(format!("DEFAULT_DATABASE = {}", quotename(db)));
        }
        if !self.is_windows() {
            if let Some(checked) = self.is_policy_checked {
                props.push(format!(
                    "CHECK_POLICY = {}",
                    if checked { "ON" } else { "OFF" }
                ));
            }
        }

        Ok((!props.is_empty()).then(|| props.join(", ")))
    }

    /// CREATE LOGIN plus DISABLE and role membership statements.
    ///
    /// A SQL login needs either its hash or a supplied password.
    pub fn script(&self, syntax: ServerRoleSyntax) -> Result<String> {
        let name = quotename(&self.name);
        let mut create = format!("CREATE LOGIN {}", name);
        if self.is_windows() {
            create.push_str(" FROM WINDOWS");
        }
        if let Some(props) = self.properties()? {
            create.push_str(&format!(" WITH {}", props));
        }
        create.push(';');

        let mut lines = vec![create];
        if self.is_disabled {
            lines.push(format!("ALTER LOGIN {} DISABLE;", name));
        }
        for role in &self.server_roles {
            lines.push(match syntax {
                ServerRoleSyntax::AlterServerRole => {
                    format!("ALTER SERVER ROLE {} ADD MEMBER {};", quotename(role), name)
                }
                ServerRoleSyntax::SpAddSrvRoleMember => {
                    format!("EXEC sp_addsrvrolemember {}, {};", quote(&self.name), quote(role))
                }
            });
        }
        Ok(lines.join("\n"))
    }

    pub fn drop_script(&self) -> String {
        format!(
            "IF SUSER_ID({}) IS NOT NULL\n  DROP LOGIN {};",
            quote(&self.name),
            quotename(&self.name)
        )
    }
}
