//! Extended properties

use crate::catalog::{Row, RowReader};
use crate::error::{Result, ScriptError};
use crate::quoting::sql_list;

/// `sp_addextendedproperty` accepts at most three scope levels.
pub const MAX_SCOPE_LEVELS: usize = 3;

/// One `@levelNtype` / `@levelNname` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeLevel {
    pub level_type: String,
    pub name: String,
}

/// A named, scoped metadata value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedProperty {
    pub name: String,
    pub value: Option<String>,
    /// Outermost first; level N is only present when 0..N are
    pub levels: Vec<ScopeLevel>,
}

impl ExtendedProperty {
    /// Build from a row carrying `level_N_type` / `level_N_name` for N in 0..3.
    ///
    /// A level whose type is NULL ends the scope; a later level with a
    /// non-NULL type after that is an error.
    pub fn from_row(row: &Row) -> Result<Self> {
        let r = RowReader::new(row, "extended property");
        let name = r.string("name")?;

        let mut levels = Vec::new();
        let mut ended = false;
        for n in 0..MAX_SCOPE_LEVELS {
            let level_type = r.opt_string(&format!("level_{}_type", n))?;
            match (level_type, ended) {
                (None, _) => ended = true,
                (Some(_), true) => {
                    return Err(ScriptError::InvalidScopeLevel {
                        property: name,
                        level: n,
                    })
                }
                (Some(level_type), false) => levels.push(ScopeLevel {
                    level_type,
                    name: r.string(&format!("level_{}_name", n))?,
                }),
            }
        }

        Ok(Self {
            name,
            value: r.opt_string("value")?,
            levels,
        })
    }

    /// Schema and object the property hangs off, when scoped that deep.
    pub fn owner(&self) -> Option<(&str, &str)> {
        match self.levels.as_slice() {
            [schema, object, ..] => Some((&schema.name, &object.name)),
            _ => None,
        }
    }

    fn level_params(&self) -> impl Iterator<Item = Option<&str>> {
        self.levels
            .iter()
            .flat_map(|l| [Some(l.level_type.as_str()), Some(l.name.as_str())])
    }

    pub fn script(&self) -> String {
        let params = [Some(self.name.as_str()), self.value.as_deref()]
            .into_iter()
            .chain(self.level_params());
        format!("EXEC sp_addextendedproperty {};", sql_list(params))
    }

    pub fn drop_script(&self) -> String {
        let params = std::iter::once(Some(self.name.as_str())).chain(self.level_params());
        format!("EXEC sp_dropextendedproperty {};", sql_list(params))
    }
}
