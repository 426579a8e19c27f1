//! Top-level objects with their related objects attached

use crate::error::Result;

use super::{
    Constraint, ExtendedProperty, ForeignKey, Index, ObjectRef, Permission, Synonym, Table,
};

/// Main definition of a top-level object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectBody {
    Table(Table),
    /// Module definition text exactly as stored
    Module(String),
    Synonym(Synonym),
}

impl ObjectBody {
    pub fn script(&self) -> Result<String> {
        match self {
            ObjectBody::Table(t) => t.script(),
            ObjectBody::Module(definition) => Ok(definition.trim_end().to_string()),
            ObjectBody::Synonym(s) => Ok(s.script()),
        }
    }
}

/// Objects that hang off a top-level object and script after it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Related {
    pub foreign_keys: Vec<ForeignKey>,
    pub constraints: Vec<Constraint>,
    pub indexes: Vec<Index>,
    pub permissions: Vec<Permission>,
    pub extended_properties: Vec<ExtendedProperty>,
}

/// A section of related statements, e.g. every index of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub statements: Vec<String>,
}

impl Related {
    /// Put siblings into scripting order: foreign keys and constraints by
    /// name, indexes by [`Index::script_order`]. Permissions and extended
    /// properties keep query order.
    pub fn sorted(mut self) -> Self {
        self.foreign_keys.sort_by(|a, b| by_name(&a.name, &b.name));
        self.constraints.sort_by(|a, b| by_name(&a.name, &b.name));
        self.indexes.sort_by(Index::script_order);
        self
    }

    /// The five sections in script order. Empty sections are included.
    pub fn sections(&self) -> [Section; 5] {
        [
            Section {
                title: "FOREIGN KEYS",
                statements: self.foreign_keys.iter().map(ForeignKey::script).collect(),
            },
            Section {
                title: "CONSTRAINTS",
                statements: self.constraints.iter().map(Constraint::script).collect(),
            },
            Section {
                title: "INDEXES",
                statements: self.indexes.iter().map(Index::script).collect(),
            },
            Section {
                title: "PERMISSIONS",
                statements: self.permissions.iter().map(Permission::script).collect(),
            },
            Section {
                title: "EXTENDED PROPERTIES",
                statements: self
                    .extended_properties
                    .iter()
                    .map(ExtendedProperty::script)
                    .collect(),
            },
        ]
    }
}

/// A top-level object ready to be scripted: the immutable body plus
/// whatever related objects the scripter fetched for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptObject {
    pub object: ObjectRef,
    pub body: ObjectBody,
    pub related: Related,
}

impl ScriptObject {
    pub fn new(object: ObjectRef, body: ObjectBody, related: Related) -> Self {
        Self {
            object,
            body,
            related: related.sorted(),
        }
    }
}

/// Case-insensitive name order with an exact tiebreak.
pub(crate) fn by_name(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
