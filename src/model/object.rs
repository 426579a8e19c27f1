//! Top-level object kinds and references

use std::fmt;

use crate::catalog::{Row, RowReader};
use crate::error::{Result, ScriptError};
use crate::quoting::{qualified, quote};

/// Kinds of top-level objects the scripter understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Table,
    View,
    Procedure,
    ScalarFunction,
    TableFunction,
    InlineFunction,
    Synonym,
    Trigger,
}

/// Where the main definition of an object comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySource {
    /// Table header plus columns, rendered as CREATE TABLE
    Table,
    /// `sys.sql_modules.definition`, verbatim
    Module,
    /// `sys.synonyms.base_object_name`
    Synonym,
}

/// Static facts about one object kind
#[derive(Debug)]
pub struct KindInfo {
    pub kind: ObjectKind,
    /// `sys.objects.type`
    pub code: &'static str,
    /// Keyword used in CREATE/DROP
    pub keyword: &'static str,
    /// `@level1type` for extended properties, also used in messages
    pub label: &'static str,
    pub body: BodySource,
    pub has_permissions: bool,
    pub has_indexes: bool,
    /// Foreign keys and check constraints
    pub has_table_constraints: bool,
}

/// One entry per kind, in declaration order, which is also whole-schema
/// scripting order.
pub static OBJECT_KINDS: &[KindInfo] = &[
    KindInfo {
        kind: ObjectKind::Table,
        code: "U",
        keyword: "TABLE",
        label: "table",
        body: BodySource::Table,
        has_permissions: true,
        has_indexes: true,
        has_table_constraints: true,
    },
    KindInfo {
        kind: ObjectKind::View,
        code: "V",
        keyword: "VIEW",
        label: "view",
        body: BodySource::Module,
        has_permissions: true,
        has_indexes: true,
        has_table_constraints: false,
    },
    KindInfo {
        kind: ObjectKind::Procedure,
        code: "P",
        keyword: "PROCEDURE",
        label: "procedure",
        body: BodySource::Module,
        has_permissions: true,
        has_indexes: false,
        has_table_constraints: false,
    },
    KindInfo {
        kind: ObjectKind::ScalarFunction,
        code: "FN",
        keyword: "FUNCTION",
        label: "function",
        body: BodySource::Module,
        has_permissions: true,
        has_indexes: false,
        has_table_constraints: false,
    },
    KindInfo {
        kind: ObjectKind::TableFunction,
        code: "TF",
        keyword: "FUNCTION",
        label: "function",
        body: BodySource::Module,
        has_permissions: true,
        has_indexes: false,
        has_table_constraints: false,
    },
    KindInfo {
        kind: ObjectKind::InlineFunction,
        code: "IF",
        keyword: "FUNCTION",
        label: "function",
        body: BodySource::Module,
        has_permissions: true,
        has_indexes: false,
        has_table_constraints: false,
    },
    KindInfo {
        kind: ObjectKind::Synonym,
        code: "SN",
        keyword: "SYNONYM",
        label: "synonym",
        body: BodySource::Synonym,
        has_permissions: true,
        has_indexes: false,
        has_table_constraints: false,
    },
    KindInfo {
        kind: ObjectKind::Trigger,
        code: "TR",
        keyword: "TRIGGER",
        label: "trigger",
        body: BodySource::Module,
        has_permissions: false,
        has_indexes: false,
        has_table_constraints: false,
    },
];

impl ObjectKind {
    /// Registry entry; `OBJECT_KINDS` is laid out in declaration order.
    pub fn info(self) -> &'static KindInfo {
        &OBJECT_KINDS[self as usize]
    }

    /// Resolve a `sys.objects.type` code (trailing blanks allowed).
    pub fn from_code(code: &str) -> Result<Self> {
        let code = code.trim();
        OBJECT_KINDS
            .iter()
            .find(|i| i.code.eq_ignore_ascii_case(code))
            .map(|i| i.kind)
            .ok_or_else(|| ScriptError::UnknownObjectType {
                code: code.to_string(),
            })
    }

    pub fn code(self) -> &'static str {
        self.info().code
    }

    pub fn keyword(self) -> &'static str {
        self.info().keyword
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Comma-separated quoted codes, for `type in (...)` filters.
    pub fn code_list(kinds: &[ObjectKind]) -> String {
        kinds
            .iter()
            .map(|k| quote(k.code()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Schema, name and kind of a top-level object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub schema: String,
    pub name: String,
    pub kind: ObjectKind,
}

impl ObjectRef {
    pub fn new(schema: impl Into<String>, name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            kind,
        }
    }

    /// Build from a row with `schema`, `name` and `type`.
    pub fn from_row(row: &Row) -> Result<Self> {
        let r = RowReader::new(row, "object");
        Ok(Self {
            schema: r.string("schema")?,
            name: r.string("name")?,
            kind: ObjectKind::from_code(&r.string("type")?)?,
        })
    }

    pub fn qualified_name(&self) -> String {
        qualified(&self.schema, &self.name)
    }

    /// Lowercased `[schema].[name]`, the key related objects are grouped under.
    pub fn owner_key(&self) -> String {
        owner_key(&self.schema, &self.name)
    }

    pub fn drop_script(&self) -> String {
        format!(
            "IF OBJECT_ID({}, {}) IS NOT NULL\n  DROP {} {};",
            quote(&self.qualified_name()),
            quote(self.kind.code()),
            self.kind.keyword(),
            self.qualified_name()
        )
    }
}

/// Case-insensitive lookup key for an owning object.
///
/// Both parts are bracket-quoted so that names containing dots cannot
/// collide.
pub fn owner_key(schema: &str, name: &str) -> String {
    qualified(schema, name).to_lowercase()
}
