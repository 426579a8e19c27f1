//! Scripter orchestrator
//!
//! [`Scripter`] pulls metadata from a [`Catalog`], builds model entities and
//! assembles the final script. It works in two modes:
//!
//! - single object: resolve one object, then issue one query per applicable
//!   related kind for it;
//! - whole schema: issue one query per kind across every object and hand each
//!   object its slice, so the query count does not grow with the schema.

mod assembly;
mod batch;
pub mod queries;

use tracing::{debug, info};

use crate::catalog::{Catalog, Row};
use crate::config::ScripterOptions;
use crate::error::{Result, ScriptError};
use crate::grouping::build_grouped;
use crate::model::{
    by_name, BodySource, Column, Constraint, ExtendedProperty, ForeignKey, Index, Login,
    ObjectBody, ObjectKind, ObjectRef, Permission, Related, ScriptObject, Synonym, Table,
};
use crate::quoting::quotename;

use assembly::ScriptWriter;
use queries::Scope;

/// Grouping key for index rows
pub(crate) const INDEX_KEY: &[&str] = &["schema", "table", "name"];
/// Grouping key for foreign key rows
pub(crate) const FOREIGN_KEY_KEY: &[&str] = &["schema", "table", "name"];

/// Generates T-SQL scripts for schema objects read from a catalog.
pub struct Scripter<C> {
    catalog: C,
    options: ScripterOptions,
    queries: usize,
}

/// Which related kinds to attach to an object of a given kind
#[derive(Debug, Clone, Copy)]
pub(crate) struct Wanted {
    pub foreign_keys: bool,
    pub constraints: bool,
    pub indexes: bool,
    pub permissions: bool,
    pub extended_properties: bool,
}

impl Wanted {
    pub fn for_kind(kind: ObjectKind, options: &ScripterOptions) -> Self {
        let info = kind.info();
        Self {
            foreign_keys: options.include_foreign_keys && info.has_table_constraints,
            constraints: options.include_constraints && info.has_table_constraints,
            indexes: options.include_indexes && info.has_indexes,
            permissions: options.include_permissions && info.has_permissions,
            extended_properties: options.include_extended_properties,
        }
    }
}

impl<C: Catalog> Scripter<C> {
    /// Wrap a catalog. When the options name a database, the catalog is
    /// switched to it first.
    pub fn new(mut catalog: C, options: ScripterOptions) -> Result<Self> {
        let mut queries = 0;
        if let Some(database) = &options.database {
            let sql = format!("USE {};", quotename(database));
            debug!(%database, "switching database");
            queries += 1;
            catalog
                .execute(&sql)
                .map_err(|e| ScriptError::catalog(format!("switching to database {}", database), e))?;
        }
        Ok(Self {
            catalog,
            options,
            queries,
        })
    }

    pub fn options(&self) -> &ScripterOptions {
        &self.options
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn into_catalog(self) -> C {
        self.catalog
    }

    /// Statements this scripter has sent to the catalog.
    pub fn query_count(&self) -> usize {
        self.queries
    }

    pub fn script_table(&mut self, name: &str) -> Result<String> {
        self.script_as(name, ObjectKind::Table)
    }

    pub fn script_view(&mut self, name: &str) -> Result<String> {
        self.script_as(name, ObjectKind::View)
    }

    pub fn script_procedure(&mut self, name: &str) -> Result<String> {
        self.script_as(name, ObjectKind::Procedure)
    }

    /// Script a scalar, multi-statement table-valued or inline function.
    pub fn script_function(&mut self, name: &str) -> Result<String> {
        self.script_as(name, ObjectKind::ScalarFunction)
    }

    pub fn script_trigger(&mut self, name: &str) -> Result<String> {
        self.script_as(name, ObjectKind::Trigger)
    }

    pub fn script_synonym(&mut self, name: &str) -> Result<String> {
        self.script_as(name, ObjectKind::Synonym)
    }

    /// Script any object, whatever its kind.
    pub fn script_object(&mut self, name: &str) -> Result<String> {
        let object = self.load_object(name, None)?;
        self.render(std::slice::from_ref(&object))
    }

    /// Script every user table, plus modules and synonyms with
    /// `include_modules`.
    pub fn script_schema(&mut self) -> Result<String> {
        let objects = self.load_schema()?;
        self.render(&objects)
    }

    /// Script every server login, sorted by name.
    pub fn script_logins(&mut self) -> Result<String> {
        let logins = self.load_logins()?;
        self.render_logins(&logins)
    }

    /// Assemble a script for already loaded objects.
    pub fn render(&self, objects: &[ScriptObject]) -> Result<String> {
        let mut writer = ScriptWriter::new(&self.options);
        writer.preamble();
        for object in objects {
            writer.object(object)?;
        }
        Ok(writer.finish())
    }

    /// Assemble a script for already loaded logins. SQL logins without a
    /// readable hash need a password supplied with [`Login::with_password`].
    pub fn render_logins(&self, logins: &[Login]) -> Result<String> {
        let mut writer = ScriptWriter::new(&self.options);
        for login in logins {
            writer.login(login)?;
        }
        Ok(writer.finish())
    }

    /// Resolve one object and fetch everything needed to script it.
    ///
    /// With `expected` set, the object must be of a kind with the same label
    /// (any function kind satisfies a function).
    pub fn load_object(&mut self, name: &str, expected: Option<ObjectKind>) -> Result<ScriptObject> {
        let object = self.resolve(name)?;
        if let Some(expected) = expected {
            if expected.label() != object.kind.label() {
                return Err(ScriptError::KindMismatch {
                    name: object.qualified_name(),
                    expected: expected.label(),
                    actual: object.kind.label(),
                });
            }
        }
        info!(object = %object.qualified_name(), kind = %object.kind, "scripting object");

        let body = self.load_body(&object)?;
        let related = self.load_related(&object)?;
        Ok(ScriptObject::new(object, body, related))
    }

    /// Fetch every server login with its server roles.
    pub fn load_logins(&mut self) -> Result<Vec<Login>> {
        let rows = self.rows("fetching logins", &queries::logins())?;
        let mut logins = build_grouped(&rows, &["name"], Login::from_rows)?;
        logins.sort_by(|a, b| by_name(&a.name, &b.name));
        info!(logins = logins.len(), "loaded logins");
        Ok(logins)
    }

    fn script_as(&mut self, name: &str, kind: ObjectKind) -> Result<String> {
        let object = self.load_object(name, Some(kind))?;
        self.render(std::slice::from_ref(&object))
    }

    fn resolve(&mut self, name: &str) -> Result<ObjectRef> {
        let rows = self.rows(&format!("resolving {}", name), &queries::object_header(name))?;
        let row = rows.first().ok_or_else(|| ScriptError::ObjectNotFound {
            name: name.to_string(),
        })?;
        ObjectRef::from_row(row)
    }

    fn load_body(&mut self, object: &ObjectRef) -> Result<ObjectBody> {
        let name = object.qualified_name();
        let scope = Scope::Object(&name);
        match object.kind.info().body {
            BodySource::Table => {
                let header = self.rows("fetching table header", &queries::tables(scope))?;
                let header = header.first().ok_or_else(|| ScriptError::ObjectNotFound {
                    name: name.clone(),
                })?;
                let columns = self
                    .rows("fetching columns", &queries::columns(scope))?
                    .iter()
                    .map(Column::from_row)
                    .collect::<Result<Vec<_>>>()?;
                Ok(ObjectBody::Table(Table::from_row(header, columns)?))
            }
            BodySource::Module => {
                let context = "fetching module definition";
                self.queries += 1;
                let definition = self
                    .catalog
                    .query_scalar(&queries::module_definition(&name))
                    .map_err(|e| ScriptError::catalog(context, e))?
                    .and_then(|v| v.as_str().map(str::to_string))
                    .ok_or_else(|| ScriptError::MissingDefinition { name: name.clone() })?;
                Ok(ObjectBody::Module(definition))
            }
            BodySource::Synonym => {
                let rows = self.rows("fetching synonym", &queries::synonyms(scope))?;
                let row = rows
                    .first()
                    .ok_or_else(|| ScriptError::ObjectNotFound { name: name.clone() })?;
                Ok(ObjectBody::Synonym(Synonym::from_row(row)?))
            }
        }
    }

    fn load_related(&mut self, object: &ObjectRef) -> Result<Related> {
        let wanted = Wanted::for_kind(object.kind, &self.options);
        let name = object.qualified_name();
        let scope = Scope::Object(&name);
        let mut related = Related::default();

        if wanted.foreign_keys {
            let rows = self.rows("fetching foreign keys", &queries::foreign_keys(scope))?;
            related.foreign_keys = build_grouped(&rows, FOREIGN_KEY_KEY, ForeignKey::from_rows)?;
        }
        if wanted.constraints {
            related.constraints = self
                .rows("fetching constraints", &queries::constraints(scope))?
                .iter()
                .map(Constraint::from_row)
                .collect::<Result<_>>()?;
        }
        if wanted.indexes {
            let rows = self.rows("fetching indexes", &queries::indexes(scope))?;
            related.indexes = build_grouped(&rows, INDEX_KEY, Index::from_rows)?;
        }
        if wanted.permissions {
            related.permissions = self
                .rows("fetching permissions", &queries::permissions(scope))?
                .iter()
                .map(Permission::from_row)
                .collect::<Result<_>>()?;
        }
        if wanted.extended_properties {
            related.extended_properties = self
                .rows(
                    "fetching extended properties",
                    &queries::extended_properties(scope),
                )?
                .iter()
                .map(ExtendedProperty::from_row)
                .collect::<Result<_>>()?;
        }

        debug!(
            object = %name,
            foreign_keys = related.foreign_keys.len(),
            constraints = related.constraints.len(),
            indexes = related.indexes.len(),
            permissions = related.permissions.len(),
            extended_properties = related.extended_properties.len(),
            "loaded related objects"
        );
        Ok(related)
    }

    fn rows(&mut self, context: &str, sql: &str) -> Result<Vec<Row>> {
        self.queries += 1;
        debug!(context, "catalog query");
        self.catalog
            .query_rows(sql)
            .map_err(|e| ScriptError::catalog(context, e))
    }
}
