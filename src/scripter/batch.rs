//! Whole-schema scripting
//!
//! One query per kind, then every result set is filed under the owning
//! object's key and each object takes its slice while the object list is
//! walked once.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::catalog::{Catalog, Row, RowReader};
use crate::error::{Result, ScriptError};
use crate::grouping::{build_grouped, partition_by_owner};
use crate::model::{
    by_name, owner_key, BodySource, Column, Constraint, ExtendedProperty, ForeignKey, Index,
    ObjectBody, ObjectKind, ObjectRef, Permission, Related, ScriptObject, Synonym, Table,
    OBJECT_KINDS,
};

use super::queries::{self, Scope};
use super::{Scripter, Wanted, FOREIGN_KEY_KEY, INDEX_KEY};

/// Entities filed under their owner's key
struct ByOwner<T>(HashMap<String, Vec<T>>);

impl<T> ByOwner<T> {
    fn new(items: Vec<T>, owner: impl Fn(&T) -> String) -> Self {
        Self(partition_by_owner(items, owner))
    }

    fn empty() -> Self {
        Self(HashMap::new())
    }

    fn take(&mut self, key: &str) -> Vec<T> {
        self.0.remove(key).unwrap_or_default()
    }
}

/// Lowercased `[schema].[table]` key of the object a row belongs to.
fn row_owner(row: &Row, entity: &'static str, name_field: &str) -> Result<String> {
    let r = RowReader::new(row, entity);
    Ok(owner_key(&r.string("schema")?, &r.string(name_field)?))
}

/// Main definitions of every object, by owner key
#[derive(Default)]
struct Bodies {
    tables: HashMap<String, Row>,
    columns: HashMap<String, Vec<Column>>,
    modules: HashMap<String, String>,
    synonyms: HashMap<String, Synonym>,
}

impl Bodies {
    fn take(&mut self, object: &ObjectRef) -> Result<ObjectBody> {
        let key = object.owner_key();
        let not_found = || ScriptError::ObjectNotFound {
            name: object.qualified_name(),
        };
        match object.kind.info().body {
            BodySource::Table => {
                let header = self.tables.remove(&key).ok_or_else(not_found)?;
                let columns = self.columns.remove(&key).unwrap_or_default();
                Ok(ObjectBody::Table(Table::from_row(&header, columns)?))
            }
            BodySource::Module => self
                .modules
                .remove(&key)
                .map(ObjectBody::Module)
                .ok_or_else(|| ScriptError::MissingDefinition {
                    name: object.qualified_name(),
                }),
            BodySource::Synonym => self
                .synonyms
                .remove(&key)
                .map(ObjectBody::Synonym)
                .ok_or_else(not_found),
        }
    }
}

/// Related objects of every object, by owner key
struct RelatedByOwner {
    foreign_keys: ByOwner<ForeignKey>,
    constraints: ByOwner<Constraint>,
    indexes: ByOwner<Index>,
    permissions: ByOwner<Permission>,
    extended_properties: ByOwner<ExtendedProperty>,
}

impl RelatedByOwner {
    /// Slice for one object; kinds that do not apply to it are left behind.
    fn take(&mut self, object: &ObjectRef, wanted: Wanted) -> Related {
        let key = object.owner_key();
        let mut related = Related::default();
        if wanted.foreign_keys {
            related.foreign_keys = self.foreign_keys.take(&key);
        }
        if wanted.constraints {
            related.constraints = self.constraints.take(&key);
        }
        if wanted.indexes {
            related.indexes = self.indexes.take(&key);
        }
        if wanted.permissions {
            related.permissions = self.permissions.take(&key);
        }
        if wanted.extended_properties {
            related.extended_properties = self.extended_properties.take(&key);
        }
        related
    }
}

impl<C: Catalog> Scripter<C> {
    /// Fetch every object in scope with a fixed number of queries.
    pub fn load_schema(&mut self) -> Result<Vec<ScriptObject>> {
        let start = self.queries;
        let kinds: Vec<ObjectKind> = if self.options.include_modules {
            OBJECT_KINDS.iter().map(|info| info.kind).collect()
        } else {
            vec![ObjectKind::Table]
        };

        let mut objects = self
            .rows("listing objects", &queries::all_objects(&kinds))?
            .iter()
            .map(ObjectRef::from_row)
            .collect::<Result<Vec<_>>>()?;
        objects.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| by_name(&a.name, &b.name))
                .then_with(|| by_name(&a.schema, &b.schema))
        });

        let mut bodies = self.load_all_bodies()?;
        let mut related = self.load_all_related()?;

        let objects = objects
            .into_iter()
            .map(|object| {
                let body = bodies.take(&object)?;
                let related = related.take(&object, Wanted::for_kind(object.kind, &self.options));
                Ok(ScriptObject::new(object, body, related))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            objects = objects.len(),
            queries = self.queries - start,
            "loaded schema"
        );
        Ok(objects)
    }

    fn load_all_bodies(&mut self) -> Result<Bodies> {
        let mut bodies = Bodies::default();

        for row in self.rows("fetching all tables", &queries::tables(Scope::All))? {
            bodies.tables.insert(row_owner(&row, "table", "name")?, row);
        }

        let columns = self
            .rows("fetching all columns", &queries::columns(Scope::All))?
            .iter()
            .map(|row| -> Result<(String, Column)> {
                Ok((row_owner(row, "column", "table")?, Column::from_row(row)?))
            })
            .collect::<Result<Vec<_>>>()?;
        for (owner, column) in columns {
            bodies.columns.entry(owner).or_default().push(column);
        }

        if self.options.include_modules {
            for row in self.rows("fetching all modules", &queries::all_modules())? {
                let owner = row_owner(&row, "module", "name")?;
                if let Some(definition) = RowReader::new(&row, "module").opt_string("definition")? {
                    bodies.modules.insert(owner, definition);
                }
            }
            for row in self.rows("fetching all synonyms", &queries::synonyms(Scope::All))? {
                let synonym = Synonym::from_row(&row)?;
                bodies
                    .synonyms
                    .insert(owner_key(&synonym.schema, &synonym.name), synonym);
            }
        }

        debug!(
            tables = bodies.tables.len(),
            modules = bodies.modules.len(),
            synonyms = bodies.synonyms.len(),
            "loaded object bodies"
        );
        Ok(bodies)
    }

    fn load_all_related(&mut self) -> Result<RelatedByOwner> {
        let scope = Scope::All;

        let foreign_keys = if self.options.include_foreign_keys {
            let rows = self.rows("fetching all foreign keys", &queries::foreign_keys(scope))?;
            ByOwner::new(
                build_grouped(&rows, FOREIGN_KEY_KEY, ForeignKey::from_rows)?,
                |fk| owner_key(&fk.schema, &fk.table),
            )
        } else {
            ByOwner::empty()
        };

        let constraints = if self.options.include_constraints {
            let items = self
                .rows("fetching all constraints", &queries::constraints(scope))?
                .iter()
                .map(Constraint::from_row)
                .collect::<Result<Vec<_>>>()?;
            ByOwner::new(items, |c| owner_key(&c.schema, &c.table))
        } else {
            ByOwner::empty()
        };

        let indexes = if self.options.include_indexes {
            let rows = self.rows("fetching all indexes", &queries::indexes(scope))?;
            ByOwner::new(build_grouped(&rows, INDEX_KEY, Index::from_rows)?, |i| {
                owner_key(&i.schema, &i.table)
            })
        } else {
            ByOwner::empty()
        };

        let permissions = if self.options.include_permissions {
            let items = self
                .rows("fetching all permissions", &queries::permissions(scope))?
                .iter()
                .map(Permission::from_row)
                .collect::<Result<Vec<_>>>()?;
            ByOwner::new(items, |p| owner_key(&p.major_schema, &p.major_name))
        } else {
            ByOwner::empty()
        };

        let extended_properties = if self.options.include_extended_properties {
            let items = self
                .rows(
                    "fetching all extended properties",
                    &queries::extended_properties(scope),
                )?
                .iter()
                .map(ExtendedProperty::from_row)
                .collect::<Result<Vec<_>>>()?;
            ByOwner::new(items, |x| {
                x.owner()
                    .map(|(schema, name)| owner_key(schema, name))
                    .unwrap_or_default()
            })
        } else {
            ByOwner::empty()
        };

        Ok(RelatedByOwner {
            foreign_keys,
            constraints,
            indexes,
            permissions,
            extended_properties,
        })
    }
}
