//! Catalog queries.
//!
//! Every query starts with a `-- fetching ...` comment line. Besides showing
//! up in the server's query log, the tag is what [`MemoryCatalog`] matches
//! on.
//!
//! Each related-object query comes in two shapes built from the same select
//! list: filtered to one object for single-object scripting, or across every
//! user object for whole-schema scripting. Both carry the owner's schema and
//! name so rows can be grouped either way.
//!
//! [`MemoryCatalog`]: crate::catalog::MemoryCatalog

use crate::model::ObjectKind;
use crate::quoting::{comment_text, quote};

/// Which objects a related-object query covers
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    /// One object, by its (possibly qualified) name
    Object(&'a str),
    /// Every user object
    All,
}

impl Scope<'_> {
    fn tag(&self, what: &str) -> String {
        match self {
            Scope::Object(name) => format!("-- fetching {} for {}", what, comment_text(name)),
            Scope::All => format!("-- fetching all {}", what),
        }
    }
}

/// Unicode string literal for an object name
fn literal(name: &str) -> String {
    format!("N{}", quote(name))
}

pub fn object_header(name: &str) -> String {
    format!(
        "-- fetching object {name}
select
  [schema] = object_schema_name(o.object_id),
  o.name,
  type = o.type
from
  sys.objects o
where
  o.object_id = object_id({lit});",
        name = comment_text(name),
        lit = literal(name)
    )
}

pub fn all_objects(kinds: &[ObjectKind]) -> String {
    format!(
        "-- fetching all objects
select
  [schema] = schema_name(o.schema_id),
  o.name,
  type = o.type
from
  sys.objects o
where
  o.is_ms_shipped = 0
  and o.type in ({codes})
order by
  [schema], o.name;",
        codes = ObjectKind::code_list(kinds)
    )
}

pub fn tables(scope: Scope) -> String {
    let filter = match scope {
        Scope::Object(name) => format!("t.object_id = object_id({}, 'U')", literal(name)),
        Scope::All => "t.is_ms_shipped = 0".to_string(),
    };
    format!(
        "{tag}
select
  [schema] = schema_name(t.schema_id),
  t.name,
  data_space = (
    select top 1 filegroup_name(i.data_space_id)
    from   sys.indexes i
    where  i.object_id = t.object_id
    order by i.index_id
  ),
  lob_space = filegroup_name(t.lob_data_space_id)
from
  sys.tables t
where
  {filter};",
        tag = scope_tag(scope, "table", "tables"),
        filter = filter
    )
}

pub fn columns(scope: Scope) -> String {
    let filter = match scope {
        Scope::Object(name) => format!("c.object_id = object_id({}, 'U')", literal(name)),
        Scope::All => "t.is_ms_shipped = 0".to_string(),
    };
    format!(
        "{tag}
select
  [schema] = schema_name(t.schema_id),
  [table] = t.name,
  c.name,
  c.column_id,
  type = type_name(c.user_type_id),
  c.max_length,
  c.precision,
  c.scale,
  c.is_nullable,
  c.is_identity,
  c.is_computed,

  seed_value = convert(bigint, ic.seed_value),
  increment_value = convert(bigint, ic.increment_value),

  computed_definition = cc.definition,
  default_definition = dc.definition

from
  sys.columns c
  inner join sys.tables t on t.object_id = c.object_id
  left join sys.computed_columns cc on cc.object_id = c.object_id
    and cc.column_id = c.column_id
  left join sys.identity_columns ic on ic.object_id = c.object_id
    and ic.column_id = c.column_id
  left join sys.default_constraints dc on dc.object_id = c.default_object_id
where
  {filter}
order by
  [schema], [table], c.column_id;",
        tag = scope.tag("columns"),
        filter = filter
    )
}

pub fn module_definition(name: &str) -> String {
    format!(
        "-- fetching module {name}
select
  definition
from
  sys.sql_modules
where
  object_id = object_id({lit});",
        name = comment_text(name),
        lit = literal(name)
    )
}

pub fn all_modules() -> String {
    "-- fetching all modules
select
  [schema] = object_schema_name(m.object_id),
  name = object_name(m.object_id),
  m.definition
from
  sys.sql_modules m
  inner join sys.objects o on o.object_id = m.object_id
where
  o.is_ms_shipped = 0;"
        .to_string()
}

pub fn synonyms(scope: Scope) -> String {
    let filter = match scope {
        Scope::Object(name) => format!("s.object_id = object_id({}, 'SN')", literal(name)),
        Scope::All => "s.is_ms_shipped = 0".to_string(),
    };
    format!(
        "{tag}
select
  [schema] = schema_name(s.schema_id),
  s.name,
  s.base_object_name
from
  sys.synonyms s
where
  {filter};",
        tag = scope_tag(scope, "synonym", "synonyms"),
        filter = filter
    )
}

pub fn indexes(scope: Scope) -> String {
    let filter = match scope {
        Scope::Object(name) => format!("i.object_id = object_id({})", literal(name)),
        Scope::All => "o.is_ms_shipped = 0 and o.type in ('U', 'V')".to_string(),
    };
    format!(
        "{tag}
select
  -- index properties
  [schema] = schema_name(o.schema_id),
  [table] = o.name,
  i.name,
  type = i.type_desc,
  i.is_primary_key,
  i.is_unique,
  i.ignore_dup_key,
  i.fill_factor,
  i.is_padded,
  i.is_unique_constraint,
  i.has_filter,
  i.filter_definition,
  data_space = filegroup_name(i.data_space_id),

  -- index columns
  column_name = col_name(ic.object_id, ic.column_id),
  ic.is_descending_key,
  ic.is_included_column,
  ic.index_column_id
from
  sys.indexes i
  inner join sys.objects o on o.object_id = i.object_id
  inner join sys.index_columns ic on ic.object_id = i.object_id
    and ic.index_id = i.index_id
where
  {filter}
order by
  [schema], [table], i.index_id, ic.is_included_column, ic.key_ordinal, ic.index_column_id;",
        tag = scope.tag("indexes"),
        filter = filter
    )
}

pub fn foreign_keys(scope: Scope) -> String {
    let filter = match scope {
        Scope::Object(name) => format!("fk.parent_object_id = object_id({})", literal(name)),
        Scope::All => "fk.is_ms_shipped = 0".to_string(),
    };
    format!(
        "{tag}
select
  fk.name,
  [schema] = object_schema_name(fk.parent_object_id),
  [table] = object_name(fk.parent_object_id),
  referencing_column = col_name(fkc.parent_object_id, fkc.parent_column_id),
  referenced_table = object_name(fk.referenced_object_id),
  referenced_table_schema = object_schema_name(fk.referenced_object_id),
  referenced_column = col_name(fkc.referenced_object_id, fkc.referenced_column_id),
  delete_action = fk.delete_referential_action_desc,
  update_action = fk.update_referential_action_desc
from
  sys.foreign_keys fk
  inner join sys.foreign_key_columns fkc on fkc.constraint_object_id = fk.object_id
where
  {filter}
order by
  [schema], [table], fk.name, fkc.constraint_column_id;",
        tag = scope.tag("foreign keys"),
        filter = filter
    )
}

pub fn constraints(scope: Scope) -> String {
    let filter = match scope {
        Scope::Object(name) => format!("parent_object_id = object_id({}, 'U')", literal(name)),
        Scope::All => "is_ms_shipped = 0".to_string(),
    };
    format!(
        "{tag}
select
  name,
  [schema] = object_schema_name(parent_object_id),
  [table] = object_name(parent_object_id),
  [column] = col_name(parent_object_id, parent_column_id),
  definition
from
  sys.check_constraints
where
  {filter};",
        tag = scope.tag("constraints"),
        filter = filter
    )
}

pub fn permissions(scope: Scope) -> String {
    let filter = match scope {
        Scope::Object(name) => format!("p.major_id = object_id({})", literal(name)),
        Scope::All => "o.is_ms_shipped = 0".to_string(),
    };
    format!(
        "{tag}
select
  grant_or_deny = p.state_desc,
  p.permission_name,
  major_schema = schema_name(o.schema_id),
  major_name = o.name,
  minor_name = col_name(p.major_id, p.minor_id),
  grantee = user_name(p.grantee_principal_id)
from
  sys.database_permissions p
  inner join sys.objects o on o.object_id = p.major_id
where
  p.class_desc = 'OBJECT_OR_COLUMN'
  and {filter};",
        tag = scope.tag("permissions"),
        filter = filter
    )
}

/// Extended properties on objects, columns, parameters and indexes.
///
/// `level_2_type` is derived from the owning object's type, so a property on
/// an index of a table comes back labelled `column` with the index name.
pub fn extended_properties(scope: Scope) -> String {
    let filter = match scope {
        Scope::Object(name) => format!("x.major_id = object_id({})", literal(name)),
        Scope::All => "o.is_ms_shipped = 0".to_string(),
    };
    format!(
        "{tag}
select
  name = x.name,
  value = convert(nvarchar(max), x.value),

  level_0_type = 'schema',
  level_0_name = object_schema_name(x.major_id),

  level_1_type = case o.type
          when 'V' then 'view'
          when 'P' then 'procedure'
          when 'U' then 'table'
          when 'FN' then 'function'
          when 'TF' then 'function'
          when 'IF' then 'function'
          when 'SN' then 'synonym'
          when 'TR' then 'trigger'
        end,

  level_1_name = o.name,

  level_2_type = case
          when x.minor_id = 0 then null
          when o.type = 'V' then 'column'
          when o.type = 'P' then 'parameter'
          when o.type = 'U' then 'column'
        end,
  level_2_name = case x.class
          when 1 then col_name(x.major_id, x.minor_id)
          when 2 then (select name from sys.parameters where object_id = x.major_id and parameter_id = x.minor_id)
          when 7 then (select name from sys.indexes where object_id = x.major_id and index_id = x.minor_id)
        end
from
  sys.extended_properties x
  inner join sys.objects o on o.object_id = x.major_id
where
  x.class in (1, 2, 7)
  and {filter};",
        tag = scope.tag("extended properties"),
        filter = filter
    )
}

pub fn logins() -> String {
    "-- fetching logins
select
  p.name,
  p.type,
  p.sid,
  l.password_hash,
  p.default_database_name,
  l.is_policy_checked,
  p.is_disabled,
  role_name = r.name
from
  sys.server_principals p
  left join sys.sql_logins l on l.principal_id = p.principal_id
  left join sys.server_role_members m on m.member_principal_id = p.principal_id
  left join sys.server_principals r on r.principal_id = m.role_principal_id
where
  p.type in ('S', 'U', 'G')
  and p.name not like '##%'
  and p.name <> 'sa'
order by
  p.name, r.name;"
        .to_string()
}

/// Tag for queries whose single-object form names one object rather than
/// "objects for" it.
fn scope_tag(scope: Scope, singular: &str, plural: &str) -> String {
    match scope {
        Scope::Object(name) => format!("-- fetching {} {}", singular, comment_text(name)),
        Scope::All => format!("-- fetching all {}", plural),
    }
}
