//! Schema object model
//!
//! Every entity is an immutable value built from catalog rows and able to
//! render itself as T-SQL. Identifiers are stored raw and quoted on render.

mod column;
mod constraint;
mod extended_property;
mod foreign_key;
mod index;
mod login;
mod object;
mod permission;
mod script_object;
mod synonym;
mod table;
pub mod type_spec;

pub use column::{Column, ColumnKind, Identity};
pub use constraint::Constraint;
pub use extended_property::{ExtendedProperty, ScopeLevel, MAX_SCOPE_LEVELS};
pub use foreign_key::{ForeignKey, ForeignKeyColumn, NO_ACTION};
pub use index::{Index, IndexColumn, IndexType};
pub use login::{Login, LoginType, ServerRoleSyntax};
pub use object::{owner_key, BodySource, KindInfo, ObjectKind, ObjectRef, OBJECT_KINDS};
pub use permission::{Permission, PermissionState};
pub use script_object::{ObjectBody, Related, ScriptObject, Section};
pub(crate) use script_object::by_name;
pub use synonym::Synonym;
pub use table::Table;
pub use type_spec::type_spec;
