//! Synonyms

use crate::catalog::{Row, RowReader};
use crate::error::Result;
use crate::quoting::qualified;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synonym {
    pub schema: String,
    pub name: String,
    /// Already bracketed by the catalog, e.g. `[Sales].[dbo].[Orders]`
    pub base_object_name: String,
}

impl Synonym {
    pub fn from_row(row: &Row) -> Result<Self> {
        let r = RowReader::new(row, "synonym");
        Ok(Self {
            schema: r.string("schema")?,
            name: r.string("name")?,
            base_object_name: r.string("base_object_name")?,
        })
    }

    pub fn script(&self) -> String {
        format!(
            "CREATE SYNONYM {} FOR {};",
            qualified(&self.schema, &self.name),
            self.base_object_name
        )
    }
}
