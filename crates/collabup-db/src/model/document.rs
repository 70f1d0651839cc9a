use diesel::{pg::Pg, prelude::*};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::db::schema;

/// A JSON object stored under a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    #[must_use]
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Returns a string field, or `None` when it is missing or not a string.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Returns the document body with its id folded in under `id`.
    #[must_use]
    pub fn into_json_with_id(self) -> Value {
        let mut object = match self.data {
            Value::Object(object) => object,
            _ => Map::new(),
        };
        object.insert("id".to_string(), Value::String(self.id));
        Value::Object(object)
    }
}

#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = schema::document)]
#[diesel(check_for_backend(Pg))]
pub struct DocumentRow {
    pub id: String,
    pub data: Value,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            data: row.data,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::document)]
pub struct NewDocument<'a> {
    pub collection: &'a str,
    pub id: &'a str,
    pub data: &'a Value,
}
