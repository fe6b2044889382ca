//! Schema documents supplying field names.
//!
//! Accepts either a bare JSON array of names or an object with a `fields`
//! array, which covers feature-service layer descriptions:
//!
//! ```json
//! {"fields": [{"name": "STATE_NAME", "alias": "State", "type": "esriFieldTypeString"}]}
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldError, Result};
use crate::registry::FieldRegistry;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<SchemaField>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaDocument {
    Names(Vec<String>),
    Described(Schema),
}

impl Schema {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = names
            .into_iter()
            .map(|name| SchemaField {
                name: name.into(),
                alias: None,
                field_type: None,
            })
            .collect();
        Self { fields }
    }

    pub fn from_json(input: &str) -> Result<Self> {
        let document: SchemaDocument =
            serde_json::from_str(input).map_err(|err| FieldError::json("schema document", err))?;
        Ok(match document {
            SchemaDocument::Names(names) => Self::from_names(names),
            SchemaDocument::Described(schema) => schema,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FieldError::path_not_found(path));
        }

        let content = fs::read_to_string(path)?;
        let schema = Self::from_json(&content)?;
        debug!(path = %path.display(), fields = schema.fields.len(), "schema loaded");
        Ok(schema)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Fresh registry with every schema field inactive. Duplicate names in the
    /// document are an error.
    pub fn to_registry(&self) -> Result<FieldRegistry> {
        FieldRegistry::with_fields(self.field_names())
    }
}
