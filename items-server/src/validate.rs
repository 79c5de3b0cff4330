//! Request body shapes for the items router.
//!
//! Bodies arrive as arbitrary JSON. They are checked here, once, and turned
//! into types whose existence proves the constraints hold; handlers never
//! inspect raw bodies themselves.

use memstore::KEY_FIELD;
use serde_json::{Map, Value};

use crate::error::AppError;

pub const TITLE_FIELD: &str = "title";

/// A body accepted for creating or replacing an item: a JSON object with a
/// non-empty string `title`. Any client-supplied `key` is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    fields: Map<String, Value>,
}

impl NewItem {
    pub fn from_value(body: Value) -> Result<Self, AppError> {
        let mut fields = require_object(body)?;
        match fields.get(TITLE_FIELD) {
            None | Some(Value::Null) => return Err(AppError::validation("title is required")),
            Some(title) => check_title(title)?,
        }
        fields.remove(KEY_FIELD);
        Ok(Self { fields })
    }

    pub fn title(&self) -> &str {
        self.fields
            .get(TITLE_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

/// A partial update. `title`, if present, obeys the same rule as on create.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPatch {
    fields: Map<String, Value>,
}

impl ItemPatch {
    pub fn from_value(body: Value) -> Result<Self, AppError> {
        let mut fields = require_object(body)?;
        if let Some(title) = fields.get(TITLE_FIELD) {
            check_title(title)?;
        }
        fields.remove(KEY_FIELD);
        Ok(Self { fields })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

fn require_object(body: Value) -> Result<Map<String, Value>, AppError> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(AppError::validation("body must be a JSON object")),
    }
}

fn check_title(title: &Value) -> Result<(), AppError> {
    match title {
        Value::String(s) if s.trim().is_empty() => Err(AppError::validation("title must not be empty")),
        Value::String(_) => Ok(()),
        _ => Err(AppError::validation("title must be a string")),
    }
}
