//! Query specification and window injection
//!
//! A [`QuerySpec`] is the caller-owned search body. The cursor passes it
//! through opaquely; the only fields it ever touches are `from` and
//! `size`, merged in fresh for each page fetch.
//!
//! Every spec owns its body outright. The default `match_all` body is
//! built fresh per call, so no two cursors can alias one another's query
//! through a shared default.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, FROM_FIELD, SIZE_FIELD};
use serde::Serialize;
use serde_json::json;

/// An opaque, immutable search body.
///
/// Keys are unique and insertion order is irrelevant. The body is never
/// mutated after construction; [`QuerySpec::windowed`] works on a copy.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    body: JsonObject,
}

impl QuerySpec {
    /// Create a spec from a raw JSON object.
    pub fn new(body: JsonObject) -> Self {
        Self { body }
    }

    /// The match-all query, a fresh copy on every call.
    pub fn match_all() -> Self {
        let JsonValue::Object(body) = json!({ "query": { "match_all": {} } }) else {
            unreachable!("json! object literal");
        };
        Self { body }
    }

    /// Create a spec from a JSON value, which must be an object.
    pub fn from_value(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(body) => Ok(Self { body }),
            other => Err(Error::invalid_query(format!(
                "query body must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Create a spec from any serializable value.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        Self::from_value(serde_json::to_value(value)?)
    }

    /// The underlying body.
    pub fn body(&self) -> &JsonObject {
        &self.body
    }

    /// Merge `from` and `size` into a copy of the body.
    ///
    /// The injected fields override caller-supplied fields of the same
    /// names; everything else passes through untouched.
    pub fn windowed(&self, from: u64, size: u64) -> JsonObject {
        let mut body = self.body.clone();
        body.insert(FROM_FIELD.to_string(), json!(from));
        body.insert(SIZE_FIELD.to_string(), json!(size));
        body
    }
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self::match_all()
    }
}

impl TryFrom<JsonValue> for QuerySpec {
    type Error = Error;

    fn try_from(value: JsonValue) -> Result<Self> {
        Self::from_value(value)
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
