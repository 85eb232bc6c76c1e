//! Extraction of JSON payloads from free-form generator output.
//!
//! Generators are asked to answer in JSON but routinely wrap it in prose or
//! code fences. The helpers here locate the first span that actually parses
//! and never fail: anything unusable comes back as `None`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Raw generator output that is expected to embed a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredOutput {
    raw: String,
}

impl StructuredOutput {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The unmodified generator output.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn into_raw(self) -> String {
        self.raw
    }

    /// The first parseable JSON array in the output.
    pub fn array(&self) -> Option<Vec<Value>> {
        extract_json_array(&self.raw)
    }

    /// The first parseable JSON object in the output.
    pub fn object(&self) -> Option<Map<String, Value>> {
        extract_json_object(&self.raw)
    }

    /// Deserialize the first JSON object in the output into `T`.
    pub fn parse_object<T: DeserializeOwned>(&self) -> Option<T> {
        let object = self.object()?;
        serde_json::from_value(Value::Object(object)).ok()
    }
}

/// Find the first syntactically valid JSON array in `text`.
pub fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    match first_value_starting_with(text, '[')? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

/// Find the first syntactically valid JSON object in `text`.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    match first_value_starting_with(text, '{')? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn first_value_starting_with(text: &str, open: char) -> Option<Value> {
    text.match_indices(open).find_map(|(start, _)| {
        // Parse one value from this offset and ignore whatever trails it.
        serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<Value>()
            .next()
            .and_then(|parsed| parsed.ok())
    })
}
