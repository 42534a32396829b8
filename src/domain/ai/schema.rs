//! Structured output: JSON Schema validation plus typed decoding

use std::fmt;
use std::marker::PhantomData;

use jsonschema::JSONSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::DomainError;

/// Something that can describe an expected JSON shape and turn a provider's
/// JSON output into `T`, rejecting output that does not conform.
pub trait OutputSchema<T>: Send + Sync {
    /// Schema sent to the provider to constrain its output
    fn json_schema(&self) -> &Value;

    /// Validate `value` and decode it
    fn decode(&self, value: Value) -> Result<T, DomainError>;
}

/// [`OutputSchema`] backed by a compiled JSON Schema and serde decoding
pub struct JsonSchemaOutput<T> {
    schema: Value,
    compiled: JSONSchema,
    _output: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> JsonSchemaOutput<T> {
    /// Compile `schema`. An invalid schema is a caller error, not a provider one.
    pub fn new(schema: Value) -> Result<Self, DomainError> {
        if !schema.is_object() {
            return Err(DomainError::validation("Schema must be a JSON object"));
        }

        let compiled = JSONSchema::compile(&schema)
            .map_err(|e| DomainError::validation(format!("Invalid JSON schema: {}", e)))?;

        Ok(Self {
            schema,
            compiled,
            _output: PhantomData,
        })
    }
}

impl<T> fmt::Debug for JsonSchemaOutput<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaOutput")
            .field("schema", &self.schema)
            .finish()
    }
}

impl<T: DeserializeOwned> OutputSchema<T> for JsonSchemaOutput<T> {
    fn json_schema(&self) -> &Value {
        &self.schema
    }

    fn decode(&self, value: Value) -> Result<T, DomainError> {
        if let Err(errors) = self.compiled.validate(&value) {
            let details = errors
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(DomainError::invalid_output(format!(
                "schema validation failed: {}",
                details
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| DomainError::invalid_output(format!("decoding failed: {}", e)))
    }
}

/// Parse provider text as JSON, accepting a surrounding markdown code fence
pub fn parse_json_payload(text: &str) -> Result<Value, serde_json::Error> {
    let trimmed = text.trim();

    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(body.trim())
}
