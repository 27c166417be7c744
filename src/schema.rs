//! Typed input records for workflows and function steps.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

use crate::{Error, Result};

/// The JSON type a field must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    /// Any non-null value.
    Any,
}

impl FieldType {
    /// Whether `value` is an instance of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
            FieldType::Any => true,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Any => "any",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_required() -> bool {
    true
}

/// Definition of a single named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named, typed record describing the inputs a workflow or function step accepts.
///
/// # Example
///
/// ```rust
/// use agent_workflow::{FieldType, InputSchema};
/// use serde_json::json;
///
/// let schema = InputSchema::new("Article")
///     .with_field("text", FieldType::String)
///     .with_optional_field("max_words", FieldType::Integer);
///
/// let ok = json!({"text": "..."}).as_object().cloned().unwrap();
/// assert!(schema.validate(&ok).is_ok());
///
/// let bad = json!({"max_words": 10}).as_object().cloned().unwrap();
/// assert!(schema.validate(&bad).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl InputSchema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Set the schema description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a required field.
    pub fn with_field(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.with_def(FieldDef {
            name: name.into(),
            field_type,
            required: true,
            description: None,
        })
    }

    /// Add an optional field.
    pub fn with_optional_field(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.with_def(FieldDef {
            name: name.into(),
            field_type,
            required: false,
            description: None,
        })
    }

    /// Add a fully specified field definition. A field with the same name is replaced.
    pub fn with_def(mut self, def: FieldDef) -> Self {
        self.fields.retain(|existing| existing.name != def.name);
        self.fields.push(def);
        self
    }

    /// Whether `name` is a declared field.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    /// Check `inputs` against the declared fields.
    ///
    /// Extra entries are accepted. All violations are reported in one error.
    pub fn validate(&self, inputs: &Map<String, Value>) -> Result<()> {
        let mut problems = Vec::new();

        for field in &self.fields {
            match inputs.get(&field.name) {
                None | Some(Value::Null) if field.required => {
                    problems.push(format!("missing required field '{}'", field.name));
                }
                Some(value) if !value.is_null() && !field.field_type.accepts(value) => {
                    problems.push(format!(
                        "field '{}' expected {}, found {}",
                        field.name,
                        field.field_type,
                        type_name(value)
                    ));
                }
                _ => {}
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(format!("{}: {}", self.name, problems.join("; "))))
        }
    }

    /// Keep only the entries of `values` that are declared fields.
    ///
    /// Declared fields missing from `values` are simply absent from the result.
    pub fn select(&self, values: &Map<String, Value>) -> Map<String, Value> {
        values
            .iter()
            .filter(|(key, _)| self.contains(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Render the schema as a JSON Schema object, as expected by tool-calling APIs.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let mut property = Map::new();
            if field.field_type != FieldType::Any {
                property.insert("type".to_string(), json!(field.field_type.as_str()));
            }
            if let Some(description) = &field.description {
                property.insert("description".to_string(), json!(description));
            }
            properties.insert(field.name.clone(), Value::Object(property));
        }

        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name.as_str())
            .collect();

        let mut schema = json!({
            "title": self.name,
            "type": "object",
            "properties": properties,
            "required": required,
        });
        if let (Some(description), Some(object)) = (&self.description, schema.as_object_mut()) {
            object.insert("description".to_string(), json!(description));
        }
        schema
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn schema() -> InputSchema {
        InputSchema::new("Inputs")
            .with_field("a", FieldType::Integer)
            .with_field("b", FieldType::Integer)
    }

    #[test]
    fn test_select_keeps_declared_fields() {
        let selected = schema().select(&map(json!({"a": 1, "b": 2, "c": 3})));
        assert_eq!(Value::Object(selected), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_select_leaves_missing_fields_absent() {
        let selected = schema().select(&map(json!({"a": 1})));
        assert_eq!(Value::Object(selected), json!({"a": 1}));
    }

    #[test]
    fn test_validate_accepts_extra_fields() {
        assert!(schema().validate(&map(json!({"a": 1, "b": 2, "extra": "x"}))).is_ok());
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let err = schema()
            .validate(&map(json!({"a": "one"})))
            .unwrap_err()
            .to_string();

        assert!(err.contains("field 'a' expected integer, found string"));
        assert!(err.contains("missing required field 'b'"));
    }

    #[test]
    fn test_optional_field_may_be_null() {
        let schema = InputSchema::new("Inputs").with_optional_field("note", FieldType::String);
        assert!(schema.validate(&map(json!({"note": null}))).is_ok());
        assert!(schema.validate(&Map::new()).is_ok());
    }

    #[test]
    fn test_integer_rejects_float() {
        let schema = InputSchema::new("Inputs").with_field("n", FieldType::Integer);
        assert!(schema.validate(&map(json!({"n": 1.5}))).is_err());

        let schema = InputSchema::new("Inputs").with_field("n", FieldType::Number);
        assert!(schema.validate(&map(json!({"n": 1.5}))).is_ok());
    }

    #[test]
    fn test_schema_deserialize() {
        let schema: InputSchema = serde_json::from_value(json!({
            "name": "Query",
            "fields": [
                {"name": "question", "type": "string"},
                {"name": "limit", "type": "integer", "required": false}
            ]
        }))
        .unwrap();

        assert_eq!(schema.fields.len(), 2);
        assert!(schema.fields[0].required);
        assert!(!schema.fields[1].required);
        assert_eq!(schema.fields[1].field_type, FieldType::Integer);
    }

    #[test]
    fn test_to_json_schema() {
        let schema = InputSchema::new("Query")
            .with_field("question", FieldType::String)
            .with_optional_field("limit", FieldType::Integer);

        assert_eq!(
            schema.to_json_schema(),
            json!({
                "title": "Query",
                "type": "object",
                "properties": {
                    "question": {"type": "string"},
                    "limit": {"type": "integer"}
                },
                "required": ["question"]
            })
        );
    }
}
