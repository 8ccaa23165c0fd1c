//! Tool and prompt descriptors advertised to hosting runtimes.

use serde::Serialize;
use serde_json::{json, Value};

/// A tool as listed by `tools/list` and `GET /api/v1/tools`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

impl ToolDescriptor {
    /// A tool that takes no arguments.
    pub fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    /// Adds a string property.
    pub fn with_string(self, name: &str, description: &str, required: bool) -> Self {
        self.with_property(name, json!({"type": "string", "description": description}), required)
    }

    /// Adds a string property restricted to `values`.
    pub fn with_enum(self, name: &str, description: &str, values: &[&str], required: bool) -> Self {
        self.with_property(
            name,
            json!({"type": "string", "description": description, "enum": values}),
            required,
        )
    }

    /// Adds an arbitrary property schema.
    pub fn with_property(mut self, name: &str, schema: Value, required: bool) -> Self {
        if let Some(properties) = self
            .input_schema
            .get_mut("properties")
            .and_then(Value::as_object_mut)
        {
            properties.insert(name.to_string(), schema);
        }
        if required {
            if let Some(list) = self
                .input_schema
                .get_mut("required")
                .and_then(Value::as_array_mut)
            {
                list.push(Value::String(name.to_string()));
            }
        }
        self
    }

    #[cfg(test)]
    pub fn required(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn properties(&self) -> Option<&serde_json::Map<String, Value>> {
        self.input_schema.get("properties").and_then(Value::as_object)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// A prompt as listed by `prompts/list`.
#[derive(Debug, Clone, Serialize)]
pub struct PromptDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<PromptArgument>,
}
