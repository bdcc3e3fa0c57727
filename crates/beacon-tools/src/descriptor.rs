//! Wire-format tool descriptions advertised to callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-Schema-shaped constraint on a tool's input payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    /// Top-level JSON Schema type (always `object` for tool arguments).
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Property definitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Map<String, Value>>,
    /// Required property names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl InputSchema {
    /// An object schema with the given properties and no required fields.
    pub fn object(properties: serde_json::Map<String, Value>) -> Self {
        Self {
            schema_type: "object".into(),
            properties: Some(properties),
            required: None,
        }
    }

    /// An object schema accepting any payload.
    pub fn any_object() -> Self {
        Self {
            schema_type: "object".into(),
            properties: None,
            required: None,
        }
    }
}

/// Describes one invokable operation: name, human description, input shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool name (the `tools/call` target).
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Constraints on the `arguments` payload.
    #[serde(rename = "inputSchema")]
    pub input_schema: InputSchema,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn descriptor_serializes_with_camel_case_schema_key() {
        let desc = ToolDescriptor {
            name: "add".into(),
            description: "Adds numbers".into(),
            input_schema: InputSchema::any_object(),
        };
        let v = serde_json::to_value(&desc).unwrap();
        assert_eq!(v["name"], "add");
        assert!(v.get("inputSchema").is_some());
        assert!(v.get("input_schema").is_none());
        assert_eq!(v["inputSchema"]["type"], "object");
    }

    #[test]
    fn object_schema_keeps_properties() {
        let mut props = serde_json::Map::new();
        let _ = props.insert("a".into(), json!({"type": "number"}));
        let schema = InputSchema::object(props);
        let v = serde_json::to_value(&schema).unwrap();
        assert_eq!(v["properties"]["a"]["type"], "number");
        assert!(v.get("required").is_none());
    }

    #[test]
    fn any_object_omits_properties() {
        let json = serde_json::to_string(&InputSchema::any_object()).unwrap();
        assert!(!json.contains("properties"));
        assert!(!json.contains("required"));
    }

    #[test]
    fn descriptor_roundtrip() {
        let desc = ToolDescriptor {
            name: "t".into(),
            description: "d".into(),
            input_schema: InputSchema::any_object(),
        };
        let json = serde_json::to_string(&desc).unwrap();
        let back: ToolDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, desc);
    }
}
