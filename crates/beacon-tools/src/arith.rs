//! Built-in arithmetic example tool.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::descriptor::{InputSchema, ToolDescriptor};
use crate::errors::ToolError;
use crate::traits::BeaconTool;

/// Adds two numbers.
///
/// Missing or non-numeric `a`/`b` default to `0` per field rather than
/// rejecting the call. This is documented behavior callers rely on, not a
/// validation gap to tighten.
pub struct AddTool;

#[async_trait]
impl BeaconTool for AddTool {
    fn name(&self) -> &str {
        "add"
    }

    fn descriptor(&self) -> ToolDescriptor {
        let mut props = serde_json::Map::new();
        let _ = props.insert(
            "a".into(),
            json!({"type": "number", "description": "First addend (defaults to 0)"}),
        );
        let _ = props.insert(
            "b".into(),
            json!({"type": "number", "description": "Second addend (defaults to 0)"}),
        );
        ToolDescriptor {
            name: "add".into(),
            description: "Adds two numbers and returns the sum. Missing operands default to 0."
                .into(),
            input_schema: InputSchema::object(props),
        }
    }

    async fn invoke(&self, args: &Value) -> Result<String, ToolError> {
        let a = args.get("a").and_then(Value::as_f64).unwrap_or(0.0);
        let b = args.get("b").and_then(Value::as_f64).unwrap_or(0.0);
        let sum = a + b;
        Ok(format!("{a} + {b} = {sum}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn adds_two_numbers() {
        let out = AddTool.invoke(&json!({"a": 2, "b": 3})).await.unwrap();
        assert_eq!(out, "2 + 3 = 5");
    }

    #[tokio::test]
    async fn missing_a_defaults_to_zero() {
        let out = AddTool.invoke(&json!({"b": 7})).await.unwrap();
        assert_eq!(out, "0 + 7 = 7");
    }

    #[tokio::test]
    async fn missing_b_defaults_to_zero() {
        let out = AddTool.invoke(&json!({"a": 4})).await.unwrap();
        assert_eq!(out, "4 + 0 = 4");
    }

    #[tokio::test]
    async fn null_args_default_both_operands() {
        let out = AddTool.invoke(&Value::Null).await.unwrap();
        assert_eq!(out, "0 + 0 = 0");
    }

    #[tokio::test]
    async fn non_numeric_operand_defaults() {
        let out = AddTool
            .invoke(&json!({"a": "two", "b": 3}))
            .await
            .unwrap();
        assert_eq!(out, "0 + 3 = 3");
    }

    #[tokio::test]
    async fn fractional_operands() {
        let out = AddTool.invoke(&json!({"a": 1.5, "b": 2.25})).await.unwrap();
        assert_eq!(out, "1.5 + 2.25 = 3.75");
    }

    #[test]
    fn descriptor_lists_both_operands() {
        let desc = AddTool.descriptor();
        assert_eq!(desc.name, "add");
        let props = desc.input_schema.properties.unwrap();
        assert!(props.contains_key("a"));
        assert!(props.contains_key("b"));
    }
}
