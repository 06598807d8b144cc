use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a value: pretty JSON, or `render` for text mode
pub fn output_value(output_format: OutputFormat, value: &Value, render: impl FnOnce(&Value)) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => render(value),
    }
    Ok(())
}

/// String field for text output, `-` when absent
pub fn field<'a>(value: &'a Value, name: &str) -> &'a str {
    value.get(name).and_then(Value::as_str).unwrap_or("-")
}

/// Split a `name=value` argument
pub fn parse_key_value(arg: &str) -> anyhow::Result<(String, String)> {
    arg.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| anyhow::anyhow!("expected name=value, got '{}'", arg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_pairs() {
        assert_eq!(parse_key_value("name=Ana").unwrap(), ("name".into(), "Ana".into()));
        assert_eq!(parse_key_value("url=a=b").unwrap(), ("url".into(), "a=b".into()));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn field_defaults_to_dash() {
        let value = json!({ "name": "CRM" });
        assert_eq!(field(&value, "name"), "CRM");
        assert_eq!(field(&value, "code"), "-");
    }
}
