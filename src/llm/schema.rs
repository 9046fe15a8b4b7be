//! JSON schema generation for structured model output
//!
//! Schemas are derived from the output types with `schemars`, then reshaped per
//! binding mode:
//! - [`inline_schema`]: refs inlined, metadata stripped; embedded in prompts for JSON mode
//! - [`native_schema`]: additionally reduced to the OpenAPI subset Gemini accepts

use crate::error::{Result, ScraperError};
use schemars::{JsonSchema, schema_for};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Keys Gemini rejects in `responseSchema`
const NATIVE_UNSUPPORTED: [&str; 6] = ["$schema", "title", "additionalProperties", "default", "format", "examples"];

/// Self-contained JSON schema for `T`
pub fn inline_schema<T: JsonSchema>() -> Value {
    let mut value = serde_json::to_value(schema_for!(T)).unwrap_or_default();

    inline_refs(&mut value);

    if let Value::Object(map) = &mut value {
        map.remove("$defs");
        map.remove("definitions");
        map.remove("$schema");
    }

    value
}

/// Schema for `T` in the shape accepted by providers that bind schemas natively
pub fn native_schema<T: JsonSchema>() -> Value {
    let mut value = inline_schema::<T>();
    to_native(&mut value);
    value
}

/// Decode a model reply into `T`, tolerating code fences and surrounding prose
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let json = extract_json(raw)
        .ok_or_else(|| ScraperError::ModelResponse(format!("No JSON object in model reply: {}", preview(raw))))?;

    serde_json::from_str(json).map_err(|e| ScraperError::ModelResponse(format!("{}: {}", e, preview(raw))))
}

/// The outermost `{...}` span of a reply
pub fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

fn preview(raw: &str) -> String {
    raw.chars().take(200).collect()
}

fn inline_refs(value: &mut Value) {
    let definitions = match value {
        Value::Object(map) => map.get("$defs").or_else(|| map.get("definitions")).cloned(),
        _ => None,
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref").cloned() {
                let type_name = ref_path.trim_start_matches("#/$defs/").trim_start_matches("#/definitions/");
                if let Some(def) = definitions.get(type_name) {
                    *value = def.clone();
                    inline_refs_recursive(value, definitions);
                    return;
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}

fn to_native(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in NATIVE_UNSUPPORTED {
                map.remove(key);
            }
            collapse_nullable_type(map);
            collapse_nullable_any_of(map);

            for (key, v) in map.iter_mut() {
                // property names live under "properties" and must not be mistaken for keywords
                if key == "properties" {
                    if let Value::Object(props) = v {
                        for prop in props.values_mut() {
                            to_native(prop);
                        }
                    }
                } else {
                    to_native(v);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                to_native(item);
            }
        }
        _ => {}
    }
}

/// `"type": ["string", "null"]` becomes `"type": "string", "nullable": true`
fn collapse_nullable_type(map: &mut Map<String, Value>) {
    let Some(Value::Array(types)) = map.get("type") else {
        return;
    };

    let non_null: Vec<Value> = types.iter().filter(|t| t.as_str() != Some("null")).cloned().collect();
    let nullable = non_null.len() < types.len();

    if let [single] = non_null.as_slice() {
        map.insert("type".to_string(), single.clone());
        if nullable {
            map.insert("nullable".to_string(), Value::Bool(true));
        }
    }
}

/// `anyOf: [X, {"type": "null"}]` becomes X with `"nullable": true`
fn collapse_nullable_any_of(map: &mut Map<String, Value>) {
    let Some(Value::Array(variants)) = map.get("anyOf") else {
        return;
    };

    let is_null = |v: &Value| v.get("type").and_then(Value::as_str) == Some("null");
    let non_null: Vec<&Value> = variants.iter().filter(|v| !is_null(v)).collect();

    if non_null.len() == 1 && variants.len() == 2 {
        if let Value::Object(inner) = non_null[0].clone() {
            map.remove("anyOf");
            map.extend(inner);
            map.insert("nullable".to_string(), Value::Bool(true));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobDetailRecord, JobSearchResult};
    use serde::Deserialize;

    fn contains_key(value: &Value, key: &str) -> bool {
        match value {
            Value::Object(map) => map.contains_key(key) || map.values().any(|v| contains_key(v, key)),
            Value::Array(items) => items.iter().any(|v| contains_key(v, key)),
            _ => false,
        }
    }

    #[test]
    fn test_inline_schema_has_no_refs() {
        let schema = inline_schema::<JobSearchResult>();

        assert!(!contains_key(&schema, "$ref"));
        assert!(!contains_key(&schema, "$defs"));
        let item = &schema["properties"]["jobs"]["items"];
        assert_eq!(item["properties"]["job_url"]["type"], "string");
        assert_eq!(item["properties"]["job_name"]["description"], "Name of the job");
    }

    #[test]
    fn test_native_schema_collapses_nullable() {
        let schema = native_schema::<JobDetailRecord>();

        let salary = &schema["properties"]["job_salary"];
        assert_eq!(salary["type"], "string");
        assert_eq!(salary["nullable"], true);
        assert!(!contains_key(&schema, "$schema"));
        assert!(!contains_key(&schema, "additionalProperties"));
    }

    #[test]
    fn test_native_schema_keeps_property_named_like_keyword() {
        #[derive(Deserialize, JsonSchema)]
        #[allow(dead_code)]
        struct Odd {
            title: String,
        }

        let schema = native_schema::<Odd>();
        assert_eq!(schema["properties"]["title"]["type"], "string");
    }

    #[test]
    fn test_extract_json_from_fenced_reply() {
        let raw = "Here you go:\n```json\n{\"jobs\": []}\n```";
        assert_eq!(extract_json(raw), Some("{\"jobs\": []}"));
        assert_eq!(extract_json("no json"), None);
        assert_eq!(extract_json("} {"), None);
    }

    #[test]
    fn test_decode() {
        let result: JobSearchResult =
            decode(r#"```json {"jobs": [{"job_name": "A", "job_url": "https://x.io/a"}]} ```"#).unwrap();
        assert_eq!(result.jobs.len(), 1);

        let err = decode::<JobSearchResult>("sorry, I cannot help").unwrap_err();
        assert!(matches!(err, ScraperError::ModelResponse(_)));
    }
}
