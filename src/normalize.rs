use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::error::AssetError;
use crate::utils::files;

/// Lowercase parameters
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Object key whose string value gets lowercased
    pub field: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeSummary {
    /// Elements in the array
    pub elements: usize,
    /// Elements whose value actually changed
    pub changed: usize,
}

/// Lowercase `field` on every object that has it. Other keys, key order and
/// elements without the field are left as they are.
pub fn lowercase_field(items: &mut [Value], field: &str) -> Result<usize, AssetError> {
    let mut changed = 0;

    for (index, item) in items.iter_mut().enumerate() {
        let object = item.as_object_mut().ok_or_else(|| {
            AssetError::InvalidDocument(format!("element {} is not an object", index))
        })?;

        let Some(value) = object.get_mut(field) else {
            continue;
        };

        let text = value.as_str().ok_or_else(|| AssetError::NonStringField {
            index,
            field: field.to_string(),
        })?;

        let lowered = text.to_lowercase();
        if lowered != text {
            *value = Value::String(lowered);
            changed += 1;
        }
    }

    Ok(changed)
}

/// Read the input array, lowercase the field and write a new pretty-printed file.
/// Any problem with the input aborts before the output is created.
pub fn normalize_file(config: &NormalizeConfig) -> Result<NormalizeSummary, AssetError> {
    if files::same_file(&config.input, &config.output) {
        return Err(AssetError::SameInputOutput(config.output.clone()));
    }

    let content = fs::read_to_string(&config.input).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AssetError::InputNotFound(config.input.clone()),
        _ => AssetError::Io(e),
    })?;

    let Value::Array(mut items) = serde_json::from_str::<Value>(&content)? else {
        return Err(AssetError::InvalidDocument(
            "top-level value is not an array".to_string(),
        ));
    };

    let changed = lowercase_field(&mut items, &config.field)?;
    let elements = items.len();
    debug!(elements, changed, field = %config.field, "normalized document");

    let mut rendered = serde_json::to_string_pretty(&Value::Array(items))?;
    rendered.push('\n');
    fs::write(&config.output, rendered)?;

    Ok(NormalizeSummary { elements, changed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn config(temp: &TempDir) -> NormalizeConfig {
        NormalizeConfig {
            input: temp.path().join("encaustic.json"),
            output: temp.path().join("encaustic_lower.json"),
            field: "src".to_string(),
        }
    }

    #[test]
    fn lowercases_only_the_field() {
        let mut items = vec![
            json!({"src": "Foo.PNG", "other": 1}),
            json!({"nosrc": 2}),
            json!({"src": "already/lower.jpg", "alt": "Keep Me"}),
        ];

        let changed = lowercase_field(&mut items, "src").unwrap();

        assert_eq!(changed, 1);
        assert_eq!(
            items,
            vec![
                json!({"src": "foo.png", "other": 1}),
                json!({"nosrc": 2}),
                json!({"src": "already/lower.jpg", "alt": "Keep Me"}),
            ]
        );
    }

    #[test]
    fn rejects_non_string_values() {
        let mut items = vec![json!({"src": "A.jpg"}), json!({"src": 42})];

        let err = lowercase_field(&mut items, "src").unwrap_err();
        assert!(matches!(
            err,
            AssetError::NonStringField { index: 1, ref field } if field == "src"
        ));
    }

    #[test]
    fn rejects_non_object_elements() {
        let mut items = vec![json!("src")];
        assert!(matches!(
            lowercase_field(&mut items, "src"),
            Err(AssetError::InvalidDocument(_))
        ));
    }

    #[test]
    fn writes_a_new_file_preserving_order() {
        let temp = TempDir::new().unwrap();
        let cfg = config(&temp);
        let input = r#"[{"src":"Foo.PNG","other":1},{"nosrc":2}]"#;
        fs::write(&cfg.input, input).unwrap();

        let summary = normalize_file(&cfg).unwrap();

        assert_eq!(summary, NormalizeSummary { elements: 2, changed: 1 });
        assert_eq!(fs::read_to_string(&cfg.input).unwrap(), input);

        let written = fs::read_to_string(&cfg.output).unwrap();
        assert_eq!(
            written,
            "[\n  {\n    \"src\": \"foo.png\",\n    \"other\": 1\n  },\n  {\n    \"nosrc\": 2\n  }\n]\n"
        );
    }

    #[test]
    fn keeps_key_order_when_field_is_not_first() {
        let temp = TempDir::new().unwrap();
        let cfg = config(&temp);
        fs::write(&cfg.input, r#"[{"zeta":true,"src":"X.JPG","alpha":null}]"#).unwrap();

        normalize_file(&cfg).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&cfg.output).unwrap()).unwrap();
        let keys: Vec<&str> = written[0]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["zeta", "src", "alpha"]);
        assert_eq!(written[0]["src"], "x.jpg");
    }

    #[test]
    fn non_string_field_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let cfg = config(&temp);
        fs::write(&cfg.input, r#"[{"src":"OK.png"},{"src":["nested"]}]"#).unwrap();

        assert!(matches!(
            normalize_file(&cfg),
            Err(AssetError::NonStringField { index: 1, .. })
        ));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn top_level_must_be_an_array() {
        let temp = TempDir::new().unwrap();
        let cfg = config(&temp);
        fs::write(&cfg.input, r#"{"src":"A.png"}"#).unwrap();

        assert!(matches!(
            normalize_file(&cfg),
            Err(AssetError::InvalidDocument(_))
        ));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn malformed_json_is_fatal() {
        let temp = TempDir::new().unwrap();
        let cfg = config(&temp);
        fs::write(&cfg.input, "[{\"src\": ").unwrap();

        assert!(matches!(normalize_file(&cfg), Err(AssetError::Json(_))));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn missing_input_is_reported() {
        let temp = TempDir::new().unwrap();
        let cfg = config(&temp);

        assert!(matches!(
            normalize_file(&cfg),
            Err(AssetError::InputNotFound(p)) if p == cfg.input
        ));
    }

    #[test]
    fn refuses_to_overwrite_the_input() {
        let temp = TempDir::new().unwrap();
        let mut cfg = config(&temp);
        fs::write(&cfg.input, "[]").unwrap();
        cfg.output = cfg.input.clone();

        assert!(matches!(
            normalize_file(&cfg),
            Err(AssetError::SameInputOutput(_))
        ));
        assert_eq!(fs::read_to_string(&cfg.input).unwrap(), "[]");
    }
}
