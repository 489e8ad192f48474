//! Parsing of model responses into per-document classifications.

use serde_json::Value;
use tracing::warn;

use crate::models::{Confidence, TopicClassification};

use super::ClassificationError;

/// Strip a Markdown code fence when the response is wrapped in one.
///
/// Models regularly answer with ```` ```json ... ``` ```` despite being
/// told not to.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    } else {
        return text;
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse a batch response into one result per expected position.
///
/// The outer error covers responses that are unusable as a whole (not
/// JSON, not an array); the caller turns those into a failure for every
/// document in the batch. Individual bad entries only fail their own
/// position. Extra entries beyond `expected` are ignored.
pub fn parse_batch_response(
    raw: &str,
    expected: usize,
) -> Result<Vec<Result<TopicClassification, ClassificationError>>, ClassificationError> {
    let body = strip_code_fences(raw);
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ClassificationError::MalformedJson(e.to_string()))?;
    let entries = value.as_array().ok_or(ClassificationError::NotAnArray)?;

    if entries.len() > expected {
        warn!(
            "Model returned {} entries for {} documents; ignoring the extras",
            entries.len(),
            expected
        );
    }

    Ok((0..expected)
        .map(|position| match entries.get(position) {
            Some(entry) => {
                parse_entry(entry).map_err(|reason| ClassificationError::InvalidEntry {
                    position: position + 1,
                    reason,
                })
            }
            None => Err(ClassificationError::MissingEntry {
                position: position + 1,
            }),
        })
        .collect())
}

/// Parse one array entry. Topic fields and confidence are required;
/// keywords degrade to an empty list.
fn parse_entry(entry: &Value) -> Result<TopicClassification, String> {
    let field = |name: &str| {
        entry
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| format!("missing or non-string field '{name}'"))
    };

    let confidence_raw = field("confianza")?;
    let confidence = Confidence::from_str(&confidence_raw)
        .ok_or_else(|| format!("unknown confidence '{confidence_raw}'"))?;

    let keywords = entry
        .get("palabras_clave")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(TopicClassification {
        general_topic: field("tema_general")?,
        subtopic: field("subtema")?,
        specific_topic: field("tema_especifico")?,
        confidence,
        keywords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_json(general: &str, confidence: &str) -> String {
        format!(
            r#"{{
                "documento": 1,
                "archivo": "libro.pdf",
                "tema_general": "{general}",
                "subtema": "Subtema",
                "tema_especifico": "Tema específico",
                "confianza": "{confidence}",
                "palabras_clave": ["clave1", "clave2"]
            }}"#
        )
    }

    #[test]
    fn parses_a_valid_array() {
        let raw = format!(
            "[{},{}]",
            entry_json("Historia", "alta"),
            entry_json("Ciencias", "media")
        );
        let results = parse_batch_response(&raw, 2).unwrap();

        let first = results[0].as_ref().unwrap();
        assert_eq!(first.general_topic, "Historia");
        assert_eq!(first.confidence, Confidence::Alta);
        assert_eq!(first.keywords, vec!["clave1", "clave2"]);
        assert_eq!(results[1].as_ref().unwrap().general_topic, "Ciencias");
    }

    #[test]
    fn strips_json_code_fences() {
        let raw = format!("```json\n[{}]\n```", entry_json("Historia", "alta"));
        let results = parse_batch_response(&raw, 1).unwrap();
        assert!(results[0].is_ok());
    }

    #[test]
    fn strips_plain_code_fences() {
        let raw = format!("```\n[{}]\n```", entry_json("Historia", "baja"));
        let results = parse_batch_response(&raw, 1).unwrap();
        assert_eq!(results[0].as_ref().unwrap().confidence, Confidence::Baja);
    }

    #[test]
    fn garbage_is_a_batch_level_error() {
        let result = parse_batch_response("lo siento, no puedo ayudar", 2);
        assert!(matches!(result, Err(ClassificationError::MalformedJson(_))));
    }

    #[test]
    fn non_array_json_is_a_batch_level_error() {
        let result = parse_batch_response(r#"{"documento": 1}"#, 1);
        assert!(matches!(result, Err(ClassificationError::NotAnArray)));
    }

    #[test]
    fn short_arrays_fail_only_the_missing_positions() {
        let raw = format!("[{}]", entry_json("Historia", "alta"));
        let results = parse_batch_response(&raw, 3).unwrap();

        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(ClassificationError::MissingEntry { position: 2 })
        ));
        assert!(matches!(
            results[2],
            Err(ClassificationError::MissingEntry { position: 3 })
        ));
    }

    #[test]
    fn extra_entries_are_ignored() {
        let raw = format!(
            "[{},{}]",
            entry_json("Historia", "alta"),
            entry_json("Ciencias", "media")
        );
        let results = parse_batch_response(&raw, 1).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn missing_topic_field_fails_that_entry_only() {
        let raw = format!(
            r#"[{{"subtema": "s", "tema_especifico": "t", "confianza": "alta"}}, {}]"#,
            entry_json("Ciencias", "media")
        );
        let results = parse_batch_response(&raw, 2).unwrap();

        match &results[0] {
            Err(ClassificationError::InvalidEntry { position, reason }) => {
                assert_eq!(*position, 1);
                assert!(reason.contains("tema_general"));
            }
            other => panic!("expected invalid entry, got {other:?}"),
        }
        assert!(results[1].is_ok());
    }

    #[test]
    fn unknown_confidence_is_invalid() {
        let raw = format!("[{}]", entry_json("Historia", "segurísima"));
        let results = parse_batch_response(&raw, 1).unwrap();
        match &results[0] {
            Err(ClassificationError::InvalidEntry { reason, .. }) => {
                assert!(reason.contains("segurísima"));
            }
            other => panic!("expected invalid entry, got {other:?}"),
        }
    }

    #[test]
    fn keywords_tolerate_non_strings_and_absence() {
        let raw = r#"[{
            "tema_general": "g", "subtema": "s", "tema_especifico": "t",
            "confianza": "media", "palabras_clave": ["uno", 2, "tres"]
        }]"#;
        let results = parse_batch_response(raw, 1).unwrap();
        assert_eq!(results[0].as_ref().unwrap().keywords, vec!["uno", "tres"]);

        let raw = r#"[{
            "tema_general": "g", "subtema": "s", "tema_especifico": "t",
            "confianza": "media"
        }]"#;
        let results = parse_batch_response(raw, 1).unwrap();
        assert!(results[0].as_ref().unwrap().keywords.is_empty());
    }

    #[test]
    fn fence_stripping_leaves_plain_text_alone() {
        assert_eq!(strip_code_fences("  [1, 2]  "), "[1, 2]");
        assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```json\n[1]"), "[1]");
    }
}
