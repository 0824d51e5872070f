//! Pulls structured data out of free-form model output.
//!
//! Model replies are prose that usually embeds one JSON object. Extraction
//! never fails: when no usable record can be found the caller gets the
//! original text back and renders that instead.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::analysis::Source;
use crate::comparison::ComparisonRecord;

/// Title given to citations that arrive without one.
pub const GENERIC_SOURCE_TITLE: &str = "Source";

/// Result of running the extractor over a model reply.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extraction {
    pub record: Option<ComparisonRecord>,
    /// Present only when `record` is `None`.
    pub raw_text: Option<String>,
}

impl Extraction {
    pub fn structured(record: ComparisonRecord) -> Self {
        Self {
            record: Some(record),
            raw_text: None,
        }
    }

    pub fn unstructured(text: impl Into<String>) -> Self {
        Self {
            record: None,
            raw_text: Some(text.into()),
        }
    }
}

/// Returns the span from the first `{` to the last `}`, inclusive.
pub fn outer_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Parses the outer-brace span of `text` as `T`.
pub fn extract_object<T: DeserializeOwned>(text: &str) -> Option<T> {
    let span = outer_json_span(text)?;
    match serde_json::from_str(span) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("[Extractor] JSON span did not parse: {}", e);
            None
        }
    }
}

/// Extracts a validated [`ComparisonRecord`] from a model reply.
///
/// Records that parse but break the record invariants are treated the same
/// as unparseable text.
pub fn extract_record(text: &str) -> Extraction {
    let Some(record) = extract_object::<ComparisonRecord>(text) else {
        return Extraction::unstructured(text);
    };

    match record.validate() {
        Ok(()) => Extraction::structured(record),
        Err(violation) => {
            tracing::warn!("[Extractor] Rejecting comparison record: {}", violation);
            Extraction::unstructured(text)
        }
    }
}

/// Collects `{title, uri}` citations from grounding metadata.
///
/// Every `groundingChunks[].web` entry with a non-blank `uri` contributes one
/// source, in order. Missing titles fall back to [`GENERIC_SOURCE_TITLE`].
pub fn extract_sources(grounding: &Value) -> Vec<Source> {
    let Some(chunks) = grounding.get("groundingChunks").and_then(|c| c.as_array()) else {
        return Vec::new();
    };

    chunks
        .iter()
        .filter_map(|chunk| {
            let web = chunk.get("web")?;
            let uri = web
                .get("uri")
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|uri| !uri.is_empty())?;
            let title = web
                .get("title")
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .unwrap_or(GENERIC_SOURCE_TITLE);

            Some(Source {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::model::fixtures::record;
    use serde_json::json;

    #[test]
    fn test_record_embedded_in_prose_round_trips() {
        let original = record();
        let text = format!(
            "Sure! Here is the comparison you asked for:\n```json\n{}\n```\nHope it helps.",
            serde_json::to_string_pretty(&original).unwrap()
        );

        let extraction = extract_record(&text);
        assert_eq!(extraction.record, Some(original));
        assert!(extraction.raw_text.is_none());
    }

    #[test]
    fn test_text_without_braces_is_unstructured() {
        let text = "I could not produce a table for these items.";
        let extraction = extract_record(text);
        assert!(extraction.record.is_none());
        assert_eq!(extraction.raw_text.as_deref(), Some(text));
    }

    #[test]
    fn test_reversed_braces_are_not_a_span() {
        assert_eq!(outer_json_span("} nothing here {"), None);
        let extraction = extract_record("} nothing here {");
        assert_eq!(extraction.raw_text.as_deref(), Some("} nothing here {"));
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let text = "Result: {\"items\": [oops]}";
        let extraction = extract_record(text);
        assert!(extraction.record.is_none());
        assert_eq!(extraction.raw_text.as_deref(), Some(text));
    }

    #[test]
    fn test_invalid_record_falls_back() {
        let mut broken = record();
        broken.rows[0].values.push("extra".to_string());
        let text = serde_json::to_string(&broken).unwrap();

        let extraction = extract_record(&text);
        assert!(extraction.record.is_none());
        assert_eq!(extraction.raw_text.as_deref(), Some(text.as_str()));
    }

    #[test]
    fn test_greedy_span_covers_nested_objects() {
        let span = outer_json_span("a {\"x\": {\"y\": 1}} b").unwrap();
        assert_eq!(span, "{\"x\": {\"y\": 1}}");
    }

    #[test]
    fn test_extract_object_generic() {
        #[derive(serde::Deserialize)]
        struct Verdict {
            winner: String,
        }
        let verdict: Verdict = extract_object("Answer: {\"winner\": \"Tea\"} done").unwrap();
        assert_eq!(verdict.winner, "Tea");
        assert!(extract_object::<Verdict>("no json").is_none());
    }

    #[test]
    fn test_sources_default_title_and_drop_missing_uri() {
        let grounding = json!({
            "groundingChunks": [
                {"web": {"uri": "https://a.example", "title": "A"}},
                {"web": {"uri": "https://b.example"}},
                {"web": {"title": "No link"}},
                {"web": {"uri": "   ", "title": "Blank"}},
                {"retrievedContext": {"uri": "https://c.example"}}
            ]
        });

        let sources = extract_sources(&grounding);
        assert_eq!(
            sources,
            vec![
                Source {
                    title: "A".to_string(),
                    uri: "https://a.example".to_string()
                },
                Source {
                    title: GENERIC_SOURCE_TITLE.to_string(),
                    uri: "https://b.example".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_sources_absent_metadata() {
        assert!(extract_sources(&json!({})).is_empty());
        assert!(extract_sources(&json!({"groundingChunks": "nope"})).is_empty());
    }
}
