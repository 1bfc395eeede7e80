//! Style document handling.
//!
//! Styles are opaque JSON handed through to the render backend. The only
//! transformation applied here is source sanitization: raster-DEM sources in
//! the wild carry null or empty `url`/`bounds` entries that a fresh renderer
//! instance rejects, so those keys are dropped before cloning.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ExportError, ExportResult};

/// A map style as a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleDocument(Value);

impl StyleDocument {
    pub fn new(value: Value) -> ExportResult<Self> {
        if value.is_object() {
            Ok(Self(value))
        } else {
            Err(ExportError::style("style root must be a JSON object"))
        }
    }

    pub fn parse(text: &str) -> ExportResult<Self> {
        Self::new(serde_json::from_str(text)?)
    }

    /// Human-readable style name, when the document carries one.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Drop source keys whose value is JSON null or an empty string.
    /// Returns the number of keys removed.
    pub fn sanitize_sources(&mut self) -> usize {
        let mut dropped = 0;
        if let Some(sources) = self.0.get_mut("sources").and_then(Value::as_object_mut) {
            for (source_name, source) in sources.iter_mut() {
                if let Some(fields) = source.as_object_mut() {
                    let before = fields.len();
                    fields.retain(|_, value| !is_empty_value(value));
                    let removed = before - fields.len();
                    if removed > 0 {
                        log::debug!(
                            "Dropped {} empty field(s) from source {:?}",
                            removed,
                            source_name
                        );
                        dropped += removed;
                    }
                }
            }
        }
        dropped
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dem_style() -> StyleDocument {
        StyleDocument::new(json!({
            "version": 8,
            "name": "Terrain Demo",
            "sources": {
                "dem": {
                    "type": "raster-dem",
                    "url": null,
                    "bounds": "",
                    "tileSize": 512,
                    "maxzoom": 0
                },
                "base": {
                    "type": "vector",
                    "url": "https://tiles.example.com/base.json"
                }
            },
            "layers": []
        }))
        .unwrap()
    }

    #[test]
    fn test_sanitize_drops_null_and_empty_keys() {
        let mut style = dem_style();
        assert_eq!(style.sanitize_sources(), 2);
        let dem = &style.as_value()["sources"]["dem"];
        assert!(dem.get("url").is_none());
        assert!(dem.get("bounds").is_none());
        // Legitimate falsy-looking values survive.
        assert_eq!(dem["maxzoom"], 0);
        assert_eq!(dem["tileSize"], 512);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let mut style = dem_style();
        style.sanitize_sources();
        assert_eq!(style.sanitize_sources(), 0);
    }

    #[test]
    fn test_name_accessor() {
        assert_eq!(dem_style().name(), Some("Terrain Demo"));
        let unnamed = StyleDocument::new(json!({"version": 8})).unwrap();
        assert_eq!(unnamed.name(), None);
    }

    #[test]
    fn test_root_must_be_object() {
        assert!(StyleDocument::new(json!([1, 2, 3])).is_err());
        assert!(StyleDocument::parse("{\"version\": 8}").is_ok());
        assert!(StyleDocument::parse("not json").is_err());
    }
}
