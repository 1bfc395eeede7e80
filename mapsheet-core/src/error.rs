//! Error handling for MapSheet

use thiserror::Error;

/// Main error type for MapSheet export operations
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid scale input: {input:?}")]
    InvalidScale { input: String },

    #[error("Map unavailable: {message}")]
    MapUnavailable { message: String },

    #[error("Unsupported output format: {name:?} (use png|jpg|pdf|svg)")]
    UnsupportedFormat { name: String },

    #[error("Unknown page size: {name:?}")]
    UnknownPageSize { name: String },

    #[error("Unknown orientation: {name:?} (use landscape|portrait)")]
    UnknownOrientation { name: String },

    #[error("Unknown unit: {name:?} (use mm|in)")]
    UnknownUnit { name: String },

    #[error("Unsupported resolution: {value} dpi (use 72|96|200|300|400)")]
    UnsupportedDpi { value: String },

    #[error("Malformed style document: {message}")]
    Style { message: String },

    #[error("Render failed: {message}")]
    Render { message: String },
}

impl ExportError {
    pub fn invalid_scale<S: Into<String>>(input: S) -> Self {
        Self::InvalidScale { input: input.into() }
    }

    pub fn map_unavailable<S: Into<String>>(message: S) -> Self {
        Self::MapUnavailable { message: message.into() }
    }

    pub fn unsupported_format<S: Into<String>>(name: S) -> Self {
        Self::UnsupportedFormat { name: name.into() }
    }

    pub fn unknown_page_size<S: Into<String>>(name: S) -> Self {
        Self::UnknownPageSize { name: name.into() }
    }

    pub fn unknown_orientation<S: Into<String>>(name: S) -> Self {
        Self::UnknownOrientation { name: name.into() }
    }

    pub fn unknown_unit<S: Into<String>>(name: S) -> Self {
        Self::UnknownUnit { name: name.into() }
    }

    pub fn unsupported_dpi<S: Into<String>>(value: S) -> Self {
        Self::UnsupportedDpi { value: value.into() }
    }

    pub fn style<S: Into<String>>(message: S) -> Self {
        Self::Style { message: message.into() }
    }

    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render { message: message.into() }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        Self::style(err.to_string())
    }
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ExportError::invalid_scale("abc");
        assert!(matches!(err, ExportError::InvalidScale { .. }));
        assert_eq!(err.to_string(), "Invalid scale input: \"abc\"");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ExportError = json_err.into();
        assert!(matches!(err, ExportError::Style { .. }));
    }
}
