use crate::constants::{DEFAULT_INTERPRETER, DEFAULT_STYLE, SOURCE_EXTENSION, STYLE_MARKER};

/// Names the resolver and collector look for on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    /// Marker filename searched for in each ancestor directory
    pub marker_name: String,

    /// Style returned when no marker is found
    pub default_style: String,

    /// Source extension (without the dot) matched by directory expansion
    pub extension: String,

    /// Interpreter whose `#!` line marks an extensionless file as source.
    /// `None` disables shebang detection.
    pub interpreter: Option<String>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        ResourceConfig {
            marker_name: STYLE_MARKER.to_string(),
            default_style: DEFAULT_STYLE.to_string(),
            extension: SOURCE_EXTENSION.to_string(),
            interpreter: Some(DEFAULT_INTERPRETER.to_string()),
        }
    }
}
