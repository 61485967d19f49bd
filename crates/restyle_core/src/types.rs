use serde::Serialize;
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Where the style for a source file comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StyleLocation {
    /// Absolute path of the nearest marker file in the file's ancestry
    LocalFile { path: PathBuf },
    /// Built-in style, used when no ancestor holds a marker
    NamedDefault { name: String },
}

impl StyleLocation {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            StyleLocation::LocalFile { path } => Some(path.as_path()),
            StyleLocation::NamedDefault { .. } => None,
        }
    }
}

impl fmt::Display for StyleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleLocation::LocalFile { path } => write!(f, "{}", path.display()),
            StyleLocation::NamedDefault { name } => write!(f, "{}", name),
        }
    }
}

/// Target of a write: a real file, or the output sink handed to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::File(path) => write!(f, "{}", path.display()),
            Destination::Stdout => write!(f, "<stdout>"),
        }
    }
}

impl From<Option<PathBuf>> for Destination {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(Destination::Stdout, Destination::File)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_means_stdout() {
        assert_eq!(Destination::from(None::<PathBuf>), Destination::Stdout);
        let path = PathBuf::from("/src/mod.py");
        assert_eq!(Destination::from(Some(path.clone())), Destination::File(path));
    }

    #[test]
    fn test_style_location_serializes_with_kind() {
        let style = StyleLocation::NamedDefault { name: "pep8".to_string() };
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "named_default", "name": "pep8" }));
        assert_eq!(style.to_string(), "pep8");
        assert_eq!(style.as_path(), None);
    }
}
