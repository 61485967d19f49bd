//! Fixed names the formatter recognizes on disk.
//!
//! These are the reference values; [`ResourceConfig`](crate::ResourceConfig)
//! carries them at runtime so callers and tests can swap them out.

/// Filename whose presence in a directory sets the style for files in and below it
pub const STYLE_MARKER: &str = ".style.restyle";

/// Built-in style used when no marker file is found in any ancestor directory
pub const DEFAULT_STYLE: &str = "pep8";

/// Extension (without the dot) of source files picked up by directory expansion
pub const SOURCE_EXTENSION: &str = "py";

/// Interpreter named in a `#!` line that marks an extensionless file as source
pub const DEFAULT_INTERPRETER: &str = "python";

/// Encoding label used when the caller does not name one
pub const DEFAULT_ENCODING: &str = "utf-8";
