//! Core file resources for the restyle source reformatter.
//!
//! This crate owns everything the formatter does with the filesystem, but
//! none of the formatting itself:
//! - Resolving the style file that applies to a source file by walking its
//!   directory ancestry
//! - Expanding command-line paths into a deduplicated set of source files
//! - Reading sources and writing reformatted output byte-exactly under an
//!   explicit character encoding, to a file in place or to an output sink
//!
//! # Examples
//!
//! ```no_run
//! use restyle_core::{Destination, collect_files, resolve_style, write_reformatted_code};
//! use std::path::PathBuf;
//!
//! # fn main() -> restyle_core::Result<()> {
//! let files = collect_files(&[PathBuf::from("src")], true)?;
//! let mut stdout = std::io::stdout();
//! for file in &files {
//!     let style = resolve_style(file)?;
//!     println!("{} -> {}", file.display(), style);
//!     let source = restyle_core::read_source(file, "utf-8")?;
//!     write_reformatted_code(&Destination::Stdout, &source, false, "utf-8", &mut stdout)?;
//! }
//! # Ok(())
//! # }
//! ```

mod collector;
mod config;
mod constants;
mod encoding;
mod error;
mod source;
mod style;
mod types;
mod writer;

// Re-export public API
pub use collector::{collect_files, collect_files_excluding, collect_files_with};
pub use config::ResourceConfig;
pub use constants::{
    DEFAULT_ENCODING, DEFAULT_INTERPRETER, DEFAULT_STYLE, SOURCE_EXTENSION, STYLE_MARKER,
};
pub use encoding::TextEncoding;
pub use error::{ResourceError, Result};
pub use source::{LineEnding, detect_line_ending, read_source};
pub use style::{StyleCache, resolve_style, resolve_style_with};
pub use types::{Destination, StyleLocation};
pub use writer::{encode_content, write_reformatted_code};
