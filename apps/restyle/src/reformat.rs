//! Stand-in for the reformatting engine.
//!
//! The real engine interprets the style file and rewrites the token stream.
//! Until it is wired in, the pass only brings every line terminator in line
//! with the file's dominant one.

use log::trace;
use restyle_core::{LineEnding, StyleLocation, detect_line_ending};

pub fn reformat(source: &str, style: &StyleLocation) -> String {
    let ending = detect_line_ending(source);
    trace!("Reformatting with style {} and {} line endings", style, ending);
    normalize_line_endings(source, ending)
}

fn normalize_line_endings(text: &str, ending: LineEnding) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str(ending.as_str());
            }
            '\n' => out.push_str(ending.as_str()),
            _ => out.push(c),
        }
    }
    out
}
