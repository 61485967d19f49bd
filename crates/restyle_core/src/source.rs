use log::{debug, trace};
use std::{fmt, fs, path::Path};

use crate::{
    encoding::TextEncoding,
    error::{ResourceError, Result},
};

/// Read `path` and decode it under `encoding`. A leading BOM is kept in the
/// returned text, so writing it back out reproduces the original bytes.
pub fn read_source(path: &Path, encoding: &str) -> Result<String> {
    let encoding = TextEncoding::for_label(encoding)?;
    trace!("Reading {} as {}", path.display(), encoding.name());
    let bytes = fs::read(path).map_err(|e| ResourceError::explicit(path, e))?;
    let text = encoding.decode(&bytes)?.into_owned();
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineEnding::Lf => "LF",
            LineEnding::CrLf => "CRLF",
            LineEnding::Cr => "CR",
        };
        f.write_str(name)
    }
}

/// Most frequent line terminator in `text`. Ties, and text without any
/// terminator, give [`LineEnding::Lf`].
pub fn detect_line_ending(text: &str) -> LineEnding {
    let (mut lf, mut crlf, mut cr) = (0usize, 0usize, 0usize);
    let mut bytes = text.as_bytes().iter().peekable();
    while let Some(&b) = bytes.next() {
        match b {
            b'\r' if bytes.peek() == Some(&&b'\n') => {
                bytes.next();
                crlf += 1;
            }
            b'\r' => cr += 1,
            b'\n' => lf += 1,
            _ => {}
        }
    }

    if crlf > lf && crlf >= cr {
        LineEnding::CrLf
    } else if cr > lf && cr > crlf {
        LineEnding::Cr
    } else {
        LineEnding::Lf
    }
}
