use log::{debug, trace};
use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::Path,
};

use crate::{
    encoding::TextEncoding,
    error::{ResourceError, Result},
    types::Destination,
};

/// Encode `content` exactly as [`write_reformatted_code`] would.
pub fn encode_content(content: &str, encoding: &str) -> Result<Vec<u8>> {
    Ok(TextEncoding::for_label(encoding)?.encode(content)?.into_owned())
}

/// Commit reformatted `content` under `encoding`.
///
/// With `in_place` and a file destination the file's data is replaced;
/// otherwise the bytes go to `out`. The text is fully encoded before the
/// destination is touched, so an encoding failure leaves it unchanged. A
/// leading BOM in `content` is written as that encoding's BOM bytes.
pub fn write_reformatted_code<W: Write + ?Sized>(
    destination: &Destination,
    content: &str,
    in_place: bool,
    encoding: &str,
    out: &mut W,
) -> Result<()> {
    let encoding = TextEncoding::for_label(encoding)?;
    let bytes = encoding.encode(content)?;
    trace!(
        "Encoded {} chars to {} bytes as {}",
        content.chars().count(),
        bytes.len(),
        encoding.name()
    );

    match destination {
        Destination::File(path) if in_place => write_in_place(path, &bytes),
        _ => {
            debug!("Writing {} bytes for {} to output", bytes.len(), destination);
            write_out(out, &bytes).map_err(|source| ResourceError::WriteFailure {
                destination: Destination::Stdout.to_string(),
                source,
            })
        }
    }
}

fn write_in_place(path: &Path, bytes: &[u8]) -> Result<()> {
    debug!("Writing {} bytes in place to {}", bytes.len(), path.display());
    // Truncating the existing file keeps its inode, permissions and ownership
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| ResourceError::explicit(path, e))?;
    write_out(&mut file, bytes).map_err(|source| ResourceError::WriteFailure {
        destination: path.display().to_string(),
        source,
    })
}

fn write_out<W: Write + ?Sized>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    out.write_all(bytes)?;
    out.flush()
}
