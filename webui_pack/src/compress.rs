//! Compresses one asset into one generated header.
use std::{
    fmt::Write as _,
    fs,
    io::{self, Write},
    path::Path,
};

use flate2::{Compression, write::GzEncoder};
use tracing::info;

use crate::{
    error::{Error, Result},
    output::write_replace,
    registry::Registry,
};

/// A rewrite applied to an asset's raw bytes before compression.
pub type Transform = dyn Fn(Vec<u8>) -> Vec<u8>;

/// Packs `source` into a header at `header` declaring `array_name`, and
/// records it in `registry`.
///
/// The serving key is `url_path` when given, otherwise it is derived from the
/// source path via [`Registry::derive_key`]. The header is replaced atomically
/// whether or not it existed. Returns the compressed size in bytes.
///
/// # Errors
/// - [`Error::SourceNotFound`] if `source` does not exist. Nothing is written.
/// - [`Error::SymbolCollision`] if `array_name` is taken by another key.
/// - [`Error::Io`]/[`Error::Persist`] if the header cannot be written.
pub fn compress(
    registry: &mut Registry,
    source: &Path,
    header: &Path,
    array_name: &str,
    transform: Option<&Transform>,
    url_path: Option<&str>,
) -> Result<usize> {
    let mut data = fs::read(source).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::SourceNotFound(source.to_path_buf()),
        _ => Error::Io(err),
    })?;
    if let Some(transform) = transform {
        data = transform(data);
    }

    let key = url_path.map_or_else(|| registry.derive_key(source), str::to_owned);
    registry.ensure_available(array_name, &key)?;

    let compressed = gzip(&data)?;
    write_replace(header, render_header(array_name, &compressed).as_bytes())?;
    info!(
        "packed {} ({} -> {} bytes) into {}",
        source.display(),
        data.len(),
        compressed.len(),
        header.display()
    );

    registry.register(key, array_name.to_owned(), header.to_path_buf())?;
    Ok(compressed.len())
}

/// Gzip at the default level. The gzip header carries no timestamp, so equal
/// input always gives equal output.
fn gzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Renders the header text declaring `array_name` with `bytes`.
#[must_use]
pub fn render_header(array_name: &str, bytes: &[u8]) -> String {
    let mut array = String::with_capacity(bytes.len() * 5);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            array.push_str(", ");
        }
        let _ = write!(array, "{byte}");
    }
    format!(
        "#pragma once\n\n#ifndef NO_WEB\n\nconst uint8_t PROGMEM {array_name}[{}] = {{ {array} }};\n\n#endif",
        bytes.len()
    )
}
