//! Discovery of the two asset roots.
use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    build::{Config, Skip, SkipReason},
    compress::compress,
    error::{Error, Result},
    registry::{Registry, slash_path},
    sanitize::{client_symbol, sanitize_symbol},
};

const SYMBOL_SUFFIX: &str = "Gz";

/// Packs every file of the front-end output, keyed by its path below the root.
///
/// Nothing is packed when the output has no `index.html`.
pub(crate) fn pack_build_output(
    config: &Config,
    registry: &mut Registry,
    skipped: &mut Vec<Skip>,
) -> Result<usize> {
    let index = config.ui_index_path();
    if !index.is_file() {
        skipped.push(Skip::new(index.display().to_string(), SkipReason::MissingIndex));
        return Ok(0);
    }

    let root = config.ui_dist_path();
    let header_dir = config.ui_header_dir();
    let mut packed = 0;
    for source in files(&root) {
        let rel = slash_path(source.strip_prefix(&root).unwrap_or(&source));
        let url = format!("/{rel}");
        let stem = sanitize_symbol(&rel);
        let symbol = format!("{}{stem}{SYMBOL_SUFFIX}", config.ui_prefix());
        let (stem, symbol) = unique_names(registry, stem, symbol, &url);

        let header = header_dir.join(format!("{stem}.h"));
        if pack_one(registry, skipped, &source, &header, &symbol, Some(&url))? {
            packed += 1;
        }
    }
    Ok(packed)
}

/// Packs every file of the bundled client. Flat names, keys derived from the
/// source path. An absent root packs nothing.
pub(crate) fn pack_client(
    config: &Config,
    registry: &mut Registry,
    skipped: &mut Vec<Skip>,
) -> Result<usize> {
    let root = config.client_root_path();
    if !root.is_dir() {
        debug!("no bundled client at {}", root.display());
        return Ok(0);
    }

    let header_dir = config.client_header_dir();
    let mut packed = 0;
    for source in files(&root) {
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let stem = client_symbol(&file_name.to_string_lossy());
        let symbol = format!("{}{stem}{SYMBOL_SUFFIX}", config.client_prefix());
        let key = registry.derive_key(&source);
        let (stem, symbol) = unique_names(registry, stem, symbol, &key);

        let header = header_dir.join(format!("{stem}.h"));
        if pack_one(registry, skipped, &source, &header, &symbol, None)? {
            packed += 1;
        }
    }
    Ok(packed)
}

/// Files below `root`, sorted by name within each directory.
///
/// Symbolic links are followed. A dangling link is still listed so that
/// packing it reports the missing source instead of dropping it.
fn files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => None,
            Ok(entry) => Some(entry.into_path()),
            Err(err) => match (err.path(), err.io_error().map(io::Error::kind)) {
                (Some(path), Some(io::ErrorKind::NotFound)) if path.is_symlink() => {
                    Some(path.to_path_buf())
                }
                _ => {
                    warn!("skipping unreadable entry under {}: {err}", root.display());
                    None
                }
            },
        })
        .collect()
}

/// Gives `key` its own names when `symbol` already belongs to another key,
/// by appending a short hash of the key.
fn unique_names(registry: &Registry, stem: String, symbol: String, key: &str) -> (String, String) {
    match registry.owner_of(&symbol) {
        Some(owner) if owner != key => {
            let hash = blake3::hash(key.as_bytes()).to_hex();
            let tag = &hash.as_str()[..8];
            warn!("{key} and {owner} both map to {symbol}; using suffix _{tag}");
            (format!("{stem}_{tag}"), format!("{symbol}_{tag}"))
        }
        _ => (stem, symbol),
    }
}

/// Compresses one asset. A source that vanished is skipped, anything else
/// aborts.
fn pack_one(
    registry: &mut Registry,
    skipped: &mut Vec<Skip>,
    source: &Path,
    header: &Path,
    symbol: &str,
    url: Option<&str>,
) -> Result<bool> {
    match compress(registry, source, header, symbol, None, url) {
        Ok(_) => Ok(true),
        Err(Error::SourceNotFound(path)) => {
            skipped.push(Skip::new(path.display().to_string(), SkipReason::SourceNotFound));
            Ok(false)
        }
        Err(err) => Err(err),
    }
}
