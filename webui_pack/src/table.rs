//! The aggregate URL lookup table.
use std::{fmt::Write as _, path::Path};

use tracing::info;

use crate::{
    error::Result,
    output::write_replace,
    registry::{Registry, slash_path},
};

const PRELUDE: &str = "#ifndef NO_WEB\n\n#include <string>\n#include <unordered_map>\n#include <cstdint>\n#include <pgmspace.h>\n\n";
const DECLARATION: &str =
    "std::unordered_map<const char*,std::pair<const uint8_t*, size_t>> staticHtmlFilesLookup = {\n";

/// Renders the lookup table source for everything in `registry`.
///
/// Headers are included relative to `headers_root`. Sizes come from
/// `sizeof` on each array so they cannot drift from the data. A `/content/`
/// segment in a key is served as `/`.
#[must_use]
pub fn render_table(registry: &Registry, headers_root: &Path) -> String {
    let mut out = String::from(PRELUDE);
    for header in registry.headers() {
        let rel = header.strip_prefix(headers_root).unwrap_or(header);
        let _ = writeln!(out, "#include \"{}\"", c_escape(&slash_path(rel)));
    }

    out.push('\n');
    out.push_str(DECLARATION);
    let last = registry.last_key();
    for (key, symbol) in registry.entries() {
        let path = c_escape(&key.replace("/content/", "/"));
        let _ = write!(out, "    {{\"{path}\",{{ {symbol},sizeof({symbol}) }} }}");
        out.push_str(if Some(key) == last { "\n" } else { ",\n" });
    }
    out.push_str("};\n\n#endif");
    out
}

/// Escapes `s` for use inside a C string literal. Non-ASCII text is kept as
/// UTF-8.
pub(crate) fn c_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\{:03o}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}

/// Writes the lookup table to `path`. Always writes, even for an empty registry.
pub(crate) fn write_table(path: &Path, registry: &Registry, headers_root: &Path) -> Result<()> {
    write_replace(path, render_table(registry, headers_root).as_bytes())?;
    info!("wrote lookup table with {} entries to {}", registry.len(), path.display());
    Ok(())
}
