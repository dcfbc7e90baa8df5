//! Pack a built web UI into firmware-embeddable byte arrays.
//!
//! Boards without a filesystem cannot serve a UI from disk, so this crate turns
//! a tree of static files into C++ sources that get compiled straight into the
//! firmware image.
//!
//! ## How It Works
//!
//! 1.  **Front-end build (optional):** with `AUTO_BUILD_UI=1`, `pnpm -C ui build`
//!     runs first. A missing `pnpm` is only a warning; a failing one aborts.
//! 2.  **Discovery:** every file under `ui/dist` (only when `ui/dist/index.html`
//!     exists) and every file under the bundled `ui/vnc` client is collected.
//! 3.  **Compression:** each file is gzip-compressed and written as one header
//!     holding a `PROGMEM` byte array behind `#ifndef NO_WEB`.
//! 4.  **Lookup table:** `src/html/htmlFiles.cpp` includes every header and maps
//!     each URL path to `{ array, sizeof(array) }`.
//! 5.  **Revision stamp:** `src/version.h` receives the current git commit, or
//!     `unknown` outside a repository.
//!
//! ## Usage
//!
//! From a `build.rs` script:
//!
//! ```no_run
//! webui_pack::Config::new(".")
//!     .build()
//!     .expect("Failed to pack web UI");
//! ```
//!
//! Or from an outer build system, run the `webui-pack` binary in the project
//! root. The [`PlatformFilter`] is meant to be registered with that build
//! system as a per-node source filter.

#![doc(html_root_url = "https://docs.rs/webui_pack/0.1.0")]

use std::io::{self, Read};

//
// ===== HOST-SIDE DECODING =====
//

/// Inflates a packed array back into the original file contents.
///
/// This mirrors the single decompression path on the device and is what the
/// tests use to check that a generated header carries the right bytes.
///
/// # Errors
///
/// Returns an error if `packed` is not a complete gzip stream.
pub fn decompress(packed: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    flate2::read::GzDecoder::new(packed).read_to_end(&mut out)?;
    Ok(out)
}

//
// ===== BUILD-TIME CODE =====
//

#[cfg(feature = "build")]
mod build;
#[cfg(feature = "build")]
mod compress;
#[cfg(feature = "build")]
mod error;
#[cfg(feature = "build")]
mod frontend;
#[cfg(feature = "build")]
mod output;
#[cfg(feature = "build")]
mod platform;
#[cfg(feature = "build")]
mod registry;
#[cfg(feature = "build")]
mod revision;
#[cfg(feature = "build")]
mod sanitize;
#[cfg(feature = "build")]
mod table;
#[cfg(feature = "build")]
mod walk;

#[cfg(feature = "build")]
pub use build::{AUTO_BUILD_UI, Config, Report, Skip, SkipReason};
#[cfg(feature = "build")]
pub use compress::{Transform, compress, render_header};
#[cfg(feature = "build")]
pub use error::{Error, Result};
#[cfg(feature = "build")]
pub use frontend::{FrontendTrigger, LocateBuilder, PathLookup, TriggerOutcome};
#[cfg(feature = "build")]
pub use platform::PlatformFilter;
#[cfg(feature = "build")]
pub use registry::Registry;
#[cfg(feature = "build")]
pub use revision::Revision;
#[cfg(feature = "build")]
pub use sanitize::{client_symbol, sanitize_symbol};
#[cfg(feature = "build")]
pub use table::render_table;
