//! Source revision stamp.
use std::{
    ffi::OsStr,
    fmt,
    path::Path,
    process::{Command, Stdio},
};

use tracing::{debug, warn};

use crate::{error::Result, output::write_replace, table::c_escape};

/// The revision written into the version header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Commit(String),
    /// No revision could be read; stamped as `unknown`.
    Unknown,
}

impl Revision {
    /// Reads `git rev-parse HEAD` in `dir`. Never fails.
    pub fn query(dir: &Path) -> Self {
        Self::query_with("git", dir)
    }

    /// Like [`Revision::query`] with a different `git` executable.
    pub fn query_with(git: impl AsRef<OsStr>, dir: &Path) -> Self {
        let output = Command::new(git.as_ref())
            .args(["rev-parse", "HEAD"])
            .current_dir(dir)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(out) if out.status.success() => {
                let hash = String::from_utf8_lossy(&out.stdout).trim().to_owned();
                if hash.is_empty() {
                    Self::Unknown
                } else {
                    debug!("source revision {hash}");
                    Self::Commit(hash)
                }
            }
            Ok(out) => {
                warn!("git rev-parse exited with {}; revision unknown", out.status);
                Self::Unknown
            }
            Err(err) => {
                warn!("could not run git ({err}); revision unknown");
                Self::Unknown
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Commit(hash) => hash,
            Self::Unknown => "unknown",
        }
    }

    /// Header text declaring `GIT_COMMIT_HASH`.
    #[must_use]
    pub fn render_header(&self) -> String {
        format!(
            "#pragma once\nconst char GIT_COMMIT_HASH[] = \"{}\";\n",
            c_escape(self.as_str())
        )
    }

    /// Writes the header to `path`, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error only if the file cannot be written.
    pub fn write_header(&self, path: &Path) -> Result<()> {
        write_replace(path, self.render_header().as_bytes())
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
