use std::{path::PathBuf, process::ExitStatus};

/// A specialized `Result` type for packing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur while packing the web UI.
///
/// Only some of these abort a run. [`Error::SourceNotFound`] is caught by the
/// walker and the asset is left out. [`Error::ExternalToolMissing`] is never
/// returned by [`Config::run`](crate::Config::run), which downgrades it to a
/// skipped front-end build.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    #[error("Could not replace '{}'", .0.file.path().display())]
    Persist(#[from] tempfile::PersistError),
    #[error("Source file '{}' not found", .0.display())]
    SourceNotFound(PathBuf),
    #[error("External builder '{0}' not found")]
    ExternalToolMissing(String),
    #[error("External builder '{}' failed with {status}", .tool.display())]
    ExternalToolFailure { tool: PathBuf, status: ExitStatus },
    #[error("Symbol '{symbol}' is already used by '{owner}', cannot reuse it for '{key}'")]
    SymbolCollision {
        symbol: String,
        owner: String,
        key: String,
    },
    #[error("Path '{}' has no parent directory", .0.display())]
    NoParent(PathBuf),
}
