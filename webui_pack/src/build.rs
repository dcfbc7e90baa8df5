//! Pipeline configuration and the build-script entry point.
use std::{
    env, fmt,
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::{
    error::{Error, Result},
    frontend::{FrontendTrigger, PathLookup, TriggerOutcome},
    registry::Registry,
    revision::Revision,
    table, walk,
};

/// Environment variable that enables the front-end build when set to `1`.
pub const AUTO_BUILD_UI: &str = "AUTO_BUILD_UI";

const DEFAULT_BUILDER: &str = "pnpm";
const DEFAULT_BUILDER_FALLBACK: &str = "/tmp/pnpm/node_modules/.bin/pnpm";

//
// ==================== PUBLIC BUILDER API ====================
//

/// A builder for configuring one packing run.
///
/// Every path is resolved against the project root given to [`Config::new`]
/// unless it is absolute. The defaults describe the usual firmware layout:
///
/// | what                   | default                     |
/// |------------------------|-----------------------------|
/// | front-end output       | `ui/dist`                   |
/// | bundled VNC client     | `ui/vnc`                    |
/// | generated headers      | `src/html/{ui,vnc}/*.h`     |
/// | lookup table           | `src/html/htmlFiles.cpp`    |
/// | revision header        | `src/version.h`             |
///
/// # Example
/// ```no_run
/// // in build.rs
/// webui_pack::Config::new(".")
///     .auto_build_ui(false)
///     .build()
///     .expect("Failed to pack web UI");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    ui_dist: PathBuf,
    client_root: PathBuf,
    headers_root: PathBuf,
    table: PathBuf,
    revision_header: PathBuf,
    ui_prefix: String,
    client_prefix: String,
    auto_build_ui: bool,
    builder: PathLookup,
}

impl Config {
    /// Creates a configuration for the project rooted at `root`.
    ///
    /// The front-end build is enabled when `AUTO_BUILD_UI=1` is set.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ui_dist: PathBuf::from("ui/dist"),
            client_root: PathBuf::from("ui/vnc"),
            headers_root: PathBuf::from("src/html"),
            table: PathBuf::from("src/html/htmlFiles.cpp"),
            revision_header: PathBuf::from("src/version.h"),
            ui_prefix: "uiNew".to_owned(),
            client_prefix: "noVNC".to_owned(),
            auto_build_ui: env::var(AUTO_BUILD_UI).is_ok_and(|v| v == "1"),
            builder: PathLookup::new(DEFAULT_BUILDER).fallback(DEFAULT_BUILDER_FALLBACK),
        }
    }

    /// Sets the front-end output root. Its `index.html` gates the primary pass.
    #[must_use]
    pub fn ui_dist(mut self, path: impl AsRef<Path>) -> Self {
        self.ui_dist = path.as_ref().to_path_buf();
        self
    }

    /// Sets the bundled client root.
    #[must_use]
    pub fn client_root(mut self, path: impl AsRef<Path>) -> Self {
        self.client_root = path.as_ref().to_path_buf();
        self
    }

    /// Sets the directory receiving the `ui/` and `vnc/` header folders.
    #[must_use]
    pub fn headers_root(mut self, path: impl AsRef<Path>) -> Self {
        self.headers_root = path.as_ref().to_path_buf();
        self
    }

    /// Sets the lookup table output file.
    #[must_use]
    pub fn table_path(mut self, path: impl AsRef<Path>) -> Self {
        self.table = path.as_ref().to_path_buf();
        self
    }

    /// Sets the revision header output file.
    #[must_use]
    pub fn revision_header(mut self, path: impl AsRef<Path>) -> Self {
        self.revision_header = path.as_ref().to_path_buf();
        self
    }

    /// Sets the array-name prefix for front-end assets (default `uiNew`).
    #[must_use]
    pub fn ui_symbol_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ui_prefix = prefix.into();
        self
    }

    /// Sets the array-name prefix for bundled client files (default `noVNC`).
    #[must_use]
    pub fn client_symbol_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.client_prefix = prefix.into();
        self
    }

    /// Overrides the `AUTO_BUILD_UI` gate.
    #[must_use]
    pub const fn auto_build_ui(mut self, enabled: bool) -> Self {
        self.auto_build_ui = enabled;
        self
    }

    /// Sets how the front-end builder is found.
    #[must_use]
    pub fn builder(mut self, lookup: PathLookup) -> Self {
        self.builder = lookup;
        self
    }

    /// Runs the packing pipeline and reports its outcome through Cargo.
    ///
    /// Meant for `build.rs`: every skipped step becomes a `cargo:warning`, and
    /// the table and revision header paths are exported to the crate being
    /// built as `WEBUI_PACK_TABLE` and `WEBUI_PACK_VERSION_HEADER`.
    ///
    /// # Errors
    /// See [`Config::run`].
    pub fn build(self) -> Result<()> {
        for path in self.watched_paths() {
            println!("cargo:rerun-if-changed={}", path.display());
        }
        println!("cargo:rerun-if-env-changed={AUTO_BUILD_UI}");

        let report = self.run()?;

        println!("cargo:rustc-env=WEBUI_PACK_TABLE={}", report.table.display());
        println!(
            "cargo:rustc-env=WEBUI_PACK_VERSION_HEADER={}",
            report.version_header.display()
        );
        for skip in &report.skipped {
            println!("cargo:warning={skip}");
        }
        if report.revision == Revision::Unknown {
            println!("cargo:warning=source revision unavailable, stamped as \"unknown\"");
        }
        Ok(())
    }

    /// Runs the packing pipeline.
    ///
    /// Missing inputs only shrink the output: an absent `index.html`, a source
    /// file that disappears mid-run, or a missing front-end builder are
    /// recorded in [`Report::skipped`]. The table and revision header are
    /// always written.
    ///
    /// # Errors
    /// Returns an [`Error`](crate::Error) if the front-end builder fails, if two
    /// assets cannot be given distinct symbols, or if an output cannot be written.
    pub fn run(&self) -> Result<Report> {
        let mut skipped = Vec::new();

        let frontend = match FrontendTrigger::new(&self.root, self.builder.clone())
            .enabled(self.auto_build_ui)
            .run()
        {
            Err(Error::ExternalToolMissing(name)) => {
                skipped.push(Skip::new(name.clone(), SkipReason::BuilderMissing));
                TriggerOutcome::ToolMissing(name)
            }
            other => other?,
        };

        let mut registry = Registry::new(self.key_base());
        walk::pack_build_output(self, &mut registry, &mut skipped)?;
        walk::pack_client(self, &mut registry, &mut skipped)?;

        let table_path = self.resolve(&self.table);
        table::write_table(&table_path, &registry, &self.headers_root_path())?;

        let revision = Revision::query(&self.root);
        let version_header = self.resolve(&self.revision_header);
        revision.write_header(&version_header)?;

        Ok(Report {
            packed: registry.len(),
            skipped,
            frontend,
            revision,
            table: table_path,
            version_header,
        })
    }

    /// Inputs whose changes should rerun the build script.
    fn watched_paths(&self) -> [PathBuf; 3] {
        [self.ui_index_path(), self.ui_dist_path(), self.client_root_path()]
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    pub(crate) fn ui_dist_path(&self) -> PathBuf {
        self.resolve(&self.ui_dist)
    }

    pub(crate) fn ui_index_path(&self) -> PathBuf {
        self.ui_dist_path().join("index.html")
    }

    pub(crate) fn client_root_path(&self) -> PathBuf {
        self.resolve(&self.client_root)
    }

    pub(crate) fn headers_root_path(&self) -> PathBuf {
        self.resolve(&self.headers_root)
    }

    pub(crate) fn ui_header_dir(&self) -> PathBuf {
        self.headers_root_path().join("ui")
    }

    pub(crate) fn client_header_dir(&self) -> PathBuf {
        self.headers_root_path().join("vnc")
    }

    pub(crate) fn ui_prefix(&self) -> &str {
        &self.ui_prefix
    }

    pub(crate) fn client_prefix(&self) -> &str {
        &self.client_prefix
    }

    /// Client files are keyed by their path below the client root's parent,
    /// so `ui/vnc/core/rfb.js` is served as `/vnc/core/rfb.js`.
    fn key_base(&self) -> PathBuf {
        let client_root = self.client_root_path();
        client_root
            .parent()
            .map_or_else(|| self.root.clone(), Path::to_path_buf)
    }
}

//
// ==================== RUN REPORT ====================
//

/// What one packing run produced.
#[derive(Debug)]
pub struct Report {
    /// Number of lookup table entries.
    pub packed: usize,
    /// Steps and assets left out, in the order they were hit.
    pub skipped: Vec<Skip>,
    /// What the optional front-end build did.
    pub frontend: TriggerOutcome,
    /// The revision stamped into the version header.
    pub revision: Revision,
    /// Where the lookup table was written.
    pub table: PathBuf,
    /// Where the revision header was written.
    pub version_header: PathBuf,
}

/// A step or asset left out of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    /// The file or tool concerned.
    pub subject: String,
    pub reason: SkipReason,
}

/// Why something was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The front-end output has no `index.html`.
    MissingIndex,
    /// A discovered file could not be read any more.
    SourceNotFound,
    /// `AUTO_BUILD_UI=1` but the builder was not found.
    BuilderMissing,
}

impl Skip {
    pub(crate) fn new(subject: impl Into<String>, reason: SkipReason) -> Self {
        let skip = Self {
            subject: subject.into(),
            reason,
        };
        warn!("{skip}");
        skip
    }
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            SkipReason::MissingIndex => {
                write!(f, "{} not found; no UI assets were packaged", self.subject)
            }
            SkipReason::SourceNotFound => write!(f, "source file {} not found; skipped", self.subject),
            SkipReason::BuilderMissing => write!(
                f,
                "{AUTO_BUILD_UI}=1 but {} was not found; skipping UI build",
                self.subject
            ),
        }
    }
}
