//! Optional front-end build before packing.
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use tracing::info;

use crate::error::{Error, Result};

/// Finds the external front-end builder.
pub trait LocateBuilder {
    fn locate(&self) -> Option<PathBuf>;
}

impl<F> LocateBuilder for F
where
    F: Fn() -> Option<PathBuf>,
{
    fn locate(&self) -> Option<PathBuf> {
        self()
    }
}

/// Looks `program` up on `PATH`, then tries an optional fixed location.
#[derive(Debug, Clone)]
pub struct PathLookup {
    program: String,
    fallback: Option<PathBuf>,
}

impl PathLookup {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            fallback: None,
        }
    }

    #[must_use]
    pub fn fallback(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback = Some(path.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl LocateBuilder for PathLookup {
    fn locate(&self) -> Option<PathBuf> {
        which::which(&self.program)
            .ok()
            .or_else(|| self.fallback.clone().filter(|p| p.is_file()))
    }
}

/// What the trigger did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The gate was off.
    Disabled,
    /// The gate was on but no builder was found; the build went ahead without it.
    ToolMissing(String),
    /// The builder ran and exited successfully.
    Built(PathBuf),
}

/// Runs the front-end build when enabled.
pub struct FrontendTrigger {
    enabled: bool,
    name: String,
    locator: Box<dyn LocateBuilder>,
    args: Vec<OsString>,
    cwd: PathBuf,
}

impl FrontendTrigger {
    /// Creates a disabled trigger that would run `<builder> -C ui build` in `cwd`.
    pub fn new(cwd: impl AsRef<Path>, locator: PathLookup) -> Self {
        Self {
            enabled: false,
            name: locator.program().to_owned(),
            locator: Box::new(locator),
            args: ["-C", "ui", "build"].into_iter().map(OsString::from).collect(),
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Replaces the builder lookup, e.g. with a closure in tests.
    #[must_use]
    pub fn locator(mut self, name: impl Into<String>, locator: impl LocateBuilder + 'static) -> Self {
        self.name = name.into();
        self.locator = Box::new(locator);
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Runs the builder synchronously if the trigger is enabled.
    ///
    /// # Errors
    /// - [`Error::ExternalToolMissing`] if the builder cannot be located.
    /// - [`Error::ExternalToolFailure`] if the builder exits unsuccessfully.
    /// - [`Error::Io`] if it cannot be spawned at all.
    pub fn run(&self) -> Result<TriggerOutcome> {
        if !self.enabled {
            return Ok(TriggerOutcome::Disabled);
        }
        let Some(tool) = self.locator.locate() else {
            return Err(Error::ExternalToolMissing(self.name.clone()));
        };

        info!("building front-end with {}", tool.display());
        let status = Command::new(&tool)
            .args(&self.args)
            .current_dir(&self.cwd)
            .status()?;
        if !status.success() {
            return Err(Error::ExternalToolFailure { tool, status });
        }
        Ok(TriggerOutcome::Built(tool))
    }
}

impl std::fmt::Debug for FrontendTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrontendTrigger")
            .field("enabled", &self.enabled)
            .field("name", &self.name)
            .field("args", &self.args)
            .field("cwd", &self.cwd)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger() -> FrontendTrigger {
        FrontendTrigger::new(std::env::temp_dir(), PathLookup::new("pnpm"))
    }

    #[test]
    fn disabled_does_nothing() {
        let outcome = trigger()
            .locator("boom", || -> Option<PathBuf> { panic!("must not look up") })
            .run()
            .unwrap();
        assert_eq!(outcome, TriggerOutcome::Disabled);
    }

    #[test]
    fn missing_tool() {
        let err = trigger()
            .enabled(true)
            .locator("pnpm", || None::<PathBuf>)
            .run()
            .unwrap_err();
        assert!(matches!(err, Error::ExternalToolMissing(ref name) if name == "pnpm"));
    }

    #[test]
    fn lookup_falls_back_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join("pnpm");
        std::fs::write(&fallback, "").unwrap();

        let lookup = PathLookup::new("definitely-not-a-real-builder-xyz").fallback(&fallback);
        assert_eq!(lookup.locate(), Some(fallback));

        let lookup = PathLookup::new("definitely-not-a-real-builder-xyz")
            .fallback(dir.path().join("absent"));
        assert_eq!(lookup.locate(), None);
    }

    #[cfg(unix)]
    #[test]
    fn successful_build() {
        let tool = which::which("true").unwrap();
        let expected = tool.clone();
        let outcome = trigger()
            .enabled(true)
            .locator("true", move || Some(tool.clone()))
            .run()
            .unwrap();
        assert_eq!(outcome, TriggerOutcome::Built(expected));
    }

    #[cfg(unix)]
    #[test]
    fn failing_build_is_fatal() {
        let tool = which::which("sh").unwrap();
        let err = trigger()
            .enabled(true)
            .locator("sh", move || Some(tool.clone()))
            .args(["-c", "exit 3"])
            .run()
            .unwrap_err();
        match err {
            Error::ExternalToolFailure { status, .. } => assert_eq!(status.code(), Some(3)),
            other => panic!("unexpected error: {other}"),
        }
    }
}
