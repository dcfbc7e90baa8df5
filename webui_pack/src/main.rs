//! Packs the web UI of the project in the current directory.
//!
//! Takes no arguments: set `AUTO_BUILD_UI=1` to run the front-end build first,
//! and `RUST_LOG` to change verbosity.
use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;
use webui_pack::{Config, TriggerOutcome};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = std::env::current_dir().context("cannot determine the project directory")?;
    let report = Config::new(&root)
        .run()
        .with_context(|| format!("failed to pack the web UI under {}", root.display()))?;

    if let TriggerOutcome::Built(tool) = &report.frontend {
        info!("front-end rebuilt with {}", tool.display());
    }
    info!(
        "packed {} assets into {} ({} skipped), revision {}",
        report.packed,
        report.table.display(),
        report.skipped.len(),
        report.revision
    );
    Ok(())
}
