//! Per-node source filter for the surrounding build graph.
use std::path::Path;

use tracing::info;

/// Drops library subtrees that cannot build on a given platform.
///
/// A node is excluded when its path contains any of the `markers` and the
/// active platform identifier contains `restricted`. Anything else passes
/// through, including nodes seen under a misspelled platform.
#[derive(Debug, Clone)]
pub struct PlatformFilter {
    markers: Vec<String>,
    restricted: String,
}

impl Default for PlatformFilter {
    /// The ESP32-only libraries, excluded on Raspberry Pi builds.
    fn default() -> Self {
        Self::new(["usb-ncm", "ESP32Marauder"], "raspberrypi")
    }
}

impl PlatformFilter {
    pub fn new<I, S>(markers: I, restricted: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
            restricted: restricted.into(),
        }
    }

    #[must_use]
    pub fn excludes(&self, node: &Path, platform: &str) -> bool {
        let path = node.to_string_lossy();
        platform.contains(self.restricted.as_str())
            && self.markers.iter().any(|m| path.contains(m.as_str()))
    }

    /// Middleware form: `None` drops the node, `Some` hands it back unchanged.
    pub fn filter<N: AsRef<Path>>(&self, node: N, platform: &str) -> Option<N> {
        if self.excludes(node.as_ref(), platform) {
            info!(
                "ignoring {} on platform {platform}",
                node.as_ref().display()
            );
            return None;
        }
        Some(node)
    }
}
