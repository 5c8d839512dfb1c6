//! Selection of where the UI is served from, decided once at startup.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, error};

/// Where unmatched requests and `/static` assets are served from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    /// The bundle compiled into the binary.
    Embedded,
    /// An operator-supplied build directory on disk.
    OverrideDirectory(PathBuf),
}

impl AssetSource {
    /// Picks the source for a raw `ANSWER_STATIC_PATH` value.
    ///
    /// An empty value selects the embedded bundle. Anything else must name an
    /// existing directory; otherwise the problem is logged and the embedded
    /// bundle is used instead.
    pub fn resolve(static_path: &str) -> Self {
        if static_path.is_empty() {
            return Self::Embedded;
        }

        let path = Path::new(static_path);
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => {
                debug!(path = %path.display(), "Registering static path.");
                Self::OverrideDirectory(path.to_path_buf())
            }
            Ok(_) => {
                error!(path = %path.display(), "Static path is not a directory, using embedded UI.");
                Self::Embedded
            }
            Err(err) => {
                error!(path = %path.display(), error = %err, "Cannot stat static path, using embedded UI.");
                Self::Embedded
            }
        }
    }
}
