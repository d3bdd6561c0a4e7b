//! Per-run scratch directory.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use adsnap_models::RunId;

/// A uniquely named directory owned by one pipeline run.
///
/// Call [`Workspace::release`] on every exit path. If the value is dropped
/// without being released (panic, cancelled future), `Drop` removes the
/// directory synchronously.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    released: bool,
}

impl Workspace {
    /// Create `parent/<run_id>`. Fails if it already exists.
    pub async fn acquire(parent: &Path, run_id: &RunId) -> io::Result<Self> {
        fs::create_dir_all(parent).await?;
        let path = parent.join(run_id.as_str());
        fs::create_dir(&path).await?;
        debug!("Created workspace {}", path.display());
        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory and everything in it.
    pub async fn release(mut self) -> io::Result<()> {
        self.released = true;
        match fs::remove_dir_all(&self.path).await {
            Ok(()) => {
                debug!("Removed workspace {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(
                    "Failed to remove workspace {} on drop: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}
