use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{error::SaveError, utils};

/// Hands a downloaded payload to the user's disk.
#[async_trait]
pub trait SaveTrigger: Send + Sync {
    async fn save(&self, id: &str, payload: &[u8]) -> Result<PathBuf, SaveError>;
}

pub struct FileSaver {
    dir: PathBuf,
}

impl FileSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileSaver { dir: dir.into() }
    }
}

#[async_trait]
impl SaveTrigger for FileSaver {
    async fn save(&self, id: &str, payload: &[u8]) -> Result<PathBuf, SaveError> {
        let name = utils::sanitize_file_name(id);
        let target = self.dir.join(&name);

        let partial =
            PartialFile::create(self.dir.join(format!(".{}.part", name)), payload).await?;
        partial.persist(&target).await?;

        Ok(target)
    }
}

/// A payload staged next to its destination. Removed on drop unless persisted.
struct PartialFile {
    path: PathBuf,
    persisted: bool,
}

impl PartialFile {
    async fn create(path: PathBuf, payload: &[u8]) -> Result<Self, SaveError> {
        // Construct first so a failed write still cleans up after itself
        let partial = PartialFile {
            path,
            persisted: false,
        };
        fs::write(&partial.path, payload)
            .await
            .map_err(|source| SaveError::Write {
                path: partial.path.display().to_string(),
                source,
            })?;
        Ok(partial)
    }

    async fn persist(mut self, target: &Path) -> Result<(), SaveError> {
        fs::rename(&self.path, target)
            .await
            .map_err(|source| SaveError::Write {
                path: target.display().to_string(),
                source,
            })?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        // Drop cannot await; this only runs when the save already failed
        if !self.persisted {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::debug!("could not remove {}: {}", self.path.display(), e);
            }
        }
    }
}
