use std::path::PathBuf;

use anyhow::Context as _;

use crate::domain::repository::ImageStore;
use crate::error::RecipeServiceError;

/// Writes images below a directory on the local filesystem.
#[derive(Clone)]
pub struct LocalImageStore {
    pub root: PathBuf,
}

impl ImageStore for LocalImageStore {
    async fn save(&self, path: &str, data: &[u8]) -> Result<(), RecipeServiceError> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create media directory {}", parent.display()))?;
        }
        tokio::fs::write(&full, data)
            .await
            .with_context(|| format!("write image {}", full.display()))?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), RecipeServiceError> {
        let full = self.root.join(path);
        tokio::fs::remove_file(&full)
            .await
            .with_context(|| format!("remove image {}", full.display()))?;
        Ok(())
    }
}
