use std::path::{Path, PathBuf};

use crate::error::GenError;

/// A formatted Java source file ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub package: String,
    pub type_name: String,
    pub contents: String,
}

impl GeneratedFile {
    /// `<package as path>/<TypeName>.java`
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self.package.split('.').filter(|s| !s.is_empty()).collect();
        path.push(format!("{}.java", self.type_name));
        path
    }

    /// Write under `root`, creating package directories as needed.
    pub async fn write(&self, root: &Path) -> Result<PathBuf, GenError> {
        let path = root.join(self.relative_path());
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &self.contents).await?;
        Ok(path)
    }
}

/// Create the output root, removing it first when `clean` is set.
pub async fn prepare_root(root: &Path, clean: bool) -> Result<(), GenError> {
    if clean && tokio::fs::try_exists(root).await? {
        tracing::debug!("Removing {}", root.display());
        tokio::fs::remove_dir_all(root).await?;
    }
    tokio::fs::create_dir_all(root).await?;
    Ok(())
}
