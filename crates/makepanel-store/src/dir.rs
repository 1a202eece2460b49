//! Directory-backed config store

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{ConfigStore, StoreError, StoreResult, is_valid_file_name};

/// Config store over a single directory
///
/// The directory is created on first use. Saved files always carry the
/// configured extension.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
    extension: String,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name the file is saved under: the extension is appended if missing
    pub fn normalize_name(&self, name: &str) -> String {
        let suffix = format!(".{}", self.extension);
        if name.ends_with(&suffix) {
            name.to_string()
        } else {
            format!("{}{}", name, suffix)
        }
    }

    fn path_for(&self, name: &str) -> StoreResult<PathBuf> {
        if !is_valid_file_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    fn ensure_root(&self) -> StoreResult<()> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root)?;
            info!(path = %self.root.display(), "Created configs directory");
        }
        Ok(())
    }
}

impl ConfigStore for DirStore {
    fn list(&self) -> StoreResult<Vec<String>> {
        self.ensure_root()?;

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();

        Ok(names)
    }

    fn read(&self, name: &str) -> StoreResult<String> {
        let path = self.path_for(name)?;
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => e.into(),
        })
    }

    fn write(&self, name: &str, content: &str) -> StoreResult<String> {
        let name = self.normalize_name(name);
        let path = self.path_for(&name)?;
        self.ensure_root()?;

        std::fs::write(&path, content)?;
        debug!(file = %name, bytes = content.len(), "Config file saved");

        Ok(name)
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        let path = self.path_for(name)?;
        std::fs::remove_file(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => e.into(),
        })?;
        debug!(file = %name, "Config file deleted");

        Ok(())
    }
}
