use crate::error::{FstoreError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the throwaway file used to prove the root is writable
const WRITE_CHECK: &str = ".fstore-write-check";

/// Configuration for a record store root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Existing, writable directory holding one subdirectory per table
    pub root: PathBuf,

    /// Write records as indented JSON
    /// Default: true
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,

    /// File extension of record files, without the dot
    /// Default: "json"
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pretty_json: default_pretty_json(),
            file_extension: default_file_extension(),
        }
    }

    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    /// Check that the root exists, is a directory and accepts writes
    ///
    /// This is the only check done eagerly; everything below the root is
    /// created lazily on first write.
    pub fn validate(&self) -> Result<()> {
        if self.file_extension.is_empty() || self.file_extension.contains(['/', '\\', '.']) {
            return Err(FstoreError::Config(format!(
                "Invalid record file extension: {:?}",
                self.file_extension
            )));
        }

        if !self.root.is_dir() {
            return Err(FstoreError::Config(format!(
                "Not a directory: {}",
                self.root.display()
            )));
        }

        check_writable(&self.root)
    }
}

fn check_writable(dir: &Path) -> Result<()> {
    let marker = dir.join(WRITE_CHECK);
    std::fs::write(&marker, b"").map_err(|e| {
        FstoreError::Config(format!("Directory not writable: {} ({})", dir.display(), e))
    })?;
    std::fs::remove_file(&marker).map_err(|e| {
        FstoreError::Config(format!(
            "Failed to remove write check file in {}: {}",
            dir.display(),
            e
        ))
    })?;
    Ok(())
}

fn default_pretty_json() -> bool {
    true
}

fn default_file_extension() -> String {
    "json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_existing_dir() {
        let temp = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(temp.path());
        config.validate().unwrap();
        assert!(!temp.path().join(WRITE_CHECK).exists());
    }

    #[test]
    fn test_validate_missing_dir() {
        let temp = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(temp.path().join("nope"));
        assert!(matches!(config.validate(), Err(FstoreError::Config(_))));
    }

    #[test]
    fn test_validate_file_is_not_dir() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            StoreConfig::new(file).validate(),
            Err(FstoreError::Config(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_read_only_dir() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("protected_dir");
        std::fs::create_dir(&root).unwrap();
        std::fs::set_permissions(&root, std::fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users ignore the mode bits
        let marker = root.join("can-write");
        let writable = std::fs::write(&marker, b"").is_ok();
        let result = StoreConfig::new(&root).validate();
        std::fs::set_permissions(&root, std::fs::Permissions::from_mode(0o755)).unwrap();
        if writable {
            return;
        }

        assert!(matches!(result, Err(FstoreError::Config(_))));
    }

    #[test]
    fn test_bad_extension() {
        let temp = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(temp.path()).with_file_extension("tar.gz");
        assert!(matches!(config.validate(), Err(FstoreError::Config(_))));
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{"root": "/tmp/db"}"#).unwrap();
        assert!(config.pretty_json);
        assert_eq!(config.file_extension, "json");
    }
}
