use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::PathBuf;

/// Filesystem storage rooted at `base_path`; an empty base resolves paths as given.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }

    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.resolve(path))?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        // 不自動建立目錄，目錄不存在時直接回報寫入失敗
        fs::write(self.resolve(path), data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ExportError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("votes.csv", b"a,b\n1,2\n").await.unwrap();

        assert!(storage.exists("votes.csv"));
        assert_eq!(storage.read_file("votes.csv").await.unwrap(), b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let err = storage
            .write_file("missing/votes.csv", b"a\n")
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::IoError(_)));
    }

    #[test]
    fn test_empty_base_keeps_relative_path() {
        let storage = LocalStorage::default();
        assert_eq!(storage.resolve("votes.csv"), PathBuf::from("votes.csv"));
    }
}
