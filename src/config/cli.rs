use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// 以 base path 為根目錄讀取本機檔案
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// 相對於目前工作目錄
    pub fn current_dir() -> Self {
        Self::new(".")
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        // 絕對路徑會取代 base path
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_relative_and_absolute() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("zodiac.txt");
        std::fs::write(&file, "header\n").unwrap();

        let storage = LocalStorage::new(temp_dir.path());
        assert_eq!(storage.read_file("zodiac.txt").await.unwrap(), b"header\n");

        let absolute = LocalStorage::current_dir();
        assert_eq!(
            absolute.read_file(file.to_str().unwrap()).await.unwrap(),
            b"header\n"
        );
    }

    #[tokio::test]
    async fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        assert!(storage.read_file("nope.txt").await.is_err());
    }
}
