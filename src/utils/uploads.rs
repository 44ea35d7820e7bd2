use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use tokio::{fs, io::AsyncWriteExt};

use super::errors::UploadError;

/// Directory holding files uploaded with proposal updates
#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the upload directory if it does not exist yet
    pub async fn init(dir: impl Into<PathBuf>) -> Result<Self, UploadError> {
        let store = Self::new(dir);
        fs::create_dir_all(&store.dir).await?;
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Starts tracking the files written for a single request
    pub fn begin(&self) -> ProvisionalUploads {
        ProvisionalUploads {
            dir: self.dir.clone(),
            stored: Vec::new(),
        }
    }
}

/// Files written during one request, kept until the request is authorized.
#[derive(Debug)]
pub struct ProvisionalUploads {
    dir: PathBuf,
    stored: Vec<PathBuf>,
}

impl ProvisionalUploads {
    fn next_path(&mut self, original_name: &str) -> PathBuf {
        let name = format!(
            "{}-{}",
            uuid::Uuid::new_v4().simple(),
            sanitize_file_name(original_name)
        );
        let path = self.dir.join(name);
        // tracked before any byte is written so partial files are discarded too
        self.stored.push(path.clone());
        path
    }

    /// Writes an in-memory file and returns its stored name
    pub async fn store(&mut self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let path = self.next_path(original_name);
        fs::write(&path, bytes)
            .await
            .map_err(|e| UploadError::Write(path.clone(), e))?;
        Ok(stored_name(&path))
    }

    /// Streams a multipart file field to disk and returns its stored name
    pub async fn store_field(&mut self, mut field: Field<'_>) -> Result<String, UploadError> {
        let original_name = field.file_name().unwrap_or_default().to_owned();
        let path = self.next_path(&original_name);

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| UploadError::Write(path.clone(), e))?;
        while let Some(chunk) = field.chunk().await? {
            file.write_all(&chunk)
                .await
                .map_err(|e| UploadError::Write(path.clone(), e))?;
        }
        file.flush()
            .await
            .map_err(|e| UploadError::Write(path.clone(), e))?;

        tracing::debug!("Stored provisional upload {}", path.display());
        Ok(stored_name(&path))
    }

    pub fn file_names(&self) -> Vec<String> {
        self.stored.iter().map(|path| stored_name(path)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.stored.is_empty()
    }

    /// Deletes every tracked file.
    ///
    /// Failures are logged and skipped; nothing is retried.
    pub async fn discard(self) {
        for path in self.stored {
            match fs::remove_file(&path).await {
                Ok(()) => tracing::debug!("Removed upload {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!("Failed to remove upload {}: {e}", path.display());
                }
            }
        }
    }
}

fn stored_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reduces a client supplied file name to a safe single path component
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("report.pdf"), "report.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\budget v2.xlsx"), "budget_v2.xlsx");
        assert_eq!(sanitize_file_name("..."), "file");
        assert_eq!(sanitize_file_name(""), "file");
        assert_eq!(sanitize_file_name("résumé.doc"), "r_sum_.doc");
    }

    #[tokio::test]
    async fn test_store_then_discard() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::init(dir.path()).await.unwrap();

        let mut uploads = store.begin();
        let first = uploads.store("budget.xlsx", b"numbers").await.unwrap();
        let second = uploads.store("../notes.txt", b"words").await.unwrap();

        assert!(first.ends_with("-budget.xlsx"));
        assert!(second.ends_with("-notes.txt"));
        assert_eq!(uploads.file_names(), vec![first.clone(), second.clone()]);
        assert!(dir.path().join(&first).exists());

        uploads.discard().await;
        assert!(!dir.path().join(&first).exists());
        assert!(!dir.path().join(&second).exists());
    }

    #[tokio::test]
    async fn test_discard_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::init(dir.path()).await.unwrap();

        let mut uploads = store.begin();
        let name = uploads.store("a.txt", b"a").await.unwrap();
        std::fs::remove_file(dir.path().join(&name)).unwrap();

        uploads.discard().await;
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_init_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("proposals").join("updates");

        let store = UploadStore::init(&nested).await.unwrap();
        assert!(store.dir().is_dir());
        assert!(store.begin().is_empty());
    }
}
