//! Uploaded file storage mirrored into the vector store.

use crate::error::GatewayError;
use crate::Result;
use docchat_core::paths::sanitize_file_name;
use docchat_memory::Retriever;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Persists uploads to a directory and keeps the vector store in step.
///
/// Every stored file is indexed under its storage path (see
/// [`FileManager::document_id`]); upload and delete both derive the ID the
/// same way so deleting a file also removes its document.
pub struct FileManager {
    upload_dir: PathBuf,
    retriever: Arc<Retriever>,
}

impl FileManager {
    /// Create a file manager, creating `upload_dir` if needed.
    pub async fn open(upload_dir: impl Into<PathBuf>, retriever: Arc<Retriever>) -> Result<Self> {
        let upload_dir = upload_dir.into();
        tokio::fs::create_dir_all(&upload_dir).await?;
        Ok(Self {
            upload_dir,
            retriever,
        })
    }

    /// Directory uploads are written to.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Retriever documents are indexed into.
    pub fn retriever(&self) -> &Arc<Retriever> {
        &self.retriever
    }

    /// Vector store ID of the file stored at `path`.
    pub fn document_id(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    /// Storage path for a sanitized file name.
    fn storage_path(&self, name: &str) -> PathBuf {
        self.upload_dir.join(name)
    }

    /// Store an upload and index its text.
    ///
    /// An existing file with the same name is overwritten and its document
    /// replaced. Returns the stored file name.
    pub async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let name = sanitize_file_name(filename).ok_or(GatewayError::EmptyFilename)?;
        let path = self.storage_path(&name);

        tokio::fs::write(&path, bytes).await?;

        let content = String::from_utf8_lossy(bytes);
        let id = Self::document_id(&path);
        self.retriever.add_document(&id, &content, &id).await?;

        info!("Stored upload {} ({} bytes)", path.display(), bytes.len());
        Ok(name)
    }

    /// Remove a stored file and its document.
    pub async fn delete(&self, filename: &str) -> Result<()> {
        let name = sanitize_file_name(filename).ok_or(GatewayError::FileNotFound)?;
        let path = self.storage_path(&name);

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(GatewayError::FileNotFound),
        }

        tokio::fs::remove_file(&path).await?;

        let id = Self::document_id(&path);
        let removed = self.retriever.delete(&id).await?;
        if !removed {
            debug!("No vector entry for {}", id);
        }

        info!("Deleted upload {}", path.display());
        Ok(())
    }

    /// Names of stored files, sorted.
    pub async fn list(&self) -> Result<Vec<String>> {
        if !tokio::fs::try_exists(&self.upload_dir).await? {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.upload_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_memory::{HashEmbeddings, MemoryVectorStore};

    async fn manager(dir: &Path) -> FileManager {
        let retriever = Arc::new(Retriever::new(
            Arc::new(HashEmbeddings::new(64)),
            Arc::new(MemoryVectorStore::new()),
        ));
        FileManager::open(dir.join("uploads"), retriever).await.unwrap()
    }

    #[tokio::test]
    async fn test_upload_writes_and_indexes() {
        let dir = tempfile::tempdir().unwrap();
        let files = manager(dir.path()).await;

        let name = files.upload("notes.txt", b"meeting notes").await.unwrap();
        assert_eq!(name, "notes.txt");

        let path = files.upload_dir().join("notes.txt");
        assert_eq!(std::fs::read(&path).unwrap(), b"meeting notes");

        let entry = files
            .retriever()
            .get(&FileManager::document_id(&path))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.content, "meeting notes");
        assert_eq!(entry.metadata["source"], FileManager::document_id(&path));
    }

    #[tokio::test]
    async fn test_upload_overwrites_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let files = manager(dir.path()).await;

        files.upload("a.txt", b"first").await.unwrap();
        files.upload("a.txt", b"second").await.unwrap();

        assert_eq!(files.list().await.unwrap(), vec!["a.txt"]);
        assert_eq!(files.retriever().count().await.unwrap(), 1);
        let path = files.upload_dir().join("a.txt");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_upload_strips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let files = manager(dir.path()).await;

        let name = files.upload("../../escape.txt", b"x").await.unwrap();
        assert_eq!(name, "escape.txt");
        assert!(files.upload_dir().join("escape.txt").exists());
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn test_upload_empty_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let files = manager(dir.path()).await;

        assert!(matches!(
            files.upload("", b"x").await,
            Err(GatewayError::EmptyFilename)
        ));
        assert!(files.list().await.unwrap().is_empty());
        assert_eq!(files.retriever().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upload_binary_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let files = manager(dir.path()).await;

        files.upload("blob.bin", &[0xff, 0xfe, b'o', b'k']).await.unwrap();
        let path = files.upload_dir().join("blob.bin");
        let entry = files
            .retriever()
            .get(&FileManager::document_id(&path))
            .await
            .unwrap()
            .unwrap();
        assert!(entry.content.ends_with("ok"));
    }

    #[tokio::test]
    async fn test_delete_removes_file_and_document() {
        let dir = tempfile::tempdir().unwrap();
        let files = manager(dir.path()).await;

        files.upload("gone.txt", b"temporary").await.unwrap();
        files.delete("gone.txt").await.unwrap();

        assert!(files.list().await.unwrap().is_empty());
        assert_eq!(files.retriever().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bare_filename_is_not_the_document_id() {
        // Indexing by storage path and deleting by bare name would leave
        // the document behind; both sides must use document_id.
        let dir = tempfile::tempdir().unwrap();
        let files = manager(dir.path()).await;

        files.upload("keyed.txt", b"content").await.unwrap();
        assert!(files.retriever().get("keyed.txt").await.unwrap().is_none());
        assert!(!files.retriever().delete("keyed.txt").await.unwrap());
        assert_eq!(files.retriever().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let files = manager(dir.path()).await;

        assert!(matches!(
            files.delete("absent.txt").await,
            Err(GatewayError::FileNotFound)
        ));
        assert!(matches!(files.delete("..").await, Err(GatewayError::FileNotFound)));
    }

    #[tokio::test]
    async fn test_list_sorted_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let files = manager(dir.path()).await;

        files.upload("b.txt", b"b").await.unwrap();
        files.upload("a.txt", b"a").await.unwrap();
        std::fs::create_dir(files.upload_dir().join("nested")).unwrap();

        assert_eq!(files.list().await.unwrap(), vec!["a.txt", "b.txt"]);
    }
}
