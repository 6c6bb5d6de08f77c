use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::PathBuf;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt, BufReader};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::ports::{
    BlobReader, BlobStat, BlobStore, ByteWindow, IngestedBlob, StorageError, StoredBlob,
};
use crate::domain::value_objects::{BlobRef, ContentDigest};
use crate::infrastructure::storage::{extension_of, BlobLayout, Digester, BUFFER_SIZE};

/// Local filesystem blob store with content-addressed deduplication.
///
/// Writes spool into `{root}/temp` and land under `{root}/{shard}` with an
/// atomic rename, so a blob path either holds complete content or nothing.
pub struct LocalBlobStore {
    layout: BlobLayout,
    durable_writes: bool,
}

impl LocalBlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self::with_durability(root, true)
    }

    pub fn with_durability(root: PathBuf, durable_writes: bool) -> Self {
        Self {
            layout: BlobLayout::new(root),
            durable_writes,
        }
    }

    /// Initialize the directory structure. Pre-creates all 256 shard
    /// directories up front so writes never race a directory create.
    pub async fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(self.layout.temp_dir()).await?;

        for i in 0..=255u32 {
            let shard = format!("{:02x}", i);
            fs::create_dir_all(self.layout.root().join(shard)).await?;
        }

        Ok(())
    }

    async fn sync_parent(&self, path: &std::path::Path) {
        if let Some(parent) = path.parent() {
            match File::open(parent).await {
                Ok(dir) => {
                    if let Err(e) = dir.sync_all().await {
                        warn!("Failed to sync parent directory after rename: {}", e);
                    }
                }
                Err(e) => warn!("Failed to open parent directory for sync: {}", e),
            }
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn ingest(
        &self,
        reader: BlobReader,
        original_name: &str,
    ) -> Result<IngestedBlob, StorageError> {
        let temp_path = self.layout.temp_path(Uuid::new_v4());

        debug!("Spooling blob to temp file: {:?}", temp_path);
        let (digest, size_bytes) =
            match Digester::spool(&temp_path, reader, self.durable_writes).await {
                Ok(result) => result,
                Err(e) => {
                    warn!("Failed to spool blob to {:?}: {}", temp_path, e);
                    let _ = fs::remove_file(&temp_path).await;
                    return Err(e);
                }
            };

        let rel_path = BlobLayout::rel_path(&digest, &extension_of(original_name));
        let final_path = self.layout.abs_path(&rel_path);

        if fs::metadata(&final_path).await.is_ok() {
            // Identical content already stored by a prior or concurrent
            // upload; the existing file is authoritative.
            debug!("Blob already exists (deduplication): {}", digest);
            let _ = fs::remove_file(&temp_path).await;
        } else {
            debug!("Moving blob to final location: {:?}", final_path);
            if let Err(e) = fs::rename(&temp_path, &final_path).await {
                let _ = fs::remove_file(&temp_path).await;
                return Err(StorageError::Io(e));
            }

            if self.durable_writes {
                self.sync_parent(&final_path).await;
            }
        }

        Ok(IngestedBlob {
            digest,
            rel_path,
            size_bytes,
        })
    }

    async fn resolve(&self, blob: &BlobRef) -> Result<BlobStat, StorageError> {
        let path = self.layout.abs_path(blob.rel_path());

        let meta = fs::metadata(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(blob.digest().to_string())
            } else {
                StorageError::Io(e)
            }
        })?;

        Ok(BlobStat {
            size_bytes: meta.len(),
            modified: meta.modified()?,
        })
    }

    async fn open(
        &self,
        blob: &BlobRef,
        window: Option<ByteWindow>,
    ) -> Result<BlobReader, StorageError> {
        let path = self.layout.abs_path(blob.rel_path());

        let mut file = File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(blob.digest().to_string())
            } else {
                StorageError::Io(e)
            }
        })?;

        match window {
            Some(window) => {
                file.seek(SeekFrom::Start(window.start)).await?;
                let bounded = BufReader::with_capacity(BUFFER_SIZE, file).take(window.len());
                Ok(Box::pin(bounded))
            }
            None => Ok(Box::pin(BufReader::with_capacity(BUFFER_SIZE, file))),
        }
    }

    async fn purge(&self, blob: &BlobRef, still_referenced: bool) -> Result<(), StorageError> {
        if still_referenced {
            debug!(
                "Blob {} still referenced by other documents, keeping file",
                blob.digest()
            );
            return Ok(());
        }

        let path = self.layout.abs_path(blob.rel_path());
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed blob file {:?}", path);
                Ok(())
            }
            // Already gone is an acceptable terminal state
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn list_stored(&self) -> Result<Vec<StoredBlob>, StorageError> {
        let mut found = Vec::new();
        let mut shards = fs::read_dir(self.layout.root()).await?;

        while let Some(shard) = shards.next_entry().await? {
            let shard_name = shard.file_name();
            let shard_name = shard_name.to_string_lossy();
            if shard_name.len() != 2 || !shard_name.chars().all(|c| c.is_ascii_hexdigit()) {
                continue;
            }

            let mut entries = fs::read_dir(shard.path()).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_name = entry.file_name();
                let file_name = file_name.to_string_lossy().into_owned();
                let Some(digest_hex) = file_name.get(..64) else {
                    continue;
                };

                let digest = match ContentDigest::from_hex(digest_hex.to_string()) {
                    Ok(d) => d,
                    Err(_) => continue,
                };

                let meta = entry.metadata().await?;
                found.push(StoredBlob {
                    rel_path: format!("{}/{}", shard_name, file_name),
                    digest,
                    size_bytes: meta.len(),
                    modified: meta.modified()?,
                });
            }
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> LocalBlobStore {
        LocalBlobStore::with_durability(dir.path().to_path_buf(), false)
    }

    fn blob_ref(ingested: &IngestedBlob) -> BlobRef {
        BlobRef::new(
            ingested.digest.clone(),
            ingested.rel_path.clone(),
            ingested.size_bytes,
            None,
        )
    }

    #[tokio::test]
    async fn test_init_creates_shards_and_temp() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.init().await.unwrap();

        assert!(dir.path().join("temp").is_dir());
        assert!(dir.path().join("00").is_dir());
        assert!(dir.path().join("ff").is_dir());
    }

    #[tokio::test]
    async fn test_ingest_and_read_back() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.init().await.unwrap();

        let content = b"Hola, archivo!";
        let ingested = store
            .ingest(Box::pin(std::io::Cursor::new(content)), "saludo.txt")
            .await
            .unwrap();

        assert_eq!(ingested.size_bytes, content.len() as u64);
        assert!(ingested.rel_path.ends_with(".txt"));

        let mut reader = store.open(&blob_ref(&ingested), None).await.unwrap();
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).await.unwrap();
        assert_eq!(buffer, content);
    }

    #[tokio::test]
    async fn test_ingest_deduplicates_identical_content() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.init().await.unwrap();

        let content = b"duplicate content";
        let first = store
            .ingest(Box::pin(std::io::Cursor::new(content)), "a.pdf")
            .await
            .unwrap();
        let second = store
            .ingest(Box::pin(std::io::Cursor::new(content)), "b.pdf")
            .await
            .unwrap();

        assert_eq!(first, second);

        // Exactly one file in the shard directory
        let shard_dir = dir.path().join(first.digest.shard());
        let mut entries = fs::read_dir(&shard_dir).await.unwrap();
        let mut count = 0;
        while entries.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 1);

        // No temp spool left behind
        let mut temp = fs::read_dir(dir.path().join("temp")).await.unwrap();
        assert!(temp.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_with_window_returns_exact_bytes() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.init().await.unwrap();

        let content: Vec<u8> = (0..=255u8).collect();
        let ingested = store
            .ingest(Box::pin(std::io::Cursor::new(content)), "bytes.bin")
            .await
            .unwrap();

        let mut reader = store
            .open(&blob_ref(&ingested), Some(ByteWindow { start: 10, end: 19 }))
            .await
            .unwrap();
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).await.unwrap();

        assert_eq!(buffer, (10..=19u8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_purge_respects_references() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.init().await.unwrap();

        let ingested = store
            .ingest(Box::pin(std::io::Cursor::new(b"to be purged")), "p.txt")
            .await
            .unwrap();
        let r = blob_ref(&ingested);

        store.purge(&r, true).await.unwrap();
        assert!(store.resolve(&r).await.is_ok());

        store.purge(&r, false).await.unwrap();
        assert!(matches!(
            store.resolve(&r).await.unwrap_err(),
            StorageError::NotFound(_)
        ));

        // Double purge is not an error
        store.purge(&r, false).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_stored_sees_only_blobs() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.init().await.unwrap();

        store
            .ingest(Box::pin(std::io::Cursor::new(b"uno")), "uno.txt")
            .await
            .unwrap();
        store
            .ingest(Box::pin(std::io::Cursor::new(b"dos")), "dos.txt")
            .await
            .unwrap();

        let stored = store.list_stored().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|b| b.rel_path.ends_with(".txt")));
    }
}
