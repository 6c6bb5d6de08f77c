use std::sync::Arc;
use std::time::{Duration, SystemTime};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::ports::{BlobStore, DocumentRepository, RepositoryError, StorageError};
use crate::domain::value_objects::BlobRef;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SweepStats {
    pub scanned: usize,
    pub removed: usize,
    pub skipped_young: usize,
}

/// Background reclamation of blob files no document references.
///
/// Aborted creates deliberately leave their ingested blob behind; the sweep
/// picks those up once they are older than `min_age`, which keeps it from
/// racing an ingest whose document row has not landed yet.
pub struct OrphanSweeper {
    documents: Arc<dyn DocumentRepository>,
    blob_store: Arc<dyn BlobStore>,
    min_age: Duration,
}

impl OrphanSweeper {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        blob_store: Arc<dyn BlobStore>,
        min_age: Duration,
    ) -> Self {
        Self {
            documents,
            blob_store,
            min_age,
        }
    }

    pub async fn sweep_once(&self) -> Result<SweepStats, SweepError> {
        let stored = self.blob_store.list_stored().await?;
        let mut stats = SweepStats {
            scanned: stored.len(),
            ..Default::default()
        };

        for blob in stored {
            let age = SystemTime::now()
                .duration_since(blob.modified)
                .unwrap_or_default();
            if age < self.min_age {
                stats.skipped_young += 1;
                continue;
            }

            if self.documents.digest_referenced(&blob.digest).await? {
                continue;
            }

            let blob_ref = BlobRef::new(blob.digest, blob.rel_path, blob.size_bytes, None);
            self.blob_store.purge(&blob_ref, false).await?;
            debug!(digest = %blob_ref.digest(), "removed orphaned blob");
            stats.removed += 1;
        }

        Ok(stats)
    }

    /// Run the sweep on a fixed interval until the task is aborted
    pub fn spawn(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match self.sweep_once().await {
                    Ok(stats) if stats.removed > 0 => {
                        info!(
                            scanned = stats.scanned,
                            removed = stats.removed,
                            "orphan sweep removed blobs"
                        );
                    }
                    Ok(stats) => {
                        debug!(scanned = stats.scanned, "orphan sweep found nothing to do");
                    }
                    Err(e) => warn!(error = %e, "orphan sweep failed"),
                }
            }
        })
    }
}
