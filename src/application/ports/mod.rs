mod blob_store;
mod container_repository;
mod document_repository;

pub use blob_store::{
    BlobReader, BlobStat, BlobStore, ByteWindow, IngestedBlob, StorageError, StoredBlob,
};
pub use container_repository::{ContainerRepository, ReserveOutcome};
pub use document_repository::{DocumentRepository, RepositoryError};

#[cfg(test)]
pub use blob_store::MockBlobStore;
#[cfg(test)]
pub use container_repository::MockContainerRepository;
#[cfg(test)]
pub use document_repository::MockDocumentRepository;
