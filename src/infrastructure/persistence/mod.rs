mod postgres_container_repository;
mod postgres_document_repository;

pub use postgres_container_repository::PostgresContainerRepository;
pub use postgres_document_repository::PostgresDocumentRepository;
