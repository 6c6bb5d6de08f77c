//! # Archiva - Municipal Document Blob Storage
//!
//! The blob storage and container-capacity engine behind a municipal document
//! registry: content-addressed file storage with deduplication, a document
//! registry with an exact folio accounting invariant, and byte-range
//! streaming for large files.
//!
//! ## Architecture Layers
//!
//! - **Domain**: Core business logic (entities, value objects, domain errors)
//! - **Application**: Use cases, ports (interfaces), the container ledger
//! - **Infrastructure**: Adapters for blob storage and persistence
//! - **API**: HTTP handlers, routing and OpenAPI
//!
//! ## Key Guarantees
//!
//! - A container's running folio total always equals the folio sum of its
//!   non-trashed documents, enforced against concurrent writers
//! - Containers close automatically the moment they reach capacity
//! - Identical uploads share one blob file; the file outlives every document
//!   referencing it and not a purge longer
//! - Byte-range requests stream bounded windows, never whole files in memory

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export key types explicitly to avoid ambiguity
pub use api::errors as api_errors;
pub use application::{dto, ledger, ports, sweep, use_cases};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::{entities, value_objects};
