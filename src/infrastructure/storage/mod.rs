mod blob_layout;
mod digester;
mod local_blob_store;

pub use blob_layout::{extension_of, BlobLayout};
pub use digester::{Digester, BUFFER_SIZE};
pub use local_blob_store::LocalBlobStore;
