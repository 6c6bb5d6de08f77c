use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::application::ports::StorageError;
use crate::domain::value_objects::ContentDigest;

/// Buffer size for I/O operations. 256KB balances throughput against memory
/// for the multi-hundred-megabyte files this registry serves.
pub const BUFFER_SIZE: usize = 256 * 1024;

/// Single-pass spool-and-digest: the incoming stream is written to `dest_path`
/// while a running SHA-256 is updated, so no second read over the data is
/// ever needed.
pub struct Digester;

impl Digester {
    /// Returns (digest, size_bytes) of everything read from `reader`.
    pub async fn spool(
        dest_path: &Path,
        mut reader: impl AsyncRead + Unpin,
        durable: bool,
    ) -> Result<(ContentDigest, u64), StorageError> {
        let mut file =
            tokio::io::BufWriter::with_capacity(BUFFER_SIZE * 2, File::create(dest_path).await?);

        let mut hasher = Sha256::new();
        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; BUFFER_SIZE];

        loop {
            let n = reader.read(&mut buffer).await?;
            if n == 0 {
                break;
            }

            hasher.update(&buffer[..n]);
            file.write_all(&buffer[..n]).await?;

            total_bytes += n as u64;
        }

        file.flush().await?;

        if durable {
            file.get_mut().sync_all().await?;
        }

        let digest_hex = hex::encode(hasher.finalize());
        let digest = ContentDigest::from_hex(digest_hex)
            .map_err(|e| StorageError::Internal(e.to_string()))?;

        Ok((digest, total_bytes))
    }
}
