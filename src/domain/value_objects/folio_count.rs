use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Folio count of a document, the unit of container capacity consumption.
/// Always at least 1 and bounded to what the signed 32-bit storage column
/// can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FolioCount(u32);

impl FolioCount {
    pub const MAX: u32 = i32::MAX as u32;

    pub fn new(count: u32) -> Result<Self, DomainError> {
        if count == 0 || count > Self::MAX {
            return Err(DomainError::InvalidFolioCount(count as i64));
        }
        Ok(Self(count))
    }

    pub fn from_i64(count: i64) -> Result<Self, DomainError> {
        if count <= 0 || count > Self::MAX as i64 {
            return Err(DomainError::InvalidFolioCount(count));
        }
        Ok(Self(count as u32))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for FolioCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
