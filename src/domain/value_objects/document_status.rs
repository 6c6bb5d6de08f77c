use serde::{Deserialize, Serialize};

/// Processing state of a document within the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    /// Freshly registered, not yet routed
    Registered,
    /// Under review by the destination area
    InProcess,
    /// Filed in a container
    Archived,
    /// Checked out through the loan subsystem
    Loaned,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Registered => write!(f, "REGISTERED"),
            DocumentStatus::InProcess => write!(f, "IN_PROCESS"),
            DocumentStatus::Archived => write!(f, "ARCHIVED"),
            DocumentStatus::Loaned => write!(f, "LOANED"),
        }
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGISTERED" => Ok(DocumentStatus::Registered),
            "IN_PROCESS" => Ok(DocumentStatus::InProcess),
            "ARCHIVED" => Ok(DocumentStatus::Archived),
            "LOANED" => Ok(DocumentStatus::Loaned),
            _ => Err(format!("Invalid document status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_document_status_round_trip() {
        for status in [
            DocumentStatus::Registered,
            DocumentStatus::InProcess,
            DocumentStatus::Archived,
            DocumentStatus::Loaned,
        ] {
            assert_eq!(
                DocumentStatus::from_str(&status.to_string()).unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_document_status_from_str_invalid() {
        assert!(DocumentStatus::from_str("SHREDDED").is_err());
    }
}
