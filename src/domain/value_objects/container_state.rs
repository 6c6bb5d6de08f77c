use serde::{Deserialize, Serialize};

/// Container lifecycle states.
///
/// `Open -> Closed` happens automatically when the running total reaches the
/// capacity ceiling. Leaving `Closed` requires an explicit administrative
/// edit; no automatic transition ever reopens a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerState {
    Open,
    Closed,
    InCustody,
}

impl ContainerState {
    /// Whether the transition is reachable without administrative action
    pub fn auto_transitions_to(&self, target: ContainerState) -> bool {
        matches!((self, target), (ContainerState::Open, ContainerState::Closed))
    }

    pub fn accepts_folios(&self) -> bool {
        !matches!(self, ContainerState::Closed)
    }
}

impl std::fmt::Display for ContainerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerState::Open => write!(f, "OPEN"),
            ContainerState::Closed => write!(f, "CLOSED"),
            ContainerState::InCustody => write!(f, "IN_CUSTODY"),
        }
    }
}

impl std::str::FromStr for ContainerState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(ContainerState::Open),
            "CLOSED" => Ok(ContainerState::Closed),
            "IN_CUSTODY" => Ok(ContainerState::InCustody),
            _ => Err(format!("Invalid container state: {}", s)),
        }
    }
}
