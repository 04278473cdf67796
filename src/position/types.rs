use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of whoever owns a position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owner(pub String);

impl From<&str> for Owner {
    fn from(owner: &str) -> Self {
        Owner(owner.to_string())
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionKey {
    pub owner: Owner,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PositionInfo {
    pub liquidity: u128, // Position liquidity
}
