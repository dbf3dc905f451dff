use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Full server-side roster keyed by activity name.
pub type ActivitySnapshot = BTreeMap<String, ActivityDetails>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDetails {
    pub description: String,
    pub schedule: String,
    pub max_participants: i64,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl ActivityDetails {
    /// Remaining capacity. Derived on demand, never stored.
    pub fn spots_left(&self) -> i64 {
        self.max_participants - self.participants.len() as i64
    }

    pub fn is_full(&self) -> bool {
        self.spots_left() <= 0
    }

    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }
}
