use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::enums::session_status::SessionStatus;
use crate::structs::category_set::CategorySet;

/// One browser tab's calculator state. Created on page load, mutated in place
/// by the API routes, dropped on close or after the idle TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalcSession {
    pub id: String,
    pub set: CategorySet,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl CalcSession {
    pub fn new(id: String, set: CategorySet) -> Self {
        let now = Utc::now();
        Self {
            id,
            set,
            status: SessionStatus::Active,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}
