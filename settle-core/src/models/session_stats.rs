use serde::{Deserialize, Serialize};

/// Counts of completed PT sessions for one trainer-month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub regular_sessions: u32,
    pub free_sessions: u32,
}
