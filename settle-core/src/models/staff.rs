use serde::{Deserialize, Serialize};

use super::role::StaffRole;

/// A staff member as the settlement engine sees one: role, home center and
/// optional team membership. Everything else about staff lives upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: i64,
    pub name: String,
    pub role: StaffRole,
    pub center_id: i64,
    pub team_id: Option<i64>,
}
