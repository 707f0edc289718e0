use serde::{Deserialize, Serialize};

/// Staff role as far as settlement is concerned.
///
/// Only team leaders earn the team PT incentive. The source system encoded
/// this as `position_id == 7`; the mapping is kept in one place here so the
/// magic constant never leaks into calculation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffRole {
    Trainer,
    TeamLeader,
}

/// Legacy position id meaning "team leader" in the source position table.
const TEAM_LEADER_POSITION_ID: i64 = 7;

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trainer => "trainer",
            Self::TeamLeader => "team_leader",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "trainer" => Some(Self::Trainer),
            "team_leader" => Some(Self::TeamLeader),
            _ => None,
        }
    }

    /// Maps a legacy position id onto a role.
    pub fn from_position_id(position_id: i64) -> Self {
        if position_id == TEAM_LEADER_POSITION_ID {
            Self::TeamLeader
        } else {
            Self::Trainer
        }
    }

    /// Legacy position id for commission-rate scoping, when the role implies
    /// one. Plain trainers match only position-agnostic rates.
    pub fn position_id(&self) -> Option<i64> {
        match self {
            Self::TeamLeader => Some(TEAM_LEADER_POSITION_ID),
            Self::Trainer => None,
        }
    }

    pub fn is_team_leader(&self) -> bool {
        matches!(self, Self::TeamLeader)
    }
}
