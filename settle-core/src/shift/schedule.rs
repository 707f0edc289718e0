use serde::{Deserialize, Serialize};

/// A weekday in a shift schedule, carrying the source system's single-glyph
/// labels and the 1–7 numeric codes the compact wire format uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftDay {
    #[serde(rename = "월")]
    Mon,
    #[serde(rename = "화")]
    Tue,
    #[serde(rename = "수")]
    Wed,
    #[serde(rename = "목")]
    Thu,
    #[serde(rename = "금")]
    Fri,
    #[serde(rename = "토")]
    Sat,
    #[serde(rename = "일")]
    Sun,
}

impl ShiftDay {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mon => "월",
            Self::Tue => "화",
            Self::Wed => "수",
            Self::Thu => "목",
            Self::Fri => "금",
            Self::Sat => "토",
            Self::Sun => "일",
        }
    }

    /// Monday is 1, Sunday is 7.
    pub fn number(&self) -> u8 {
        match self {
            Self::Mon => 1,
            Self::Tue => 2,
            Self::Wed => 3,
            Self::Thu => 4,
            Self::Fri => 5,
            Self::Sat => 6,
            Self::Sun => 7,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "월" => Some(Self::Mon),
            "화" => Some(Self::Tue),
            "수" => Some(Self::Wed),
            "목" => Some(Self::Thu),
            "금" => Some(Self::Fri),
            "토" => Some(Self::Sat),
            "일" => Some(Self::Sun),
            _ => None,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Mon),
            2 => Some(Self::Tue),
            3 => Some(Self::Wed),
            4 => Some(Self::Thu),
            5 => Some(Self::Fri),
            6 => Some(Self::Sat),
            7 => Some(Self::Sun),
            _ => None,
        }
    }
}

/// A working-hours window, `"HH:MM"` strings as persisted by the source
/// system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

/// One schedule entry: a set of weekdays worked over the same time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftEntry {
    pub days: Vec<ShiftDay>,
    pub time: TimeRange,
}

/// A staff member's weekly working schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub schedules: Vec<ShiftEntry>,
}

impl Default for WeeklySchedule {
    /// The documented fallback schedule: one entry, no days, 09:00–17:00.
    fn default() -> Self {
        Self {
            schedules: vec![ShiftEntry {
                days: vec![],
                time: TimeRange::new("09:00", "17:00"),
            }],
        }
    }
}
