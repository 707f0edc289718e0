//! Two-pass codec for length-capped persisted shift schedules.
//!
//! The persisted column holds at most [`MAX_ENCODED_LEN`] characters, so a
//! schedule is serialized through up to two compaction passes:
//!
//! 1. keys shrink to single letters (`schedules`→`s`, `days`→`d`,
//!    `time`→`t`, `start`→`s`, `end`→`e`), weekdays keep their labels;
//! 2. only if pass 1 still exceeds the cap, weekdays additionally encode as
//!    the integers 1–7.
//!
//! Decompression reverses both passes and also accepts legacy verbose
//! strings; malformed input decodes to [`WeeklySchedule::default()`], never
//! an error. The cap itself is an artifact of the legacy storage column and
//! is kept only for wire compatibility.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::schedule::{ShiftDay, ShiftEntry, TimeRange, WeeklySchedule};

/// Maximum length, in characters, of an encoded schedule.
pub const MAX_ENCODED_LEN: usize = 100;

/// Errors from compressing a shift schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShiftCodecError {
    /// Even the fully compacted encoding exceeds the storage cap.
    #[error("encoded schedule is {0} characters, over the {MAX_ENCODED_LEN} character limit")]
    TooLong(usize),
}

#[derive(Serialize)]
struct EncSchedule {
    s: Vec<EncEntry>,
}

#[derive(Serialize)]
struct EncEntry {
    d: Vec<EncDay>,
    t: EncTime,
}

#[derive(Serialize)]
#[serde(untagged)]
enum EncDay {
    Label(&'static str),
    Number(u8),
}

#[derive(Serialize)]
struct EncTime {
    s: String,
    e: String,
}

// Decoding side: field aliases accept both the compact and the legacy
// verbose key shape with one set of structs.

#[derive(Deserialize)]
struct RawSchedule {
    #[serde(alias = "s")]
    schedules: Vec<RawEntry>,
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(alias = "d")]
    days: Vec<RawDay>,
    #[serde(alias = "t")]
    time: RawTime,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDay {
    Number(u8),
    Text(String),
}

#[derive(Deserialize)]
struct RawTime {
    #[serde(alias = "s")]
    start: String,
    #[serde(alias = "e")]
    end: String,
}

/// Serializes a schedule into the compact persisted form.
///
/// # Errors
///
/// [`ShiftCodecError::TooLong`] when the schedule does not fit the cap even
/// with numeric weekdays.
pub fn compress(schedule: &WeeklySchedule) -> Result<String, ShiftCodecError> {
    let pass1 = encode(schedule, false);
    if char_len(&pass1) <= MAX_ENCODED_LEN {
        return Ok(pass1);
    }

    let pass2 = encode(schedule, true);
    let len = char_len(&pass2);
    if len <= MAX_ENCODED_LEN {
        Ok(pass2)
    } else {
        Err(ShiftCodecError::TooLong(len))
    }
}

/// Parses a persisted schedule string, compact or legacy verbose.
///
/// Total: malformed input (bad JSON, unknown weekdays, missing fields)
/// yields the default schedule.
pub fn decompress(encoded: &str) -> WeeklySchedule {
    parse(encoded).unwrap_or_default()
}

fn encode(schedule: &WeeklySchedule, numeric_days: bool) -> String {
    let enc = EncSchedule {
        s: schedule
            .schedules
            .iter()
            .map(|entry| EncEntry {
                d: entry
                    .days
                    .iter()
                    .map(|day| {
                        if numeric_days {
                            EncDay::Number(day.number())
                        } else {
                            EncDay::Label(day.label())
                        }
                    })
                    .collect(),
                t: EncTime {
                    s: entry.time.start.clone(),
                    e: entry.time.end.clone(),
                },
            })
            .collect(),
    };

    // Serializing this fixed shape cannot fail.
    serde_json::to_string(&enc).unwrap_or_default()
}

fn parse(encoded: &str) -> Option<WeeklySchedule> {
    let raw: RawSchedule = serde_json::from_str(encoded).ok()?;

    let mut schedules = Vec::with_capacity(raw.schedules.len());
    for entry in raw.schedules {
        let mut days = Vec::with_capacity(entry.days.len());
        for day in entry.days {
            days.push(parse_day(&day)?);
        }
        schedules.push(ShiftEntry {
            days,
            time: TimeRange {
                start: entry.time.start,
                end: entry.time.end,
            },
        });
    }

    Some(WeeklySchedule { schedules })
}

fn parse_day(raw: &RawDay) -> Option<ShiftDay> {
    match raw {
        RawDay::Number(n) => ShiftDay::from_number(*n),
        // Legacy writers sometimes stored numeric days as strings.
        RawDay::Text(s) => ShiftDay::from_label(s)
            .or_else(|| s.parse::<u8>().ok().and_then(ShiftDay::from_number)),
    }
}

/// The storage cap counts characters, not bytes; weekday labels are
/// multi-byte in UTF-8.
fn char_len(s: &str) -> usize {
    s.chars().count()
}
