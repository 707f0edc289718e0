use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from constructing a [`TrainerMonthKey`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrainerMonthKeyError {
    /// The month must be in 1..=12.
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
}

/// Identifies one settlement period: a trainer and a calendar month.
///
/// Immutable once constructed; every fact the settlement worksheet consumes
/// is fetched for exactly one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainerMonthKey {
    trainer_id: i64,
    year: i32,
    month: u32,
}

impl TrainerMonthKey {
    /// Creates a key, validating that `month` is a real calendar month.
    pub fn new(trainer_id: i64, year: i32, month: u32) -> Result<Self, TrainerMonthKeyError> {
        if !(1..=12).contains(&month) {
            return Err(TrainerMonthKeyError::InvalidMonth(month));
        }
        Ok(Self {
            trainer_id,
            year,
            month,
        })
    }

    pub fn trainer_id(&self) -> i64 {
        self.trainer_id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The key for the month before this one, same trainer.
    ///
    /// Carryover amounts are read from the previous month's settlement, so
    /// January rolls back to December of the prior year.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                trainer_id: self.trainer_id,
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                trainer_id: self.trainer_id,
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}
