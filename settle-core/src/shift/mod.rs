//! Weekly shift schedules and their length-capped persisted encoding.

mod codec;
mod schedule;

pub use codec::{MAX_ENCODED_LEN, ShiftCodecError, compress, decompress};
pub use schedule::{ShiftDay, ShiftEntry, TimeRange, WeeklySchedule};
