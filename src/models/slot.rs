use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A discrete bookable start time on a given date. Generated on demand per
/// date query, never persisted; a slot stops being offered only because an
/// appointment row exists for its date and time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Slot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub is_available: bool,
}
