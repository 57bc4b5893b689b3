use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::BusinessHours;

#[derive(Debug)]
pub enum SchedulingError {
    Closed { hours: String },
    OutsideHours { hours: String },
    PastTime,
    Conflict,
}

impl std::fmt::Display for SchedulingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulingError::Closed { hours } => {
                write!(f, "We're closed that day. Opening hours: {hours}")
            }
            SchedulingError::OutsideHours { hours } => {
                write!(
                    f,
                    "That time is outside our opening hours. We're open: {hours}"
                )
            }
            SchedulingError::PastTime => {
                write!(f, "That time has already passed. Please pick a later slot.")
            }
            SchedulingError::Conflict => {
                write!(
                    f,
                    "Sorry, that slot is already booked. Could you pick a different time?"
                )
            }
        }
    }
}

/// Validate a requested appointment slot against opening hours, the slot
/// grid, and existing bookings for that date.
pub fn validate_booking_slot(
    conn: &Connection,
    date: NaiveDate,
    start_time: NaiveTime,
    hours: &BusinessHours,
    slot_minutes: u32,
    now: NaiveDateTime,
) -> Result<(), SchedulingError> {
    let Some((open, close)) = hours.hours_for(date) else {
        return Err(SchedulingError::Closed {
            hours: hours.to_human_readable(),
        });
    };

    let open_min = open.hour() * 60 + open.minute();
    let close_min = close.hour() * 60 + close.minute();
    let start_min = start_time.hour() * 60 + start_time.minute();

    // Slots are atomic grid entries: the start must sit on the grid and the
    // job must end by closing time.
    let on_grid = start_min >= open_min
        && (slot_minutes == 0 || (start_min - open_min) % slot_minutes == 0);
    if !on_grid || start_min + slot_minutes > close_min {
        return Err(SchedulingError::OutsideHours {
            hours: hours.to_human_readable(),
        });
    }

    if date == now.date() && start_time <= now.time() {
        return Err(SchedulingError::PastTime);
    }

    let booked = queries::booked_times(conn, date).map_err(|_| SchedulingError::Conflict)?;
    if booked.contains(&start_time) {
        return Err(SchedulingError::Conflict);
    }

    Ok(())
}
