use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::models::{BusinessHours, Slot};

/// Enumerate the bookable slots for a date. Pure function of its inputs:
/// candidate start times run from opening time at `slot_minutes`
/// granularity, a slot must end by closing time, exact-match booked times
/// are dropped, and when `date` is today anything at or before `now` is
/// dropped too. A closed weekday yields an empty list, not an error.
pub fn available_slots(
    date: NaiveDate,
    hours: &BusinessHours,
    booked: &HashSet<NaiveTime>,
    slot_minutes: u32,
    now: NaiveDateTime,
) -> Vec<Slot> {
    if slot_minutes == 0 {
        return Vec::new();
    }

    let Some((open, close)) = hours.hours_for(date) else {
        return Vec::new();
    };

    // Work in minutes from midnight; garage hours never cross midnight and
    // NaiveTime arithmetic wraps.
    let open_min = open.hour() * 60 + open.minute();
    let close_min = close.hour() * 60 + close.minute();

    let mut slots = Vec::new();
    let mut start = open_min;
    while start + slot_minutes <= close_min {
        let time = NaiveTime::from_hms_opt(start / 60, start % 60, 0)
            .unwrap_or(open);

        let in_past = date == now.date() && time <= now.time();
        if !in_past && !booked.contains(&time) {
            slots.push(Slot {
                date,
                start_time: time,
                is_available: true,
            });
        }
        start += slot_minutes;
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(json: &str) -> BusinessHours {
        BusinessHours::from_json(json).unwrap()
    }

    fn weekday_hours() -> BusinessHours {
        hours(
            r#"{"days":[
                {"day":"mon","open":"09:00","close":"17:00"},
                {"day":"tue","open":"09:00","close":"17:00"},
                {"day":"wed","open":"09:00","close":"17:00"},
                {"day":"thu","open":"09:00","close":"17:00"},
                {"day":"fri","open":"09:00","close":"17:00"}
            ]}"#,
        )
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_closed_day_yields_empty() {
        // 2025-01-05 is a Sunday, no entry for sun
        let slots = available_slots(
            date("2025-01-05"),
            &weekday_hours(),
            &HashSet::new(),
            60,
            dt("2025-01-01 08:00"),
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn test_hourly_slots_exclude_booked() {
        // 2025-01-06 is a Monday
        let booked: HashSet<NaiveTime> = [time("10:00")].into_iter().collect();
        let slots = available_slots(
            date("2025-01-06"),
            &weekday_hours(),
            &booked,
            60,
            dt("2025-01-01 08:00"),
        );

        let times: Vec<String> = slots
            .iter()
            .map(|s| s.start_time.format("%H:%M").to_string())
            .collect();
        assert_eq!(
            times,
            vec!["09:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00"]
        );
    }

    #[test]
    fn test_no_slot_appears_in_booked_set() {
        let booked: HashSet<NaiveTime> =
            [time("09:00"), time("13:00"), time("16:00")].into_iter().collect();
        let slots = available_slots(
            date("2025-01-06"),
            &weekday_hours(),
            &booked,
            60,
            dt("2025-01-01 08:00"),
        );
        assert!(slots.iter().all(|s| !booked.contains(&s.start_time)));
    }

    #[test]
    fn test_ascending_order() {
        let slots = available_slots(
            date("2025-01-06"),
            &weekday_hours(),
            &HashSet::new(),
            30,
            dt("2025-01-01 08:00"),
        );
        assert!(slots.windows(2).all(|w| w[0].start_time < w[1].start_time));
    }

    #[test]
    fn test_slot_must_end_by_closing_time() {
        // 09:00-17:00 with 90-minute jobs: last start is 15:00 (ends 16:30);
        // 16:30 would run past close.
        let slots = available_slots(
            date("2025-01-06"),
            &weekday_hours(),
            &HashSet::new(),
            90,
            dt("2025-01-01 08:00"),
        );
        let last = slots.last().unwrap();
        assert_eq!(last.start_time, time("15:00"));
    }

    #[test]
    fn test_past_times_dropped_for_today() {
        let slots = available_slots(
            date("2025-01-06"),
            &weekday_hours(),
            &HashSet::new(),
            60,
            dt("2025-01-06 11:30"),
        );
        assert_eq!(slots.first().unwrap().start_time, time("12:00"));
    }

    #[test]
    fn test_other_days_unaffected_by_now() {
        let slots = available_slots(
            date("2025-01-07"),
            &weekday_hours(),
            &HashSet::new(),
            60,
            dt("2025-01-06 23:00"),
        );
        assert_eq!(slots.first().unwrap().start_time, time("09:00"));
    }

    #[test]
    fn test_fully_booked_day_is_empty_not_error() {
        let booked: HashSet<NaiveTime> = (9..17)
            .map(|h| NaiveTime::from_hms_opt(h, 0, 0).unwrap())
            .collect();
        let slots = available_slots(
            date("2025-01-06"),
            &weekday_hours(),
            &booked,
            60,
            dt("2025-01-01 08:00"),
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn test_zero_duration_yields_empty() {
        let slots = available_slots(
            date("2025-01-06"),
            &weekday_hours(),
            &HashSet::new(),
            0,
            dt("2025-01-01 08:00"),
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn test_restartable_same_inputs_same_output() {
        let booked: HashSet<NaiveTime> = [time("14:00")].into_iter().collect();
        let a = available_slots(
            date("2025-01-06"),
            &weekday_hours(),
            &booked,
            60,
            dt("2025-01-01 08:00"),
        );
        let b = available_slots(
            date("2025-01-06"),
            &weekday_hours(),
            &booked,
            60,
            dt("2025-01-01 08:00"),
        );
        assert_eq!(a, b);
    }
}
