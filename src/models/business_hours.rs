use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayHours {
    pub day: String,
    pub open: String,
    pub close: String,
}

/// Weekly opening hours, one entry per open day. Days with no entry are
/// closed. Stored as JSON in the settings row and validated on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessHours {
    pub days: Vec<DayHours>,
}

impl BusinessHours {
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let hours: BusinessHours = serde_json::from_str(s)?;
        for entry in &hours.days {
            parse_weekday(&entry.day)?;
            let open = parse_time(&entry.open)?;
            let close = parse_time(&entry.close)?;
            if open >= close {
                anyhow::bail!(
                    "opening time must be before closing time for {}: {} >= {}",
                    entry.day,
                    entry.open,
                    entry.close
                );
            }
        }
        Ok(hours)
    }

    /// Opening and closing times for the weekday of `date`, or `None` when
    /// the garage is closed that day.
    pub fn hours_for(&self, date: NaiveDate) -> Option<(NaiveTime, NaiveTime)> {
        let weekday = weekday_key(date);
        self.days.iter().find_map(|entry| {
            if entry.day.to_lowercase() == weekday {
                let open = NaiveTime::parse_from_str(&entry.open, "%H:%M").ok()?;
                let close = NaiveTime::parse_from_str(&entry.close, "%H:%M").ok()?;
                Some((open, close))
            } else {
                None
            }
        })
    }

    pub fn to_human_readable(&self) -> String {
        if self.days.is_empty() {
            return String::new();
        }

        let day_order = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

        let mut sorted = self.days.clone();
        sorted.sort_by_key(|entry| {
            day_order
                .iter()
                .position(|d| *d == entry.day.to_lowercase())
                .unwrap_or(7)
        });

        sorted
            .iter()
            .map(|entry| {
                let day = capitalize(&entry.day);
                format!("{day}: {}-{}", entry.open, entry.close)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn weekday_key(date: NaiveDate) -> String {
    match date.weekday() {
        chrono::Weekday::Mon => "mon",
        chrono::Weekday::Tue => "tue",
        chrono::Weekday::Wed => "wed",
        chrono::Weekday::Thu => "thu",
        chrono::Weekday::Fri => "fri",
        chrono::Weekday::Sat => "sat",
        chrono::Weekday::Sun => "sun",
    }
    .to_string()
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + &c.as_str().to_lowercase(),
    }
}

fn parse_weekday(s: &str) -> anyhow::Result<()> {
    match s.to_lowercase().as_str() {
        "mon" | "tue" | "wed" | "thu" | "fri" | "sat" | "sun" => Ok(()),
        _ => Err(anyhow::anyhow!("invalid weekday: {s}")),
    }
}

fn parse_time(s: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| anyhow::anyhow!("invalid time format: {s}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let json = r#"{"days":[{"day":"mon","open":"09:00","close":"17:00"},{"day":"sat","open":"09:00","close":"12:00"}]}"#;
        let hours = BusinessHours::from_json(json).unwrap();
        assert_eq!(hours.days.len(), 2);
        assert_eq!(hours.days[0].day, "mon");
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(BusinessHours::from_json("not json").is_err());
    }

    #[test]
    fn test_parse_invalid_day() {
        let json = r#"{"days":[{"day":"xyz","open":"09:00","close":"17:00"}]}"#;
        assert!(BusinessHours::from_json(json).is_err());
    }

    #[test]
    fn test_parse_invalid_time() {
        let json = r#"{"days":[{"day":"mon","open":"25:00","close":"17:00"}]}"#;
        assert!(BusinessHours::from_json(json).is_err());
    }

    #[test]
    fn test_parse_open_after_close() {
        let json = r#"{"days":[{"day":"mon","open":"17:00","close":"09:00"}]}"#;
        assert!(BusinessHours::from_json(json).is_err());
    }

    #[test]
    fn test_hours_for_open_day() {
        let json = r#"{"days":[{"day":"mon","open":"09:00","close":"17:00"}]}"#;
        let hours = BusinessHours::from_json(json).unwrap();
        // 2025-01-06 is a Monday
        let (open, close) = hours
            .hours_for(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap())
            .unwrap();
        assert_eq!(open, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(close, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
    }

    #[test]
    fn test_hours_for_closed_day() {
        let json = r#"{"days":[{"day":"mon","open":"09:00","close":"17:00"}]}"#;
        let hours = BusinessHours::from_json(json).unwrap();
        // 2025-01-05 is a Sunday
        assert!(hours
            .hours_for(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap())
            .is_none());
    }

    #[test]
    fn test_to_human_readable() {
        let json = r#"{"days":[{"day":"fri","open":"08:30","close":"17:30"},{"day":"mon","open":"08:30","close":"17:30"}]}"#;
        let hours = BusinessHours::from_json(json).unwrap();
        assert_eq!(
            hours.to_human_readable(),
            "Mon: 08:30-17:30, Fri: 08:30-17:30"
        );
    }

    #[test]
    fn test_to_human_readable_empty() {
        let hours = BusinessHours::from_json(r#"{"days":[]}"#).unwrap();
        assert_eq!(hours.to_human_readable(), "");
    }
}
