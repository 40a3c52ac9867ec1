use chrono::{DateTime, Utc};

/// Age units from largest to smallest, in seconds, with their display
/// abbreviations. Months and years use the fixed 30/365-day approximations.
const UNITS: &[(i64, &str)] = &[
    (365 * 86_400, "y"),
    (30 * 86_400, "mo"),
    (7 * 86_400, "w"),
    (86_400, "d"),
    (3_600, "h"),
    (60, "m"),
    (1, "s"),
];

/// Formats the elapsed time since `from` as a compact age string
/// (`"5m"`, `"2h"`, `"1mo"`), using the largest unit with a value >= 1.
/// Anything under one second yields `"0s"`.
pub fn time_since(from: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - from).num_seconds().max(0);
    for &(unit_secs, abbrev) in UNITS {
        if secs >= unit_secs {
            return format!("{}{}", secs / unit_secs, abbrev);
        }
    }
    "0s".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(secs: i64) -> String {
        let now = Utc::now();
        time_since(now - Duration::seconds(secs), now)
    }

    #[test]
    fn sub_second_is_zero_seconds() {
        assert_eq!(at(0), "0s");
    }

    #[test]
    fn seconds_and_minutes() {
        assert_eq!(at(1), "1s");
        assert_eq!(at(59), "59s");
        assert_eq!(at(60), "1m");
        assert_eq!(at(59 * 60), "59m");
    }

    #[test]
    fn hours_days_weeks() {
        assert_eq!(at(3_600), "1h");
        assert_eq!(at(23 * 3_600), "23h");
        assert_eq!(at(86_400), "1d");
        assert_eq!(at(6 * 86_400), "6d");
        assert_eq!(at(7 * 86_400), "1w");
        assert_eq!(at(29 * 86_400), "4w");
    }

    #[test]
    fn months_and_years() {
        assert_eq!(at(30 * 86_400), "1mo");
        assert_eq!(at(11 * 30 * 86_400), "11mo");
        assert_eq!(at(365 * 86_400), "1y");
        assert_eq!(at(2 * 365 * 86_400), "2y");
    }

    #[test]
    fn future_timestamps_clamp_to_zero() {
        let now = Utc::now();
        assert_eq!(time_since(now + Duration::seconds(30), now), "0s");
    }
}
