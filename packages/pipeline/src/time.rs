//! Relative time labels for popups and sidebar cards.

use auto_watch_report_models::ReportDate;
use chrono::{DateTime, Utc};

/// Label used when a report date has an unrecognized shape.
pub const UNKNOWN_TIME: &str = "Unknown time";

/// Formats `date` relative to `now` ("3 hours ago", "1 day ago").
///
/// Uses the largest whole unit among days, hours, minutes and seconds.
/// Dates too far from `now` to subtract render as [`UNKNOWN_TIME`].
#[must_use]
pub fn format_time_ago(date: &ReportDate, now: DateTime<Utc>) -> String {
    if !date.is_recognized() {
        return UNKNOWN_TIME.to_string();
    }

    let Some(diff_ms) = now.timestamp_millis().checked_sub(date.to_millis()) else {
        return UNKNOWN_TIME.to_string();
    };
    let seconds = diff_ms.div_euclid(1000);
    let minutes = seconds.div_euclid(60);
    let hours = minutes.div_euclid(60);
    let days = hours.div_euclid(24);

    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        plural(seconds, "second")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_000_000_000_000).unwrap()
    }

    fn ago(ms: i64) -> ReportDate {
        ReportDate::EpochMillis(1_000_000_000_000 - ms)
    }

    #[test]
    fn picks_largest_unit() {
        assert_eq!(format_time_ago(&ago(30_000), now()), "30 seconds ago");
        assert_eq!(format_time_ago(&ago(60_000), now()), "1 minute ago");
        assert_eq!(format_time_ago(&ago(2 * 3_600_000 + 5), now()), "2 hours ago");
        assert_eq!(format_time_ago(&ago(86_400_000), now()), "1 day ago");
        assert_eq!(format_time_ago(&ago(3 * 86_400_000), now()), "3 days ago");
    }

    #[test]
    fn zero_seconds_is_plural() {
        assert_eq!(format_time_ago(&ago(0), now()), "0 seconds ago");
        assert_eq!(format_time_ago(&ago(1_500), now()), "1 second ago");
    }

    #[test]
    fn out_of_range_seconds_are_unknown() {
        let ancient =
            ReportDate::from_value(serde_json::json!({"seconds": -10_000_000_000_000_000_i64}));
        assert_eq!(ancient.to_millis(), i64::MIN);
        assert_eq!(format_time_ago(&ancient, now()), UNKNOWN_TIME);
    }

    #[test]
    fn unknown_shape() {
        assert_eq!(format_time_ago(&ReportDate::default(), now()), UNKNOWN_TIME);
    }
}
