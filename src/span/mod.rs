//! Human-readable spans of time.
//!
//! Spans are broken apart the way a calendar reader expects: months and
//! years use the Gregorian average of 146097 days per 4800 months, so a
//! span of 31 days reads as one month.

use chrono::{DateTime, Duration, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;
const DAYS_PER_MONTH: f64 = 146_097.0 / 4_800.0;

/// Absolute difference between two instants.
pub fn between(a: DateTime<Utc>, b: DateTime<Utc>) -> Duration {
    if a < b {
        b - a
    } else {
        a - b
    }
}

/// Components of a span, largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Parts {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub millis: i64,
}

impl Parts {
    pub fn of(d: Duration) -> Self {
        let total = d.num_milliseconds().abs();

        let millis = total % 1_000;
        let secs = total / 1_000;
        let mins = secs / 60;
        let hours = mins / 60;
        let days = hours / 24;

        let months = days * 4_800 / 146_097;
        let month_days = (months * 146_097 + 4_799) / 4_800;

        Self {
            years: months / 12,
            months: months % 12,
            days: days - month_days,
            hours: hours % 24,
            minutes: mins % 60,
            seconds: secs % 60,
            millis,
        }
    }
}

/// Format a span as e.g. `1y 2mo 3d 4h 5m 6s`, skipping zero components.
/// Milliseconds are only shown when `include_ms` is set. An empty span
/// formats as `0s`.
pub fn format(d: Duration, include_ms: bool) -> String {
    let p = Parts::of(d);
    let components = [
        (p.years, "y"),
        (p.months, "mo"),
        (p.days, "d"),
        (p.hours, "h"),
        (p.minutes, "m"),
        (p.seconds, "s"),
        (if include_ms { p.millis } else { 0 }, "ms"),
    ];

    let out: Vec<String> = components
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{}{}", n, unit))
        .collect();

    if out.is_empty() {
        "0s".to_string()
    } else {
        out.join(" ")
    }
}

/// Relative age of `t` as seen from `now`, e.g. `3 days ago` or
/// `in an hour`.
pub fn from_now(t: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let ms = between(t, now).num_milliseconds() as f64;

    let seconds = (ms / 1_000.0).round() as i64;
    let minutes = (ms / 60_000.0).round() as i64;
    let hours = (ms / 3_600_000.0).round() as i64;
    let days = (ms / MS_PER_DAY).round() as i64;
    let months = (ms / MS_PER_DAY / DAYS_PER_MONTH).round() as i64;
    let years = (ms / MS_PER_DAY / DAYS_PER_MONTH / 12.0).round() as i64;

    let phrase = if seconds < 45 {
        "a few seconds".to_string()
    } else if minutes <= 1 {
        "a minute".to_string()
    } else if minutes < 45 {
        format!("{} minutes", minutes)
    } else if hours <= 1 {
        "an hour".to_string()
    } else if hours < 22 {
        format!("{} hours", hours)
    } else if days <= 1 {
        "a day".to_string()
    } else if days < 26 {
        format!("{} days", days)
    } else if months <= 1 {
        "a month".to_string()
    } else if months < 11 {
        format!("{} months", months)
    } else if years <= 1 {
        "a year".to_string()
    } else {
        format!("{} years", years)
    };

    if t > now {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

/// RFC 7231 style date, e.g. `Tue, 05 Mar 2019 14:00:00 GMT`.
pub fn utc_string(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn between_is_symmetric() {
        let a = at("2020-01-01T00:00:00Z");
        let b = at("2020-01-01T01:30:00Z");
        assert_eq!(between(a, b), Duration::minutes(90));
        assert_eq!(between(b, a), Duration::minutes(90));
    }

    #[test]
    fn format_skips_zero_components() {
        assert_eq!(format(Duration::seconds(253), false), "4m 13s");
        assert_eq!(format(Duration::hours(1), false), "1h");
        assert_eq!(format(Duration::seconds(93_784), false), "1d 2h 3m 4s");
        assert_eq!(format(Duration::zero(), false), "0s");
        assert_eq!(format(Duration::milliseconds(250), false), "0s");
        assert_eq!(format(Duration::milliseconds(1_250), true), "1s 250ms");
    }

    #[test]
    fn format_rolls_days_into_months_and_years() {
        assert_eq!(format(Duration::days(31), false), "1mo");
        assert_eq!(format(Duration::days(60), false), "1mo 29d");
        assert_eq!(format(Duration::days(366), false), "1y");
    }

    #[test]
    fn relative_ages() {
        let now = at("2021-06-15T12:00:00Z");
        assert_eq!(from_now(now, now), "a few seconds ago");
        assert_eq!(from_now(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(from_now(now + Duration::minutes(60), now), "in an hour");
        assert_eq!(from_now(now - Duration::days(3), now), "3 days ago");
        assert_eq!(from_now(now - Duration::days(40), now), "a month ago");
        assert_eq!(from_now(now - Duration::days(365 * 4), now), "4 years ago");
    }

    #[test]
    fn utc_strings() {
        let t = Utc.with_ymd_and_hms(2019, 3, 5, 14, 0, 0).unwrap();
        assert_eq!(utc_string(t), "Tue, 05 Mar 2019 14:00:00 GMT");
    }
}
