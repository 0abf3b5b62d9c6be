//! Extensions to serde for deserializing foreign types.
//!
//! The YouTube Data API sends 64-bit counters as decimal strings and
//! durations as ISO-8601 strings. This module provides deserializers that
//! turn those into [u64](std::u64) and [chrono::Duration].

use serde::{
    de::{Error, Visitor},
    Deserializer,
};

pub mod number {
    //! Extensions for reading counters that may arrive either as strings
    //! or as JSON numbers.

    use super::*;
    use std::fmt;

    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = u64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "an unsigned count as a string or number")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if v < 0 {
                return Err(E::custom(format!("negative count {}", v)));
            }
            Ok(v as u64)
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            v.trim().parse().map_err(E::custom)
        }
    }

    struct CountOptionVisitor;

    impl<'de> Visitor<'de> for CountOptionVisitor {
        type Value = Option<u64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "an optional unsigned count")
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            Ok(Some(deserializer.deserialize_any(CountVisitor)?))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(None)
        }
    }

    pub fn from_str_option<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(CountOptionVisitor)
    }
}

pub mod duration {
    //! Extensions for parsing ISO-8601 [Durations](Duration) such as
    //! `PT4M13S` or `P1DT2H`.

    use super::*;
    use chrono::Duration;
    use serde::Deserialize;

    const SECS_PER_WEEK: f64 = 604_800.0;
    const SECS_PER_DAY: f64 = 86_400.0;
    // Gregorian averages, matching what `span` uses to break spans apart.
    const SECS_PER_MONTH: f64 = SECS_PER_DAY * 146_097.0 / 4_800.0;
    const SECS_PER_YEAR: f64 = SECS_PER_MONTH * 12.0;

    /// Parse an ISO-8601 duration into a [Duration]. Fractional values are
    /// allowed on any component and are kept to millisecond precision.
    pub fn parse(s: &str) -> Result<Duration, String> {
        let s = s.trim();
        let body = s
            .strip_prefix('P')
            .or_else(|| s.strip_prefix('p'))
            .ok_or_else(|| format!("duration {:?} does not start with P", s))?;

        let mut in_time = false;
        let mut seen_component = false;
        let mut number = String::new();
        let mut total = 0f64;

        for c in body.chars() {
            match c.to_ascii_uppercase() {
                'T' => {
                    if in_time || !number.is_empty() {
                        return Err(format!("misplaced T in duration {:?}", s));
                    }
                    in_time = true;
                }
                d if d.is_ascii_digit() || d == '.' || d == ',' => {
                    number.push(if d == ',' { '.' } else { d })
                }
                unit => {
                    let value: f64 = number
                        .parse()
                        .map_err(|_| format!("missing value before {} in {:?}", unit, s))?;
                    number.clear();
                    seen_component = true;

                    total += value
                        * match (in_time, unit) {
                            (false, 'Y') => SECS_PER_YEAR,
                            (false, 'M') => SECS_PER_MONTH,
                            (false, 'W') => SECS_PER_WEEK,
                            (false, 'D') => SECS_PER_DAY,
                            (true, 'H') => 3_600.0,
                            (true, 'M') => 60.0,
                            (true, 'S') => 1.0,
                            _ => return Err(format!("unexpected unit {} in {:?}", unit, s)),
                        };
                }
            }
        }

        if !number.is_empty() {
            return Err(format!("trailing number without unit in {:?}", s));
        }
        if !seen_component {
            return Err(format!("duration {:?} has no components", s));
        }

        Ok(Duration::milliseconds((total * 1_000.0).round() as i64))
    }

    pub fn from_iso8601_option<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Deserialize::deserialize(deserializer)?;
        s.map(|s| parse(&s).map_err(D::Error::custom)).transpose()
    }
}

#[cfg(test)]
mod test {
    use super::duration::parse;
    use chrono::Duration;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Counts {
        #[serde(default, deserialize_with = "super::number::from_str_option")]
        likes: Option<u64>,
        #[serde(default, deserialize_with = "super::number::from_str_option")]
        views: Option<u64>,
    }

    #[test]
    fn counts_from_strings_and_numbers() {
        let c: Counts = serde_json::from_str(r#"{"likes":"1200","views":7}"#).unwrap();
        assert_eq!(c.likes, Some(1200));
        assert_eq!(c.views, Some(7));

        let c: Counts = serde_json::from_str(r#"{"views":"0"}"#).unwrap();
        assert_eq!(c.likes, None);
        assert_eq!(c.views, Some(0));

        let c: Counts = serde_json::from_str(r#"{"likes":null}"#).unwrap();
        assert_eq!(c.likes, None);

        assert!(serde_json::from_str::<Counts>(r#"{"views":"many"}"#).is_err());
    }

    #[test]
    fn iso8601_video_durations() {
        assert_eq!(parse("PT4M13S").unwrap(), Duration::seconds(253));
        assert_eq!(parse("PT1H").unwrap(), Duration::hours(1));
        assert_eq!(parse("P1DT2H3M4S").unwrap(), Duration::seconds(93_784));
        assert_eq!(parse("PT1.5S").unwrap(), Duration::milliseconds(1_500));
        assert_eq!(parse("P0D").unwrap(), Duration::zero());
        assert_eq!(parse("P2W").unwrap(), Duration::days(14));
    }

    #[test]
    fn iso8601_rejects_garbage() {
        assert!(parse("").is_err());
        assert!(parse("4M13S").is_err());
        assert!(parse("P").is_err());
        assert!(parse("PT5").is_err());
        assert!(parse("P5H").is_err());
        assert!(parse("PTT1S").is_err());
    }
}
