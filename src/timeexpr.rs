//! Time expressions accepted on the command line.
//!
//! `now`, RFC 3339 instants, and offsets from either:
//! `T+10m`, `now-1h`, `2024-01-01T00:00:00Z + 1d`.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeExpr {
    Absolute(DateTime<Utc>),
    /// Offset from the moment the expression is resolved.
    Relative(Duration),
}

impl TimeExpr {
    pub fn resolve(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match *self {
            TimeExpr::Absolute(time) => time,
            TimeExpr::Relative(offset) => now + offset,
        }
    }
}

impl FromStr for TimeExpr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time(s)
    }
}

pub fn parse_time(s: &str) -> Result<TimeExpr, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty time expression".into());
    }

    // Relative: T+10s, now-5m, now
    let lower = s.to_lowercase();
    let relative = lower
        .strip_prefix("now")
        .or_else(|| lower.strip_prefix('t'));
    if let Some(rest) = relative {
        let rest = rest.trim();
        if rest.is_empty() {
            return Ok(TimeExpr::Relative(Duration::zero()));
        }
        return signed_offset(rest).map(TimeExpr::Relative);
    }

    // Absolute with offset: 2026-01-12T10:00:00Z - 10s
    if let Some(idx) = s.rfind(['+', '-']) {
        if idx > 10 {
            if let Ok(base) = DateTime::parse_from_rfc3339(s[..idx].trim()) {
                let offset = signed_offset(&s[idx..])?;
                return Ok(TimeExpr::Absolute(base.with_timezone(&Utc) + offset));
            }
        }
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| TimeExpr::Absolute(dt.with_timezone(&Utc)))
        .map_err(|e| format!("invalid time {:?}: {}", s, e))
}

fn signed_offset(s: &str) -> Result<Duration, String> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => match s.strip_prefix('+') {
            Some(rest) => (false, rest),
            None => return Err(format!("expected +/- offset, got {:?}", s)),
        },
    };
    let duration = parse_duration(rest)?;
    Ok(if negative { -duration } else { duration })
}

pub fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| Duration::from_std(d).map_err(|e| e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_relative() {
        assert_eq!(parse_time("now").unwrap().resolve(now()), now());
        assert_eq!(
            parse_time("T+10s").unwrap(),
            TimeExpr::Relative(Duration::seconds(10))
        );
        assert_eq!(
            parse_time("now + 2h").unwrap().resolve(now()),
            now() + Duration::hours(2)
        );
        assert_eq!(
            parse_time("t-5m").unwrap(),
            TimeExpr::Relative(Duration::minutes(-5))
        );
    }

    #[test]
    fn test_absolute() {
        let expr: TimeExpr = "2024-05-01T12:00:00Z".parse().unwrap();
        assert_eq!(expr.resolve(Utc::now()), now());

        let shifted = parse_time("2024-05-01T12:00:00Z + 1day").unwrap();
        assert_eq!(shifted, TimeExpr::Absolute(now() + Duration::days(1)));

        let offset = parse_time("2024-05-01T14:00:00+02:00").unwrap();
        assert_eq!(offset, TimeExpr::Absolute(now()));
    }

    #[test]
    fn test_invalid() {
        assert!(parse_time("").is_err());
        assert!(parse_time("tomorrow").is_err());
        assert!(parse_time("now 5m").is_err());
        assert!(parse_duration("ten minutes").is_err());
    }
}
