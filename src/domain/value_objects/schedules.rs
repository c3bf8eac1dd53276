use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

/// Offset-less layouts accepted for `scheduled_at`, read as UTC. The last one is what
/// browser `datetime-local` inputs submit.
const NAIVE_LAYOUTS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Result of reading a stored `scheduled_at` value. A malformed value is never an
/// error for the caller: it becomes `Skip` and the post keeps its current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(DateTime<Utc>),
    Skip { raw: String, reason: String },
}

impl ParseOutcome {
    pub fn parsed(&self) -> Option<DateTime<Utc>> {
        match self {
            ParseOutcome::Parsed(at) => Some(*at),
            ParseOutcome::Skip { .. } => None,
        }
    }
}

pub fn parse_scheduled_at(raw: &str) -> ParseOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParseOutcome::Skip {
            raw: raw.to_string(),
            reason: "empty timestamp".to_string(),
        };
    }

    let normalized = match trimmed.strip_suffix(['Z', 'z']) {
        Some(stripped) => format!("{}+00:00", stripped),
        None => trimmed.to_string(),
    };

    let rfc3339_error = match DateTime::parse_from_rfc3339(&normalized) {
        Ok(at) => return ParseOutcome::Parsed(at.with_timezone(&Utc)),
        Err(err) => err,
    };

    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, layout) {
            return ParseOutcome::Parsed(naive.and_utc());
        }
    }

    ParseOutcome::Skip {
        raw: raw.to_string(),
        reason: rfc3339_error.to_string(),
    }
}

/// The instant stored next to the raw text. Unparsable input stores nothing.
pub fn scheduled_instant(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|raw| parse_scheduled_at(raw).parsed())
}

/// Row counts over an owner's `scheduled` posts that carry a `scheduled_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduledCounts {
    pub total: i64,
    pub parsable: i64,
    pub due: i64,
}

/// Midnight UTC on the first day of the month containing `now`.
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .and_then(|first| first.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

pub fn is_due(scheduled_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    scheduled_at <= now
}

pub fn seconds_until_due(scheduled_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (scheduled_at - now).num_seconds().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn parses_zulu_suffix() {
        let outcome = parse_scheduled_at("2025-03-10T09:30:00Z");
        assert_eq!(
            outcome,
            ParseOutcome::Parsed(Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap())
        );
    }

    #[test]
    fn parses_fixed_offset_into_utc() {
        let outcome = parse_scheduled_at("2025-03-10T16:30:00+07:00");
        assert_eq!(
            outcome.parsed(),
            Some(Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap())
        );
    }

    #[test]
    fn reads_naive_timestamps_as_utc() {
        let outcome = parse_scheduled_at("2025-03-10T09:30:00.123456");
        let expected = Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap()
            + Duration::microseconds(123_456);
        assert_eq!(outcome.parsed(), Some(expected));

        let minutes_only = parse_scheduled_at("2025-03-10T09:30");
        assert_eq!(
            minutes_only.parsed(),
            Some(Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap())
        );
    }

    #[test]
    fn malformed_values_are_skipped() {
        for raw in ["tomorrow morning", "", "2025-13-40T99:00:00Z"] {
            match parse_scheduled_at(raw) {
                ParseOutcome::Skip { raw: kept, .. } => assert_eq!(kept, raw),
                other => panic!("expected skip for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn start_of_month_truncates_to_first_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 2, 17, 13, 45, 12).unwrap();
        assert_eq!(
            start_of_month(now),
            Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn due_time_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2025, 2, 17, 13, 0, 0).unwrap();
        assert!(is_due(now, now));
        assert!(is_due(now - Duration::seconds(1), now));
        assert!(!is_due(now + Duration::seconds(1), now));
    }

    #[test]
    fn seconds_until_due_clamps_at_zero() {
        let now = Utc.with_ymd_and_hms(2025, 2, 17, 13, 0, 0).unwrap();
        assert_eq!(seconds_until_due(now + Duration::hours(1), now), 3600);
        assert_eq!(seconds_until_due(now - Duration::hours(1), now), 0);
    }

    #[test]
    fn scheduled_instant_drops_unparsable_text() {
        assert_eq!(
            scheduled_instant(Some("2025-02-17T13:00:00Z")),
            Some(Utc.with_ymd_and_hms(2025, 2, 17, 13, 0, 0).unwrap())
        );
        assert_eq!(scheduled_instant(Some("tomorrow-ish")), None);
        assert_eq!(scheduled_instant(None), None);
    }
}
