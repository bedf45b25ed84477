use crate::error::{calendar_error, AppResult, Error};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::models::EventTime;

/// Compute the UTC bounds of the local civil day containing `now_local`:
/// local 00:00:00.000000 through 23:59:59.999999, expressed in UTC.
pub fn day_window_utc(now_local: DateTime<Tz>) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let tz = now_local.timezone();
    let date = now_local.date_naive();

    let start = date
        .and_hms_micro_opt(0, 0, 0, 0)
        .ok_or_else(|| calendar_error("Failed to create day start"))?;
    let end = date
        .and_hms_micro_opt(23, 59, 59, 999_999)
        .ok_or_else(|| calendar_error("Failed to create day end"))?;

    let start = resolve_local(&tz, &start)?;
    let end = resolve_local(&tz, &end)?;

    Ok((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

fn resolve_local(tz: &Tz, naive: &NaiveDateTime) -> AppResult<DateTime<Tz>> {
    match tz.from_local_datetime(naive) {
        chrono::LocalResult::Single(dt) => Ok(dt),
        chrono::LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        chrono::LocalResult::None => Err(calendar_error("Invalid local time")),
    }
}

/// Parse an ISO-8601 instant into UTC. A trailing `Z` is accepted; a naive
/// timestamp without an offset is interpreted as UTC.
pub fn parse_instant(value: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    // No offset at all (e.g. "2024-05-01T09:00:00")
    if let Ok(naive) = value.parse::<NaiveDateTime>() {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    Err(Error::MalformedTimestamp(value.to_string()))
}

/// Normalize a provider start/end value to the civil timezone. A bare date
/// (all-day event) stays a date; everything else becomes a zoned date-time.
pub fn to_local(value: &str, tz: Tz) -> AppResult<EventTime> {
    if !value.contains('T') {
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| Error::MalformedTimestamp(value.to_string()))?;
        return Ok(EventTime::Date(date));
    }

    let instant = parse_instant(value)?;
    Ok(EventTime::DateTime(instant.with_timezone(&tz)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::Asia::Seoul;

    #[test]
    fn test_day_window_utc() {
        // 2024-05-01 15:30 KST
        let now = Seoul.with_ymd_and_hms(2024, 5, 1, 15, 30, 0).unwrap();
        let (start, end) = day_window_utc(now).unwrap();

        // Local midnight is 15:00 UTC the previous day (KST = UTC+9)
        assert_eq!(start.to_rfc3339(), "2024-04-30T15:00:00+00:00");
        assert_eq!(end.with_timezone(&Seoul).hour(), 23);
        assert_eq!(end.with_timezone(&Seoul).minute(), 59);
        assert!(start < end);
    }

    #[test]
    fn test_parse_instant_z_suffix() {
        let dt = parse_instant("2024-05-01T09:00:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T09:00:00+00:00");
    }

    #[test]
    fn test_parse_instant_naive_defaults_to_utc() {
        let dt = parse_instant("2024-05-01T09:00:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T09:00:00+00:00");
    }

    #[test]
    fn test_parse_instant_malformed() {
        assert!(matches!(
            parse_instant("yesterday at noon"),
            Err(Error::MalformedTimestamp(_))
        ));
    }

    #[test]
    fn test_to_local_round_trip() {
        // UTC instant with trailing Z, normalized to KST and back
        let local = to_local("2024-05-01T09:00:00Z", Seoul).unwrap();
        match local {
            EventTime::DateTime(dt) => {
                assert_eq!(dt.to_rfc3339(), "2024-05-01T18:00:00+09:00");
                assert_eq!(dt.with_timezone(&Utc).to_rfc3339(), "2024-05-01T09:00:00+00:00");
            }
            EventTime::Date(_) => panic!("expected a date-time"),
        }
    }

    #[test]
    fn test_to_local_all_day_event() {
        let local = to_local("2024-05-01", Seoul).unwrap();
        assert_eq!(local, EventTime::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));
        assert_eq!(local.iso8601(), "2024-05-01");
    }
}
