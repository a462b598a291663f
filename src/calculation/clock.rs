//! Timezone-aware conversion between local wall-clock time and absolute instants.
//!
//! Offsets are resolved by chrono-tz at the specific local date and time, so
//! daylight-saving transitions are honoured rather than assuming a fixed
//! offset for the zone.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, EngineResult};

/// Converts between local time in one IANA zone and UTC.
///
/// # Example
///
/// ```
/// use timesheet_engine::calculation::ZoneClock;
/// use chrono::NaiveDateTime;
///
/// let clock = ZoneClock::new("Europe/Berlin").unwrap();
/// let local = NaiveDateTime::parse_from_str("2026-01-15 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let instant = clock.to_absolute(local).unwrap();
/// assert_eq!(instant.to_rfc3339(), "2026-01-15T08:00:00+00:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneClock {
    tz: Tz,
}

impl ZoneClock {
    /// Creates a clock for the named IANA zone (e.g. "Australia/Adelaide").
    pub fn new(name: &str) -> EngineResult<Self> {
        let tz = name
            .trim()
            .parse::<Tz>()
            .map_err(|_| EngineError::UnknownTimezone {
                name: name.to_string(),
            })?;
        Ok(Self { tz })
    }

    /// A clock for UTC.
    pub fn utc() -> Self {
        Self { tz: Tz::UTC }
    }

    /// The zone's IANA identifier.
    pub fn name(&self) -> &'static str {
        self.tz.name()
    }

    /// Resolves a local wall-clock time to an absolute instant.
    ///
    /// A time repeated by a DST fall-back resolves to its earlier occurrence.
    /// A time skipped by a spring-forward gap is rejected.
    pub fn to_absolute(&self, local: NaiveDateTime) -> EngineResult<DateTime<Utc>> {
        match self.tz.from_local_datetime(&local) {
            LocalResult::Single(resolved) => Ok(resolved.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
            LocalResult::None => Err(EngineError::NonexistentLocalTime {
                local,
                timezone: self.name().to_string(),
            }),
        }
    }

    /// Expresses an absolute instant as local wall-clock time.
    pub fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.tz).naive_local()
    }

    /// Today's date in the zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_unknown_zone_rejected() {
        let err = ZoneClock::new("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, EngineError::UnknownTimezone { .. }));
    }

    #[test]
    fn test_utc_is_identity() {
        let clock = ZoneClock::new("UTC").unwrap();
        assert_eq!(
            clock.to_absolute(local("2026-01-15 09:00:00")).unwrap(),
            utc("2026-01-15T09:00:00Z")
        );
    }

    #[test]
    fn test_offset_follows_season() {
        let clock = ZoneClock::new("Europe/Berlin").unwrap();
        // CET in winter, CEST in summer
        assert_eq!(
            clock.to_absolute(local("2026-01-15 12:00:00")).unwrap(),
            utc("2026-01-15T11:00:00Z")
        );
        assert_eq!(
            clock.to_absolute(local("2026-07-15 12:00:00")).unwrap(),
            utc("2026-07-15T10:00:00Z")
        );
    }

    #[test]
    fn test_half_hour_zone() {
        let clock = ZoneClock::new("Australia/Adelaide").unwrap();
        // ACDT (+10:30) in January
        assert_eq!(
            clock.to_absolute(local("2026-01-15 09:00:00")).unwrap(),
            utc("2026-01-14T22:30:00Z")
        );
    }

    #[test]
    fn test_spring_forward_gap_rejected() {
        let clock = ZoneClock::new("Europe/Berlin").unwrap();
        let err = clock.to_absolute(local("2026-03-29 02:30:00")).unwrap_err();
        assert!(matches!(err, EngineError::NonexistentLocalTime { .. }));
    }

    #[test]
    fn test_fall_back_resolves_to_earliest() {
        let clock = ZoneClock::new("Europe/Berlin").unwrap();
        // 02:30 occurs twice on 2026-10-25; the first is still CEST (+02:00)
        assert_eq!(
            clock.to_absolute(local("2026-10-25 02:30:00")).unwrap(),
            utc("2026-10-25T00:30:00Z")
        );
    }

    #[test]
    fn test_to_local_round_trip() {
        let clock = ZoneClock::new("Australia/Adelaide").unwrap();
        let wall = local("2026-01-15 22:00:00");
        let instant = clock.to_absolute(wall).unwrap();
        assert_eq!(clock.to_local(instant), wall);
    }

    #[test]
    fn test_name() {
        assert_eq!(ZoneClock::new("Europe/Berlin").unwrap().name(), "Europe/Berlin");
    }
}
