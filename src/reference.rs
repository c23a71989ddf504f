//! Reference instant and timezone handling
//!
//! Relative expressions ("next week", "3pm") resolve against a reference
//! instant observed in a particular zone. The zone is either a named IANA zone
//! or a fixed minute offset.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Error, Result};

/// How the caller describes the reference timezone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimezoneSpec {
    /// IANA zone name, e.g. `"Europe/Berlin"`
    Named(String),
    /// Minutes east of UTC, e.g. `-300` for UTC-5
    OffsetMinutes(i32),
}

impl TimezoneSpec {
    /// Resolve into a zone usable for calendar arithmetic
    pub fn resolve(&self) -> Result<Zone> {
        match self {
            TimezoneSpec::Named(name) => name
                .parse::<Tz>()
                .map(Zone::Named)
                .map_err(|_| Error::UnknownTimezone(name.clone())),
            TimezoneSpec::OffsetMinutes(minutes) => fixed_offset(*minutes).map(Zone::Fixed),
        }
    }
}

impl FromStr for TimezoneSpec {
    type Err = Error;

    /// `"+120"`, `"-300"` or `"0"` become offsets; anything else is a zone name
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::UnknownTimezone(s.to_string()));
        }

        match s.parse::<i32>() {
            Ok(minutes) => Ok(TimezoneSpec::OffsetMinutes(minutes)),
            Err(_) => Ok(TimezoneSpec::Named(s.to_string())),
        }
    }
}

/// A resolved timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Fixed(FixedOffset),
    Named(Tz),
}

impl Zone {
    /// UTC offset in effect at `instant`
    pub fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        match self {
            Zone::Fixed(offset) => *offset,
            Zone::Named(tz) => tz.offset_from_utc_datetime(&instant.naive_utc()).fix(),
        }
    }

    /// Attach this zone to local wall-clock fields
    ///
    /// Ambiguous local times (DST fold) take the earlier mapping; times inside
    /// a DST gap do not exist and yield `None`.
    pub fn localize(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Zone::Fixed(offset) => offset.from_local_datetime(&local).single(),
            Zone::Named(tz) => tz
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.fixed_offset()),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Fixed(offset) => write!(f, "{}", offset),
            Zone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

/// The "now" that relative expressions are resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceInstant {
    instant: DateTime<Utc>,
    zone: Zone,
}

impl ReferenceInstant {
    /// Reference at `instant`, observed in the zone described by `timezone`
    pub fn new(instant: DateTime<Utc>, timezone: &TimezoneSpec) -> Result<Self> {
        Ok(Self {
            instant,
            zone: timezone.resolve()?,
        })
    }

    /// Reference observed in the fixed offset carried by `instant`
    pub fn from_fixed(instant: DateTime<FixedOffset>) -> Self {
        Self {
            instant: instant.with_timezone(&Utc),
            zone: Zone::Fixed(*instant.offset()),
        }
    }

    /// Reference observed in UTC
    pub fn utc(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            zone: Zone::Fixed(Utc.fix()),
        }
    }

    /// Reference given as local wall-clock fields in `timezone`
    pub fn from_local(local: NaiveDateTime, timezone: &TimezoneSpec) -> Result<Self> {
        let zone = timezone.resolve()?;
        let instant = zone
            .localize(local)
            .ok_or_else(|| Error::InvalidReference(format!("{} does not exist in {}", local, zone)))?;

        Ok(Self {
            instant: instant.with_timezone(&Utc),
            zone,
        })
    }

    /// Parse a reference written as RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` or
    /// `YYYY-MM-DD` (midnight)
    ///
    /// RFC 3339 input carries its own instant and is observed in `timezone`;
    /// the other forms are local wall-clock fields in `timezone`.
    pub fn parse(text: &str, timezone: &TimezoneSpec) -> Result<Self> {
        let text = text.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
            return Self::new(instant.with_timezone(&Utc), timezone);
        }

        let local = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(|| {
                Error::InvalidDateExpression(format!("Unable to parse reference: {}", text))
            })?;

        Self::from_local(local, timezone)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// The reference as seen on a wall clock in its zone
    pub fn to_local(&self) -> DateTime<FixedOffset> {
        self.instant.with_timezone(&self.zone.offset_at(self.instant))
    }

    /// Local calendar fields of the reference
    pub fn local(&self) -> NaiveDateTime {
        self.to_local().naive_local()
    }

    /// Offset of the reference zone at the reference instant, in minutes
    pub fn offset_minutes(&self) -> i32 {
        self.zone.offset_at(self.instant).local_minus_utc() / 60
    }

    /// Turn local fields into an instant
    ///
    /// An explicit offset (minutes east of UTC) wins over the reference zone.
    pub fn localize(
        &self,
        local: NaiveDateTime,
        offset_minutes: Option<i32>,
    ) -> Option<DateTime<FixedOffset>> {
        match offset_minutes {
            Some(minutes) => fixed_offset(minutes).ok()?.from_local_datetime(&local).single(),
            None => self.zone.localize(local),
        }
    }
}

fn fixed_offset(minutes: i32) -> Result<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or(Error::InvalidOffset(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_timezone_spec() {
        assert_eq!("+120".parse::<TimezoneSpec>().unwrap(), TimezoneSpec::OffsetMinutes(120));
        assert_eq!("-300".parse::<TimezoneSpec>().unwrap(), TimezoneSpec::OffsetMinutes(-300));
        assert_eq!(
            "Europe/Berlin".parse::<TimezoneSpec>().unwrap(),
            TimezoneSpec::Named("Europe/Berlin".to_string())
        );
        assert!("  ".parse::<TimezoneSpec>().is_err());
    }

    #[test]
    fn test_resolve_unknown_zone() {
        let spec = TimezoneSpec::Named("Mars/Olympus_Mons".to_string());
        assert_eq!(
            spec.resolve(),
            Err(Error::UnknownTimezone("Mars/Olympus_Mons".to_string()))
        );
    }

    #[test]
    fn test_resolve_offset_out_of_range() {
        let spec = TimezoneSpec::OffsetMinutes(24 * 60);
        assert_eq!(spec.resolve(), Err(Error::InvalidOffset(1440)));
    }

    #[test]
    fn test_local_fields_follow_named_zone() {
        let instant = Utc.with_ymd_and_hms(2024, 12, 30, 23, 30, 0).unwrap();
        let reference =
            ReferenceInstant::new(instant, &TimezoneSpec::Named("Europe/Berlin".to_string()))
                .unwrap();

        assert_eq!(reference.local(), local(2024, 12, 31, 0, 30));
        assert_eq!(reference.offset_minutes(), 60);
    }

    #[test]
    fn test_from_local_rejects_dst_gap() {
        let spec = TimezoneSpec::Named("Europe/Berlin".to_string());
        let result = ReferenceInstant::from_local(local(2024, 3, 31, 2, 30), &spec);
        assert!(matches!(result, Err(Error::InvalidReference(_))));
    }

    #[test]
    fn test_localize_prefers_explicit_offset() {
        let reference = ReferenceInstant::utc(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let resolved = reference
            .localize(local(2024, 6, 1, 12, 0), Some(120))
            .unwrap();
        assert_eq!(resolved.offset().local_minus_utc(), 7200);
        assert_eq!(resolved.with_timezone(&Utc).naive_utc(), local(2024, 6, 1, 10, 0));
    }

    #[test]
    fn test_parse_reference_text() {
        let utc = TimezoneSpec::OffsetMinutes(0);
        let reference = ReferenceInstant::parse("2023-01-15", &utc).unwrap();
        assert_eq!(reference.local(), local(2023, 1, 15, 0, 0));

        let reference = ReferenceInstant::parse("2023-01-15T09:30", &TimezoneSpec::OffsetMinutes(60)).unwrap();
        assert_eq!(reference.instant(), Utc.with_ymd_and_hms(2023, 1, 15, 8, 30, 0).unwrap());

        let reference = ReferenceInstant::parse("2023-01-15T09:30:00-05:00", &utc).unwrap();
        assert_eq!(reference.local(), local(2023, 1, 15, 14, 30));

        assert!(matches!(
            ReferenceInstant::parse("next tuesday", &utc),
            Err(Error::InvalidDateExpression(_))
        ));
    }

    #[test]
    fn test_from_fixed_keeps_offset() {
        let fixed = FixedOffset::east_opt(-5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2023, 1, 15, 8, 0, 0)
            .unwrap();
        let reference = ReferenceInstant::from_fixed(fixed);
        assert_eq!(reference.local(), local(2023, 1, 15, 8, 0));
        assert_eq!(reference.offset_minutes(), -300);
        assert_eq!(reference.to_local(), fixed);
    }
}
