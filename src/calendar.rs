//! Calendar math
//!
//! Pure conversions between calendar dates, ISO 8601 week dates and whole-week
//! offsets. Weeks start on Monday and week 1 of a week-year is the week that
//! contains the year's first Thursday (equivalently, 4 January).
//!
//! The week algorithms are implemented here rather than taken from chrono so
//! that boundary behavior stays pinned to this convention.

use std::fmt;

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime};

/// An ISO 8601 week number together with the week-year it belongs to
///
/// The week-year can differ from the calendar year of the days in the week:
/// 30 December 2024 is in week 1 of 2025.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoWeek {
    pub week: u32,
    pub week_year: i32,
}

impl IsoWeek {
    pub fn new(week: u32, week_year: i32) -> Self {
        Self { week, week_year }
    }

    /// Monday of this week
    pub fn monday(&self) -> Option<NaiveDate> {
        week_start(self.week, self.week_year)
    }

    /// Sunday of this week
    pub fn sunday(&self) -> Option<NaiveDate> {
        self.monday()?.checked_add_days(Days::new(6))
    }

    /// Whether the week number exists in its week-year
    pub fn is_valid(&self) -> bool {
        self.week >= 1 && self.week <= weeks_in_year(self.week_year)
    }
}

impl fmt::Display for IsoWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.week_year, self.week)
    }
}

/// Monday of ISO week `iso_week` in week-year `iso_week_year`
///
/// Returns `None` for week numbers outside 1..=53 or dates chrono cannot
/// represent. Week 53 of a year that only has 52 weeks is plain arithmetic:
/// the Monday seven days after week 52, i.e. week 1 of the following year.
pub fn week_start(iso_week: u32, iso_week_year: i32) -> Option<NaiveDate> {
    if !(1..=53).contains(&iso_week) {
        return None;
    }

    let jan4 = NaiveDate::from_ymd_opt(iso_week_year, 1, 4)?;
    let week_one = jan4.checked_sub_days(Days::new(u64::from(
        jan4.weekday().num_days_from_monday(),
    )))?;

    week_one.checked_add_days(Days::new(u64::from(iso_week - 1) * 7))
}

/// ISO week and week-year of `date`
///
/// The week-year is the calendar year of the Thursday in the same Monday-based
/// week; the week number is that Thursday's 0-based ordinal divided by seven,
/// plus one.
pub fn iso_week_of(date: NaiveDate) -> IsoWeek {
    let year = date.year();
    let weekday = i64::from(date.weekday().number_from_monday());

    // Day-of-year of the Thursday, possibly spilling into a neighbouring year
    let mut thursday = i64::from(date.ordinal()) - weekday + 4;
    let mut week_year = year;

    if thursday < 1 {
        week_year = year - 1;
        thursday += days_in_year(week_year);
    } else if thursday > days_in_year(year) {
        thursday -= days_in_year(year);
        week_year = year + 1;
    }

    let week = (thursday - 1) / 7 + 1;

    IsoWeek {
        // Bounded to 1..=53 by construction
        week: week as u32,
        week_year,
    }
}

/// Number of ISO weeks (52 or 53) in week-year `year`
///
/// A year has 53 weeks when it starts on a Thursday, or is a leap year that
/// starts on a Wednesday. Both reduce to a test on the weekday of 31 December.
pub fn weeks_in_year(year: i32) -> u32 {
    fn dec31_weekday(y: i32) -> i32 {
        // 0 = Sunday .. 6 = Saturday
        (y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400)).rem_euclid(7)
    }

    if dec31_weekday(year) == 4 || dec31_weekday(year - 1) == 3 {
        53
    } else {
        52
    }
}

/// Shift `instant` by exactly `weeks * 7` days, keeping the time of day
pub fn add_weeks(instant: NaiveDateTime, weeks: i64) -> Option<NaiveDateTime> {
    let shift = Duration::try_weeks(weeks)?;
    instant.checked_add_signed(shift)
}

/// Expand a one- or two-digit year
///
/// - `"'23"` → 2023 (an apostrophe always means this century)
/// - `"23"` → 2023, `"78"` → 1978 (below 50 is 20xx, otherwise 19xx)
///
/// Returns `None` if the text is not one or two ASCII digits with an optional
/// leading apostrophe.
pub fn expand_two_digit_year(text: &str) -> Option<i32> {
    let text = text.trim();
    let (digits, apostrophe) = match text
        .strip_prefix('\'')
        .or_else(|| text.strip_prefix('\u{2019}'))
    {
        Some(rest) => (rest, true),
        None => (text, false),
    };

    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: i32 = digits.parse().ok()?;
    if apostrophe || value < 50 {
        Some(2000 + value)
    } else {
        Some(1900 + value)
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_year(year: i32) -> i64 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_known_mondays() {
        assert_eq!(week_start(1, 2023), Some(date(2023, 1, 2)));
        assert_eq!(week_start(1, 2025), Some(date(2024, 12, 30)));
        assert_eq!(week_start(1, 2021), Some(date(2021, 1, 4)));
        assert_eq!(week_start(45, 2024), Some(date(2024, 11, 4)));
        assert_eq!(week_start(52, 2022), Some(date(2022, 12, 26)));
        assert_eq!(week_start(53, 2020), Some(date(2020, 12, 28)));
    }

    #[test]
    fn test_week_start_rejects_out_of_range() {
        assert_eq!(week_start(0, 2024), None);
        assert_eq!(week_start(54, 2024), None);
    }

    #[test]
    fn test_week_53_in_short_year_rolls_into_next_year() {
        assert_eq!(weeks_in_year(2023), 52);
        let monday = week_start(53, 2023).unwrap();
        assert_eq!(monday, date(2024, 1, 1));
        assert_eq!(iso_week_of(monday), IsoWeek::new(1, 2024));
    }

    #[test]
    fn test_iso_week_of_year_boundaries() {
        assert_eq!(iso_week_of(date(2024, 12, 30)), IsoWeek::new(1, 2025));
        assert_eq!(iso_week_of(date(2019, 12, 31)), IsoWeek::new(1, 2020));
        assert_eq!(iso_week_of(date(2023, 1, 2)), IsoWeek::new(1, 2023));
        assert_eq!(iso_week_of(date(2023, 1, 1)), IsoWeek::new(52, 2022));
        assert_eq!(iso_week_of(date(2021, 1, 3)), IsoWeek::new(53, 2020));
        assert_eq!(iso_week_of(date(2023, 1, 15)), IsoWeek::new(2, 2023));
    }

    #[test]
    fn test_week_start_round_trips_through_iso_week_of() {
        for year in 1990..=2040 {
            for week in 1..=weeks_in_year(year) {
                let monday = week_start(week, year).unwrap();
                assert_eq!(
                    iso_week_of(monday),
                    IsoWeek::new(week, year),
                    "week {} of {}",
                    week,
                    year
                );
            }
        }
    }

    #[test]
    fn test_iso_week_of_agrees_with_chrono() {
        let mut day = date(1999, 12, 1);
        while day < date(2031, 2, 1) {
            let ours = iso_week_of(day);
            let theirs = day.iso_week();
            assert_eq!((ours.week, ours.week_year), (theirs.week(), theirs.year()), "{}", day);
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_weeks_in_year() {
        let long_years = [2004, 2009, 2015, 2020, 2026, 2032];
        for year in 2000..=2035 {
            let expected = if long_years.contains(&year) { 53 } else { 52 };
            assert_eq!(weeks_in_year(year), expected, "{}", year);
        }
    }

    #[test]
    fn test_add_weeks_keeps_weekday_and_time() {
        let start = date(2023, 1, 15).and_hms_opt(9, 30, 0).unwrap();
        let back = add_weeks(start, -2).unwrap();
        assert_eq!(back, date(2023, 1, 1).and_hms_opt(9, 30, 0).unwrap());
        assert_eq!(back.weekday(), start.weekday());

        let forward = add_weeks(start, 52).unwrap();
        assert_eq!(forward.date(), date(2024, 1, 14));
    }

    #[test]
    fn test_expand_two_digit_year() {
        assert_eq!(expand_two_digit_year("23"), Some(2023));
        assert_eq!(expand_two_digit_year("78"), Some(1978));
        assert_eq!(expand_two_digit_year("'23"), Some(2023));
        assert_eq!(expand_two_digit_year("'78"), Some(2078));
        assert_eq!(expand_two_digit_year("49"), Some(2049));
        assert_eq!(expand_two_digit_year("50"), Some(1950));
        assert_eq!(expand_two_digit_year("\u{2019}05"), Some(2005));
    }

    #[test]
    fn test_expand_two_digit_year_invalid() {
        assert_eq!(expand_two_digit_year(""), None);
        assert_eq!(expand_two_digit_year("'"), None);
        assert_eq!(expand_two_digit_year("2023"), None);
        assert_eq!(expand_two_digit_year("ab"), None);
    }

    #[test]
    fn test_iso_week_display_and_bounds() {
        let week = IsoWeek::new(5, 2024);
        assert_eq!(week.to_string(), "2024-W05");
        assert_eq!(week.monday(), Some(date(2024, 1, 29)));
        assert_eq!(week.sunday(), Some(date(2024, 2, 4)));
        assert!(week.is_valid());
        assert!(!IsoWeek::new(53, 2023).is_valid());
    }
}
