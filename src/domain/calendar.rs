//! Date math core. Julian Day Number and numerological digit reduction.
//!
//! All dates are plain Gregorian (year, month, day) triples. No timezone is ever
//! applied: a stored `YYYY-MM-DD` string maps to exactly those components.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

// ASCII digits only; `\d` would also admit other Unicode decimal digits.
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid ISO date regex"));

/// True for exactly `YYYY-MM-DD` in ASCII digits. Says nothing about calendar validity.
pub fn is_iso_date_shape(s: &str) -> bool {
    ISO_DATE_RE.is_match(s)
}

/// Master numbers are left unreduced by the master-preserving reduction.
pub const MASTER_NUMBERS: [u64; 3] = [11, 22, 33];

/// A validated Gregorian calendar date, interpreted as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    /// Returns `None` when (year, month, day) is not a real Gregorian date.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from)
    }

    /// Parse a strict `YYYY-MM-DD` string. Unpadded fields, signs, surrounding whitespace and
    /// calendar-invalid dates (e.g. `2023-02-30`) are rejected.
    pub fn parse_iso(s: &str) -> Option<Self> {
        if !is_iso_date_shape(s) {
            return None;
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .map(Self::from)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    pub fn julian_day_number(&self) -> i64 {
        julian_day_number(self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(d: NaiveDate) -> Self {
        Self {
            year: d.year(),
            month: d.month(),
            day: d.day(),
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Gregorian date to Julian Day Number (Fliegel / Van Flandern).
///
/// Total over valid Gregorian dates; the caller supplies a real calendar date.
/// Divisions are floor divisions so proleptic years before 4800 BCE stay consistent.
pub fn julian_day_number(year: i32, month: u32, day: u32) -> i64 {
    let year = i64::from(year);
    let month = i64::from(month);
    let day = i64::from(day);

    let a = (14 - month).div_euclid(12);
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;

    day + (153 * m + 2).div_euclid(5) + 365 * y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        - 32045
}

fn digit_sum(mut n: u64) -> u64 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Repeatedly sum decimal digits until a single digit remains.
///
/// With `preserve_master_numbers`, 11, 22 and 33 are checked before each step and
/// returned as-is. Results are in `0..=9`, plus `{11, 22, 33}` when preserving.
pub fn reduce_digits(n: u64, preserve_master_numbers: bool) -> u64 {
    let mut n = n;
    while n > 9 {
        if preserve_master_numbers && MASTER_NUMBERS.contains(&n) {
            break;
        }
        n = digit_sum(n);
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_julian_day_number_j2000() {
        assert_eq!(julian_day_number(2000, 1, 1), 2451545);
        assert_eq!(
            CalendarDate::new(2000, 1, 1).unwrap().julian_day_number(),
            2451545
        );
    }

    #[test]
    fn test_julian_day_number_known_dates() {
        // Gregorian reform and Unix epoch.
        assert_eq!(julian_day_number(1582, 10, 15), 2299161);
        assert_eq!(julian_day_number(1970, 1, 1), 2440588);
        // Consecutive days differ by one across a month boundary.
        assert_eq!(
            julian_day_number(2024, 3, 1) - julian_day_number(2024, 2, 29),
            1
        );
    }

    #[test]
    fn test_reduce_digits_plain() {
        assert_eq!(reduce_digits(0, false), 0);
        assert_eq!(reduce_digits(7, false), 7);
        assert_eq!(reduce_digits(38, false), 2);
        assert_eq!(reduce_digits(2024, false), 8);
        assert_eq!(reduce_digits(11, false), 2);
    }

    #[test]
    fn test_reduce_digits_master_numbers() {
        assert_eq!(reduce_digits(11, true), 11);
        assert_eq!(reduce_digits(22, true), 22);
        assert_eq!(reduce_digits(33, true), 33);
        assert_eq!(reduce_digits(29, true), 11);
        assert_eq!(reduce_digits(44, true), 8);
    }

    #[test]
    fn test_reduce_digits_range_and_idempotence() {
        for n in 0..5000u64 {
            let r = reduce_digits(n, false);
            assert!(r <= 9, "{n} reduced to {r}");
            assert_eq!(reduce_digits(r, false), r);

            let m = reduce_digits(n, true);
            assert!(m <= 9 || MASTER_NUMBERS.contains(&m), "{n} reduced to {m}");
        }
        assert!(reduce_digits(u64::MAX, false) <= 9);
    }

    #[test]
    fn test_calendar_date_parse_iso() {
        let d = CalendarDate::parse_iso("1990-10-28").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (1990, 10, 28));
        assert_eq!(d.to_string(), "1990-10-28");
        assert!(CalendarDate::parse_iso("").is_none());
        assert!(CalendarDate::parse_iso("2023-02-30").is_none());
        assert!(CalendarDate::parse_iso("28/10/1990").is_none());
    }

    #[test]
    fn test_parse_iso_rejects_loose_forms() {
        for loose in [
            "1990-1-5",
            " 1990-10-28 ",
            "1990-10-28\n",
            "+1990-10-28",
            "١٩٩٠-١٠-٢٨",
        ] {
            assert!(CalendarDate::parse_iso(loose).is_none(), "{loose:?} accepted");
        }
        assert!(is_iso_date_shape("2023-99-99"));
        assert!(!is_iso_date_shape("١٩٩٠-١٠-٢٨"));
    }
}
