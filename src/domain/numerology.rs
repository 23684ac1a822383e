//! Numerology and zodiac derivations over birth dates.
//!
//! Everything here is pure and derived from the UTC (year, month, day) components of a
//! `YYYY-MM-DD` birth date. Missing or unparseable input yields a sentinel rather than an
//! error so presentation code always has something to render.

use super::calendar::{CalendarDate, reduce_digits};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel sign/animal name for empty or invalid birth dates.
pub const UNKNOWN: &str = "Unknown";

/// Current calendar year (UTC).
pub fn current_year() -> i32 {
    Utc::now().year()
}

fn reduce_year(year: i32) -> u64 {
    reduce_digits(u64::from(year.unsigned_abs()), false)
}

// ─────────────────────────────────────────────────────────────────────────
// Personal Year
// ─────────────────────────────────────────────────────────────────────────

/// Personal Year for `reference_year`: month, day and year are each reduced to a single
/// digit, summed, and reduced again. Master numbers are never preserved here.
///
/// Always in `1..=9`.
pub fn personal_year(birth: &CalendarDate, reference_year: i32) -> u8 {
    let month = reduce_digits(u64::from(birth.month()), false);
    let day = reduce_digits(u64::from(birth.day()), false);
    let year = reduce_year(reference_year);
    reduce_digits(month + day + year, false) as u8
}

/// Personal Year from a stored birth-date string. `None` for empty/invalid input.
pub fn personal_year_for(birth_date: &str, reference_year: i32) -> Option<u8> {
    CalendarDate::parse_iso(birth_date).map(|d| personal_year(&d, reference_year))
}

/// The nine-year cycle with the current position flagged.
pub fn personal_year_cycle(current: u8) -> [(u8, bool); 9] {
    std::array::from_fn(|i| {
        let year = i as u8 + 1;
        (year, year == current)
    })
}

// ─────────────────────────────────────────────────────────────────────────
// Day number / alignment days
// ─────────────────────────────────────────────────────────────────────────

/// Universal day number of a date, preserving master numbers at every step.
pub fn day_number(date: &CalendarDate) -> u8 {
    let day = reduce_digits(u64::from(date.day()), true);
    let month = reduce_digits(u64::from(date.month()), true);
    let year = reduce_digits(u64::from(date.year().unsigned_abs()), true);
    reduce_digits(day + month + year, true) as u8
}

/// Leading number of a reported core number such as `"11/2"` or `"8"`.
pub fn parse_life_path(reported: &str) -> Option<u8> {
    reported.split('/').next()?.trim().parse().ok()
}

/// Dates in `year` whose day number equals `life_path`.
pub fn alignment_days(life_path: u8, year: i32) -> Vec<CalendarDate> {
    let Some(start) = CalendarDate::new(year, 1, 1).and_then(|d| d.to_naive()) else {
        return Vec::new();
    };
    start
        .iter_days()
        .take_while(|d| d.year() == year)
        .map(CalendarDate::from)
        .filter(|d| day_number(d) == life_path)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────
// Western sun sign
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Air => "Air",
            Element::Water => "Water",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SunSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
    Unknown,
}

impl SunSign {
    pub fn name(&self) -> &'static str {
        match self {
            SunSign::Aries => "Aries",
            SunSign::Taurus => "Taurus",
            SunSign::Gemini => "Gemini",
            SunSign::Cancer => "Cancer",
            SunSign::Leo => "Leo",
            SunSign::Virgo => "Virgo",
            SunSign::Libra => "Libra",
            SunSign::Scorpio => "Scorpio",
            SunSign::Sagittarius => "Sagittarius",
            SunSign::Capricorn => "Capricorn",
            SunSign::Aquarius => "Aquarius",
            SunSign::Pisces => "Pisces",
            SunSign::Unknown => UNKNOWN,
        }
    }

    /// Unknown defaults to Air.
    pub fn element(&self) -> Element {
        match self {
            SunSign::Aries | SunSign::Leo | SunSign::Sagittarius => Element::Fire,
            SunSign::Taurus | SunSign::Virgo | SunSign::Capricorn => Element::Earth,
            SunSign::Gemini | SunSign::Libra | SunSign::Aquarius | SunSign::Unknown => Element::Air,
            SunSign::Cancer | SunSign::Scorpio | SunSign::Pisces => Element::Water,
        }
    }
}

impl fmt::Display for SunSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive (month, day) ranges. Capricorn wraps the year end.
const SUN_SIGN_RANGES: [(SunSign, (u32, u32), (u32, u32)); 12] = [
    (SunSign::Aries, (3, 21), (4, 19)),
    (SunSign::Taurus, (4, 20), (5, 20)),
    (SunSign::Gemini, (5, 21), (6, 20)),
    (SunSign::Cancer, (6, 21), (7, 22)),
    (SunSign::Leo, (7, 23), (8, 22)),
    (SunSign::Virgo, (8, 23), (9, 22)),
    (SunSign::Libra, (9, 23), (10, 22)),
    (SunSign::Scorpio, (10, 23), (11, 21)),
    (SunSign::Sagittarius, (11, 22), (12, 21)),
    (SunSign::Capricorn, (12, 22), (1, 19)),
    (SunSign::Aquarius, (1, 20), (2, 18)),
    (SunSign::Pisces, (2, 19), (3, 20)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZodiacResult {
    pub sign: SunSign,
    pub element: Element,
}

impl ZodiacResult {
    pub const UNKNOWN: ZodiacResult = ZodiacResult {
        sign: SunSign::Unknown,
        element: Element::Air,
    };

    pub fn sign_name(&self) -> &'static str {
        self.sign.name()
    }
}

/// Sun sign for a month/day pair.
pub fn sun_sign(month: u32, day: u32) -> SunSign {
    let md = month * 100 + day;
    SUN_SIGN_RANGES
        .iter()
        .find(|(_, (sm, sd), (em, ed))| {
            let start = sm * 100 + sd;
            let end = em * 100 + ed;
            if start <= end {
                (start..=end).contains(&md)
            } else {
                md >= start || md <= end
            }
        })
        .map(|(sign, _, _)| *sign)
        .unwrap_or(SunSign::Unknown)
}

/// Sun sign and element for a stored birth date. Empty or invalid input gives
/// [`ZodiacResult::UNKNOWN`].
pub fn zodiac_sign(birth_date: &str) -> ZodiacResult {
    match CalendarDate::parse_iso(birth_date) {
        Some(d) => {
            let sign = sun_sign(d.month(), d.day());
            ZodiacResult {
                sign,
                element: sign.element(),
            }
        }
        None => ZodiacResult::UNKNOWN,
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Twelve-year animal cycles
// ─────────────────────────────────────────────────────────────────────────

/// A 12-animal cycle pre-rotated so that index `year % 12` is the animal of `year`.
#[derive(Debug, Clone, Copy)]
pub struct AnimalCycle {
    pub tradition: &'static str,
    pub animals: [&'static str; 12],
}

impl AnimalCycle {
    pub fn animal_for_year(&self, year: i32) -> &'static str {
        self.animals[year.rem_euclid(12) as usize]
    }
}

pub const VIETNAMESE_ZODIAC: AnimalCycle = AnimalCycle {
    tradition: "Vietnamese",
    animals: [
        "Monkey",
        "Rooster",
        "Dog",
        "Pig",
        "Rat",
        "Water Buffalo",
        "Tiger",
        "Cat",
        "Dragon",
        "Snake",
        "Horse",
        "Goat",
    ],
};

pub const CHINESE_ZODIAC: AnimalCycle = AnimalCycle {
    tradition: "Chinese",
    animals: [
        "Monkey", "Rooster", "Dog", "Pig", "Rat", "Ox", "Tiger", "Rabbit", "Dragon", "Snake",
        "Horse", "Goat",
    ],
};

pub const JAPANESE_ZODIAC: AnimalCycle = AnimalCycle {
    tradition: "Japanese",
    animals: [
        "Monkey", "Rooster", "Dog", "Boar", "Rat", "Ox", "Tiger", "Rabbit", "Dragon", "Snake",
        "Horse", "Sheep",
    ],
};

/// Animal of the birth year in `cycle`. Sentinel [`UNKNOWN`] for empty/invalid input.
///
/// Uses the Gregorian year; lunar new year boundaries are not modelled.
pub fn cyclic_animal_sign(birth_date: &str, cycle: &AnimalCycle) -> &'static str {
    match CalendarDate::parse_iso(birth_date) {
        Some(d) => cycle.animal_for_year(d.year()),
        None => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_year_example() {
        let birth = CalendarDate::parse_iso("1990-10-28").unwrap();
        assert_eq!(personal_year(&birth, 2024), 1);
        assert_eq!(personal_year_for("1990-10-28", 2024), Some(1));
        assert_eq!(personal_year_for("", 2024), None);
    }

    #[test]
    fn test_personal_year_never_preserves_master_numbers() {
        // 11 (Nov) -> 2, 29 -> 2, 2025 -> 9: 13 -> 4.
        assert_eq!(personal_year_for("1980-11-29", 2025), Some(4));
        // 1 + 1 + 9 (2007) = 11, reduced to 2.
        assert_eq!(personal_year_for("1999-01-01", 2007), Some(2));
    }

    #[test]
    fn test_personal_year_always_one_to_nine() {
        let start = CalendarDate::new(2024, 1, 1).unwrap().to_naive().unwrap();
        for d in start.iter_days().take(366) {
            let py = personal_year(&CalendarDate::from(d), 2031);
            assert!((1..=9).contains(&py));
        }
    }

    #[test]
    fn test_personal_year_cycle_marks_current() {
        let cycle = personal_year_cycle(4);
        assert_eq!(cycle[0], (1, false));
        assert_eq!(cycle[3], (4, true));
        assert_eq!(cycle.iter().filter(|(_, active)| *active).count(), 1);
    }

    #[test]
    fn test_zodiac_examples() {
        let scorpio = zodiac_sign("1990-10-28");
        assert_eq!(scorpio.sign, SunSign::Scorpio);
        assert_eq!(scorpio.element, Element::Water);

        let aries = zodiac_sign("2000-03-21");
        assert_eq!(aries.sign_name(), "Aries");
        assert_eq!(aries.element, Element::Fire);

        let unknown = zodiac_sign("");
        assert_eq!(unknown.sign_name(), "Unknown");
        assert_eq!(unknown.element, Element::Air);
        assert_eq!(zodiac_sign("not-a-date"), ZodiacResult::UNKNOWN);
    }

    #[test]
    fn test_loose_birth_dates_return_sentinels() {
        for loose in ["1990-1-5", " 1990-10-28 ", "+1990-10-28", "١٩٩٠-١٠-٢٨"] {
            assert_eq!(zodiac_sign(loose), ZodiacResult::UNKNOWN, "{loose:?}");
            assert_eq!(cyclic_animal_sign(loose, &VIETNAMESE_ZODIAC), UNKNOWN, "{loose:?}");
            assert_eq!(personal_year_for(loose, 2024), None, "{loose:?}");
        }
    }

    #[test]
    fn test_zodiac_boundaries() {
        assert_eq!(sun_sign(4, 19), SunSign::Aries);
        assert_eq!(sun_sign(4, 20), SunSign::Taurus);
        assert_eq!(sun_sign(12, 21), SunSign::Sagittarius);
        assert_eq!(sun_sign(12, 22), SunSign::Capricorn);
        assert_eq!(sun_sign(12, 31), SunSign::Capricorn);
        assert_eq!(sun_sign(1, 1), SunSign::Capricorn);
        assert_eq!(sun_sign(1, 19), SunSign::Capricorn);
        assert_eq!(sun_sign(1, 20), SunSign::Aquarius);
        assert_eq!(sun_sign(2, 29), SunSign::Pisces);
        assert_eq!(sun_sign(3, 20), SunSign::Pisces);
    }

    #[test]
    fn test_zodiac_table_covers_every_day_once() {
        let start = CalendarDate::new(2024, 1, 1).unwrap().to_naive().unwrap();
        for d in start.iter_days().take(366) {
            let md = d.month() * 100 + d.day();
            let hits = SUN_SIGN_RANGES
                .iter()
                .filter(|(_, (sm, sd), (em, ed))| {
                    let (s, e) = (sm * 100 + sd, em * 100 + ed);
                    if s <= e {
                        (s..=e).contains(&md)
                    } else {
                        md >= s || md <= e
                    }
                })
                .count();
            assert_eq!(hits, 1, "{d} matched {hits} signs");
        }
    }

    #[test]
    fn test_elements_three_signs_each() {
        for element in [Element::Fire, Element::Earth, Element::Air, Element::Water] {
            let n = SUN_SIGN_RANGES
                .iter()
                .filter(|(s, _, _)| s.element() == element)
                .count();
            assert_eq!(n, 3);
        }
    }

    #[test]
    fn test_vietnamese_zodiac() {
        assert_eq!(cyclic_animal_sign("2016-05-01", &VIETNAMESE_ZODIAC), "Monkey");
        assert_eq!(cyclic_animal_sign("1985-02-05", &VIETNAMESE_ZODIAC), "Water Buffalo");
        assert_eq!(cyclic_animal_sign("1987-06-01", &VIETNAMESE_ZODIAC), "Cat");
        assert_eq!(cyclic_animal_sign("", &VIETNAMESE_ZODIAC), UNKNOWN);
    }

    #[test]
    fn test_animal_cycles_are_periodic() {
        for cycle in [VIETNAMESE_ZODIAC, CHINESE_ZODIAC, JAPANESE_ZODIAC] {
            for year in 1900..2100 {
                assert_eq!(cycle.animal_for_year(year), cycle.animal_for_year(year + 12));
            }
            assert_eq!(cycle.animal_for_year(2020), "Rat");
            assert_eq!(cycle.animal_for_year(2024), "Dragon");
        }
        assert_eq!(JAPANESE_ZODIAC.animal_for_year(2019), "Boar");
        assert_eq!(CHINESE_ZODIAC.animal_for_year(2023), "Rabbit");
    }

    #[test]
    fn test_day_number_preserves_master_numbers() {
        let d = CalendarDate::new(2024, 1, 2).unwrap();
        assert_eq!(day_number(&d), 11);
        let d = CalendarDate::new(2024, 1, 11).unwrap();
        // 11 + 1 + 8 = 20 -> 2
        assert_eq!(day_number(&d), 2);
    }

    #[test]
    fn test_alignment_days() {
        let days = alignment_days(11, 2024);
        assert!(days.contains(&CalendarDate::new(2024, 1, 2).unwrap()));
        assert!(days.iter().all(|d| d.year() == 2024 && day_number(d) == 11));

        let twos = alignment_days(2, 2024);
        assert!(twos.contains(&CalendarDate::new(2024, 1, 11).unwrap()));
        assert!(!twos.contains(&CalendarDate::new(2024, 1, 2).unwrap()));
    }

    #[test]
    fn test_parse_life_path() {
        assert_eq!(parse_life_path("11/2"), Some(11));
        assert_eq!(parse_life_path(" 8 "), Some(8));
        assert_eq!(parse_life_path("n/a"), None);
    }
}
