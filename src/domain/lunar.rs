//! Lunar phase approximation from a calendar date.
//!
//! Mean synodic month from a reference new moon near 2000-01-06. Good to about a day,
//! which is all the phase buckets need.

use super::calendar::CalendarDate;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::f64::consts::PI;
use std::fmt;

/// Julian date of the reference new moon.
const REFERENCE_NEW_MOON_JD: f64 = 2451549.5;
/// Mean synodic month in days.
const SYNODIC_MONTH_DAYS: f64 = 29.53058861;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoonPhase {
    #[serde(rename = "New Moon")]
    NewMoon,
    #[serde(rename = "Waxing Crescent")]
    WaxingCrescent,
    #[serde(rename = "First Quarter")]
    FirstQuarter,
    #[serde(rename = "Waxing Gibbous")]
    WaxingGibbous,
    #[serde(rename = "Full Moon")]
    FullMoon,
    #[serde(rename = "Waning Gibbous")]
    WaningGibbous,
    #[serde(rename = "Last Quarter")]
    LastQuarter,
    #[serde(rename = "Waning Crescent")]
    WaningCrescent,
}

impl MoonPhase {
    /// Bucket a phase fraction in `[0, 1)`. Lower bounds inclusive, upper exclusive;
    /// New Moon wraps around both ends.
    pub fn from_fraction(phase: f64) -> Self {
        if !(0.03..=0.97).contains(&phase) {
            MoonPhase::NewMoon
        } else if phase < 0.23 {
            MoonPhase::WaxingCrescent
        } else if phase < 0.27 {
            MoonPhase::FirstQuarter
        } else if phase < 0.48 {
            MoonPhase::WaxingGibbous
        } else if phase < 0.52 {
            MoonPhase::FullMoon
        } else if phase < 0.73 {
            MoonPhase::WaningGibbous
        } else if phase < 0.77 {
            MoonPhase::LastQuarter
        } else {
            MoonPhase::WaningCrescent
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "🌑",
            MoonPhase::WaxingCrescent => "🌒",
            MoonPhase::FirstQuarter => "🌓",
            MoonPhase::WaxingGibbous => "🌔",
            MoonPhase::FullMoon => "🌕",
            MoonPhase::WaningGibbous => "🌖",
            MoonPhase::LastQuarter => "🌗",
            MoonPhase::WaningCrescent => "🌘",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Derived on demand, never persisted. Serializes as
/// `{ phaseName, illuminationPercent, symbolGlyph }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarPhaseResult {
    pub phase: MoonPhase,
    /// Illuminated fraction of the disc, `0..=100`.
    pub illumination_percent: u8,
    /// Position in the synodic cycle, `[0, 1)`.
    pub fraction: f64,
}

impl LunarPhaseResult {
    pub fn phase_name(&self) -> &'static str {
        self.phase.name()
    }

    pub fn symbol_glyph(&self) -> &'static str {
        self.phase.glyph()
    }
}

impl Serialize for LunarPhaseResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LunarPhaseResult", 3)?;
        state.serialize_field("phaseName", self.phase_name())?;
        state.serialize_field("illuminationPercent", &self.illumination_percent)?;
        state.serialize_field("symbolGlyph", self.symbol_glyph())?;
        state.end()
    }
}

/// Fractional position in the synodic cycle. Normalized into `[0, 1)` for dates
/// before the reference epoch as well.
pub fn phase_fraction(date: &CalendarDate) -> f64 {
    let jd = date.julian_day_number() as f64;
    let synodic_months = (jd - REFERENCE_NEW_MOON_JD) / SYNODIC_MONTH_DAYS;
    let phase = synodic_months - synodic_months.floor();
    // x - floor(x) can round up to exactly 1.0 for tiny negative x.
    if phase >= 1.0 { 0.0 } else { phase }
}

pub fn lunar_phase(date: &CalendarDate) -> LunarPhaseResult {
    let phase = phase_fraction(date);
    let illumination = 0.5 * (1.0 - (2.0 * PI * phase).cos());
    let illumination_percent = (illumination * 100.0).round().clamp(0.0, 100.0) as u8;

    LunarPhaseResult {
        phase: MoonPhase::from_fraction(phase),
        illumination_percent,
        fraction: phase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    #[test]
    fn test_reference_new_moon() {
        let result = lunar_phase(&date(2000, 1, 6));
        assert_eq!(result.phase, MoonPhase::NewMoon);
        assert_eq!(result.phase_name(), "New Moon");
        assert!(result.illumination_percent <= 1);
        assert_eq!(result.symbol_glyph(), "🌑");
    }

    #[test]
    fn test_result_serializes_display_fields() {
        let json = serde_json::to_value(lunar_phase(&date(2000, 1, 6))).unwrap();
        assert_eq!(json["phaseName"], "New Moon");
        assert_eq!(json["symbolGlyph"], "🌑");
        assert!(json["illuminationPercent"].as_u64().unwrap() <= 1);
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_full_moon_two_weeks_later() {
        // Mean-motion full moon of the reference lunation.
        let result = lunar_phase(&date(2000, 1, 20));
        assert_eq!(result.phase, MoonPhase::FullMoon);
        assert!(result.illumination_percent >= 99);
    }

    #[test]
    fn test_dates_before_epoch_are_normalized() {
        // 1969-07-20 (Apollo 11 landing) was a waxing crescent.
        let result = lunar_phase(&date(1969, 7, 20));
        assert!((0.0..1.0).contains(&result.fraction));
        assert_eq!(result.phase, MoonPhase::WaxingCrescent);

        for year in [1, 1000, 1899, 1999] {
            let f = phase_fraction(&date(year, 12, 31));
            assert!((0.0..1.0).contains(&f), "{year}: {f}");
        }
    }

    #[test]
    fn test_phase_buckets() {
        assert_eq!(MoonPhase::from_fraction(0.0), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_fraction(0.029), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_fraction(0.03), MoonPhase::WaxingCrescent);
        assert_eq!(MoonPhase::from_fraction(0.23), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_fraction(0.27), MoonPhase::WaxingGibbous);
        assert_eq!(MoonPhase::from_fraction(0.48), MoonPhase::FullMoon);
        assert_eq!(MoonPhase::from_fraction(0.52), MoonPhase::WaningGibbous);
        assert_eq!(MoonPhase::from_fraction(0.73), MoonPhase::LastQuarter);
        assert_eq!(MoonPhase::from_fraction(0.77), MoonPhase::WaningCrescent);
        assert_eq!(MoonPhase::from_fraction(0.97), MoonPhase::WaningCrescent);
        assert_eq!(MoonPhase::from_fraction(0.971), MoonPhase::NewMoon);
    }

    #[test]
    fn test_illumination_in_range_over_a_cycle() {
        let start = date(2024, 1, 1).to_naive().unwrap();
        for offset in 0..60 {
            let d = CalendarDate::from(start + chrono::Duration::days(offset));
            let r = lunar_phase(&d);
            assert!(r.illumination_percent <= 100);
        }
    }
}
