//! Structured report types produced by the report generator.
//!
//! Leaf structs use camelCase serde names so model output deserializes directly. The
//! optional esoteric systems are kept as a tagged list of [`ReportSection`]s instead of
//! a wide struct of optional fields.

use super::numerology::parse_life_path;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Models emit JSON numbers for whole-valued fields, sometimes as `7.0`.
fn rounded<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let v = f64::deserialize(deserializer)?;
    if !v.is_finite() || v < 0.0 {
        return Err(D::Error::custom(format!("expected a non-negative number, got {v}")));
    }
    T::try_from(v.round() as u64).map_err(|_| D::Error::custom(format!("number out of range: {v}")))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreNumberValue {
    /// Reported as text, e.g. `"11/2"` or `"7"`.
    pub number: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreNumbers {
    pub life_path_number: CoreNumberValue,
    pub expression_number: CoreNumberValue,
    pub soul_urge_number: CoreNumberValue,
    pub personality_number: String,
    pub birthday_number: String,
    pub maturity_number: String,
    pub hidden_passion_number: String,
    pub challenge_numbers: String,
    pub karmic_debt_numbers: String,
    pub personal_cycle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityLayer {
    pub archetype_title: String,
    pub core_frequency_color: String,
}

/// "Why they are like this": the narrative behaviour profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviourProfile {
    pub life_path_story_summary: String,
    pub moon_story: String,
    pub expression_number_behavior_type: String,
    pub attachment_pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergeticWeather {
    pub personal_year_and_month_cycle: String,
    pub major_transits: String,
    pub suggested_messaging_tone: String,
    pub shadow_to_activated_state: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpportunityLevel {
    High,
    Neutral,
    Low,
}

impl fmt::Display for OpportunityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpportunityLevel::High => "High",
            OpportunityLevel::Neutral => "Neutral",
            OpportunityLevel::Low => "Low",
        };
        f.write_str(s)
    }
}

/// "What to do with them": actionable relationship guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guidance {
    pub opportunity_level: OpportunityLevel,
    pub best_way_to_influence: String,
    pub relationship_growth_path: String,
    pub do_and_donot_approaches: String,
    pub timing_recommendations: String,
}

/// Trait scores, 1-10 each.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityArchetype {
    pub logic: f64,
    pub creativity: f64,
    pub intuition: f64,
    pub structure: f64,
    pub social: f64,
}

/// Elemental scores, 1-10 each.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AstrologicalBalance {
    pub fire: f64,
    pub earth: f64,
    pub air: f64,
    pub water: f64,
}

impl AstrologicalBalance {
    /// Name of the strongest element; ties resolve in fire, earth, air, water order.
    pub fn dominant(&self) -> &'static str {
        let mut best = ("Fire", self.fire);
        for candidate in [("Earth", self.earth), ("Air", self.air), ("Water", self.water)] {
            if candidate.1 > best.1 {
                best = candidate;
            }
        }
        best.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanDesign {
    #[serde(rename = "type")]
    pub design_type: String,
    pub strategy: String,
    pub inner_authority: String,
    pub profile: String,
    pub definition: String,
    pub centers: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArabicEsoterics {
    #[serde(deserialize_with = "rounded")]
    pub abjad_value: u32,
    pub abjad_name_meaning: String,
    pub ruling_planet: String,
    pub dominant_element: String,
    pub esoteric_quality: String,
    pub strategic_guidance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MayanAstrology {
    pub day_sign_name: String,
    pub day_sign_qualities: String,
    pub day_sign_meaning: String,
    #[serde(deserialize_with = "rounded")]
    pub galactic_tone_number: u8,
    pub galactic_tone_meaning: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AztecAstrology {
    pub trecena_name: String,
    pub trecena_meaning: String,
    pub day_sign_name: String,
    pub day_sign_qualities: String,
    pub day_sign_meaning: String,
    pub lord_of_the_night: String,
    pub lord_of_the_night_influence: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EgyptianAstrology {
    pub sign_name: String,
    pub ruling_deity: String,
    pub key_characteristics: String,
    pub strategic_guidance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VedicAstrology {
    pub rashi_moon_sign: String,
    pub nakshatra_lunar_mansion: String,
    pub lagna_ascendant: String,
    pub current_dasha_period: String,
    pub key_planetary_influences: String,
    pub strategic_guidance: String,
}

/// Chinese or Japanese zodiac reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalZodiac {
    pub animal_sign: String,
    pub element: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMatrix {
    pub wealth_code_number: String,
    pub wealth_code_summary: String,
    pub investment_archetype: String,
    pub financial_cycle_theme: String,
    pub strategic_advice: Vec<String>,
}

/// One optional system of a report. At most one section per variant is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "system", rename_all = "camelCase")]
pub enum ReportSection {
    PersonalityArchetype(PersonalityArchetype),
    ElementalBalance {
        balance: AstrologicalBalance,
        summary: Option<String>,
    },
    HumanDesign(HumanDesign),
    ArabicEsoterics(ArabicEsoterics),
    Mayan(MayanAstrology),
    Aztec(AztecAstrology),
    Egyptian(EgyptianAstrology),
    Vedic(VedicAstrology),
    ChineseZodiac(AnimalZodiac),
    JapaneseZodiac(AnimalZodiac),
    FinancialMatrix(FinancialMatrix),
}

impl ReportSection {
    pub fn title(&self) -> &'static str {
        match self {
            ReportSection::PersonalityArchetype(_) => "Personality Archetype",
            ReportSection::ElementalBalance { .. } => "Elemental Balance",
            ReportSection::HumanDesign(_) => "Human Design",
            ReportSection::ArabicEsoterics(_) => "Arabic Esoterics",
            ReportSection::Mayan(_) => "Mayan Astrology",
            ReportSection::Aztec(_) => "Aztec Astrology",
            ReportSection::Egyptian(_) => "Egyptian Astrology",
            ReportSection::Vedic(_) => "Vedic Astrology",
            ReportSection::ChineseZodiac(_) => "Chinese Zodiac",
            ReportSection::JapaneseZodiac(_) => "Japanese Zodiac",
            ReportSection::FinancialMatrix(_) => "Financial Matrix",
        }
    }

    /// Label/value pairs for plain rendering (TUI, Markdown).
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            ReportSection::PersonalityArchetype(p) => vec![
                ("Logic", p.logic.to_string()),
                ("Creativity", p.creativity.to_string()),
                ("Intuition", p.intuition.to_string()),
                ("Structure", p.structure.to_string()),
                ("Social", p.social.to_string()),
            ],
            ReportSection::ElementalBalance { balance, summary } => {
                let mut out = vec![
                    ("Fire", format!("{}/10", balance.fire)),
                    ("Earth", format!("{}/10", balance.earth)),
                    ("Air", format!("{}/10", balance.air)),
                    ("Water", format!("{}/10", balance.water)),
                    ("Dominant", balance.dominant().to_string()),
                ];
                if let Some(s) = summary {
                    out.push(("Summary", s.clone()));
                }
                out
            }
            ReportSection::HumanDesign(h) => vec![
                ("Type", h.design_type.clone()),
                ("Strategy", h.strategy.clone()),
                ("Inner Authority", h.inner_authority.clone()),
                ("Profile", h.profile.clone()),
                ("Definition", h.definition.clone()),
                ("Centers", h.centers.clone()),
                ("Summary", h.summary.clone()),
            ],
            ReportSection::ArabicEsoterics(a) => vec![
                ("Abjad Value", a.abjad_value.to_string()),
                ("Name Meaning", a.abjad_name_meaning.clone()),
                ("Ruling Planet", a.ruling_planet.clone()),
                ("Dominant Element", a.dominant_element.clone()),
                ("Esoteric Quality", a.esoteric_quality.clone()),
                ("Strategic Guidance", a.strategic_guidance.clone()),
            ],
            ReportSection::Mayan(m) => vec![
                ("Day Sign", m.day_sign_name.clone()),
                ("Qualities", m.day_sign_qualities.clone()),
                ("Meaning", m.day_sign_meaning.clone()),
                ("Galactic Tone", m.galactic_tone_number.to_string()),
                ("Tone Meaning", m.galactic_tone_meaning.clone()),
                ("Summary", m.summary.clone()),
            ],
            ReportSection::Aztec(a) => vec![
                ("Trecena", a.trecena_name.clone()),
                ("Trecena Meaning", a.trecena_meaning.clone()),
                ("Day Sign", a.day_sign_name.clone()),
                ("Qualities", a.day_sign_qualities.clone()),
                ("Meaning", a.day_sign_meaning.clone()),
                ("Lord of the Night", a.lord_of_the_night.clone()),
                ("Influence", a.lord_of_the_night_influence.clone()),
                ("Summary", a.summary.clone()),
            ],
            ReportSection::Egyptian(e) => vec![
                ("Sign", e.sign_name.clone()),
                ("Ruling Deity", e.ruling_deity.clone()),
                ("Key Characteristics", e.key_characteristics.clone()),
                ("Strategic Guidance", e.strategic_guidance.clone()),
            ],
            ReportSection::Vedic(v) => vec![
                ("Rashi (Moon Sign)", v.rashi_moon_sign.clone()),
                ("Nakshatra", v.nakshatra_lunar_mansion.clone()),
                ("Lagna (Ascendant)", v.lagna_ascendant.clone()),
                ("Current Dasha", v.current_dasha_period.clone()),
                ("Planetary Influences", v.key_planetary_influences.clone()),
                ("Strategic Guidance", v.strategic_guidance.clone()),
            ],
            ReportSection::ChineseZodiac(z) | ReportSection::JapaneseZodiac(z) => vec![
                ("Animal", z.animal_sign.clone()),
                ("Element", z.element.clone()),
                ("Summary", z.summary.clone()),
            ],
            ReportSection::FinancialMatrix(f) => vec![
                ("Wealth Code", f.wealth_code_number.clone()),
                ("Wealth Code Summary", f.wealth_code_summary.clone()),
                ("Investment Archetype", f.investment_archetype.clone()),
                ("Financial Cycle Theme", f.financial_cycle_theme.clone()),
                ("Strategic Advice", f.strategic_advice.join("; ")),
            ],
        }
    }
}

/// Full profile report for one contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmReport {
    pub core_numbers: Option<CoreNumbers>,
    pub identity: IdentityLayer,
    pub profile: BehaviourProfile,
    pub weather: EnergeticWeather,
    pub guidance: Guidance,
    #[serde(default)]
    pub sections: Vec<ReportSection>,
}

impl CrmReport {
    pub fn financial_matrix(&self) -> Option<&FinancialMatrix> {
        self.sections.iter().find_map(|s| match s {
            ReportSection::FinancialMatrix(f) => Some(f),
            _ => None,
        })
    }

    pub fn personality_archetype(&self) -> Option<&PersonalityArchetype> {
        self.sections.iter().find_map(|s| match s {
            ReportSection::PersonalityArchetype(p) => Some(p),
            _ => None,
        })
    }

    pub fn financial_cycle_theme(&self) -> Option<String> {
        self.financial_matrix()
            .map(|f| f.financial_cycle_theme.clone())
            .filter(|t| !t.trim().is_empty())
    }

    /// Leading life path number as reported, master numbers kept.
    pub fn life_path(&self) -> Option<u8> {
        self.core_numbers
            .as_ref()
            .and_then(|c| parse_life_path(&c.life_path_number.number))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compatibility {
    High,
    Medium,
    Low,
    Neutral,
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Compatibility::High => "High",
            Compatibility::Medium => "Medium",
            Compatibility::Low => "Low",
            Compatibility::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynergyBreakdown {
    pub compatibility: Compatibility,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairwiseAnalysis {
    #[serde(rename = "contact1Name")]
    pub contact1_name: String,
    #[serde(rename = "contact2Name")]
    pub contact2_name: String,
    pub synergy_type: String,
    pub analysis: String,
    pub sun_sign_synergy: SynergyBreakdown,
    pub moon_sign_synergy: SynergyBreakdown,
    pub ascendant_sign_synergy: SynergyBreakdown,
    pub life_path_synergy: SynergyBreakdown,
    pub expression_number_synergy: SynergyBreakdown,
}

impl PairwiseAnalysis {
    pub fn breakdowns(&self) -> [(&'static str, &SynergyBreakdown); 5] {
        [
            ("Sun Sign", &self.sun_sign_synergy),
            ("Moon Sign", &self.moon_sign_synergy),
            ("Ascendant", &self.ascendant_sign_synergy),
            ("Life Path", &self.life_path_synergy),
            ("Expression Number", &self.expression_number_synergy),
        ]
    }
}

/// Group dynamics for two or more contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergyReport {
    pub overall_summary: String,
    pub strengths: String,
    pub challenges: String,
    pub strategic_advice: String,
    pub pairwise_analyses: Vec<PairwiseAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBriefing {
    pub headline: String,
    pub key_priorities: Vec<String>,
    pub potential_challenge: String,
    pub key_superpower: String,
    pub mantra: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalAnalysis {
    pub key_themes: String,
    pub growth_opportunity: String,
    pub reflection_question: String,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal report used across module tests.
    pub(crate) fn sample_report() -> CrmReport {
        CrmReport {
            core_numbers: Some(CoreNumbers {
                life_path_number: CoreNumberValue {
                    number: "11/2".into(),
                    summary: "The intuitive messenger.".into(),
                },
                expression_number: CoreNumberValue {
                    number: "5".into(),
                    summary: "Restless and curious.".into(),
                },
                soul_urge_number: CoreNumberValue {
                    number: "3".into(),
                    summary: "Wants to be heard.".into(),
                },
                personality_number: "2".into(),
                birthday_number: "1".into(),
                maturity_number: "7".into(),
                hidden_passion_number: "1".into(),
                challenge_numbers: "0, 2".into(),
                karmic_debt_numbers: "None".into(),
                personal_cycle: "Personal Year 4".into(),
            }),
            identity: IdentityLayer {
                archetype_title: "The Visionary Bridge".into(),
                core_frequency_color: "Indigo".into(),
            },
            profile: BehaviourProfile {
                life_path_story_summary: "Learns through relationships.".into(),
                moon_story: "Needs quiet to recharge.".into(),
                expression_number_behavior_type: "Adaptive communicator.".into(),
                attachment_pattern: "Secure with reassurance.".into(),
            },
            weather: EnergeticWeather {
                personal_year_and_month_cycle: "Year 4, building foundations.".into(),
                major_transits: "Saturn return.".into(),
                suggested_messaging_tone: "Calm and specific.".into(),
                shadow_to_activated_state: "From doubt to conviction.".into(),
            },
            guidance: Guidance {
                opportunity_level: OpportunityLevel::High,
                best_way_to_influence: "Show the long game.".into(),
                relationship_growth_path: "Co-create a plan.".into(),
                do_and_donot_approaches: "Do listen. Don't rush.".into(),
                timing_recommendations: "Mornings early in the week.".into(),
            },
            sections: vec![
                ReportSection::PersonalityArchetype(PersonalityArchetype {
                    logic: 7.0,
                    creativity: 8.5,
                    intuition: 9.0,
                    structure: 4.0,
                    social: 6.5,
                }),
                ReportSection::FinancialMatrix(FinancialMatrix {
                    wealth_code_number: "8".into(),
                    wealth_code_summary: "Builds through partnerships.".into(),
                    investment_archetype: "Steady Compounder".into(),
                    financial_cycle_theme: "Consolidation".into(),
                    strategic_advice: vec!["Automate savings".into(), "Avoid hype".into()],
                }),
            ],
        }
    }

    #[test]
    fn test_section_accessors() {
        let report = sample_report();
        assert_eq!(report.financial_cycle_theme().as_deref(), Some("Consolidation"));
        assert_eq!(report.personality_archetype().map(|p| p.intuition), Some(9.0));
        assert_eq!(report.life_path(), Some(11));
    }

    #[test]
    fn test_sections_serialize_as_tagged_union() {
        let report = sample_report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sections"][0]["system"], "personalityArchetype");
        assert_eq!(json["sections"][1]["system"], "financialMatrix");
        assert_eq!(json["guidance"]["opportunityLevel"], "High");

        let back: CrmReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let mut json = serde_json::to_value(sample_report()).unwrap();
        json.as_object_mut().unwrap().remove("sections");
        let report: CrmReport = serde_json::from_value(json).unwrap();
        assert!(report.sections.is_empty());
        assert!(report.financial_cycle_theme().is_none());
    }

    #[test]
    fn test_dominant_element() {
        let b = AstrologicalBalance {
            fire: 2.0,
            earth: 7.5,
            air: 7.5,
            water: 1.0,
        };
        assert_eq!(b.dominant(), "Earth");
        let section = ReportSection::ElementalBalance {
            balance: b,
            summary: None,
        };
        assert_eq!(section.fields().len(), 5);
    }

    #[test]
    fn test_pairwise_names_use_numbered_keys() {
        let raw = r#"{
            "contact1Name": "Ada", "contact2Name": "Alan",
            "synergyType": "Catalyst", "analysis": "Sparks fly.",
            "sunSignSynergy": {"compatibility": "High", "analysis": "a"},
            "moonSignSynergy": {"compatibility": "Medium", "analysis": "b"},
            "ascendantSignSynergy": {"compatibility": "Neutral", "analysis": "c"},
            "lifePathSynergy": {"compatibility": "Low", "analysis": "d"},
            "expressionNumberSynergy": {"compatibility": "High", "analysis": "e"}
        }"#;
        let p: PairwiseAnalysis = serde_json::from_str(raw).unwrap();
        assert_eq!(p.contact2_name, "Alan");
        assert_eq!(p.breakdowns()[3].1.compatibility, Compatibility::Low);
    }

    #[test]
    fn test_whole_numbers_accept_float_notation() {
        let raw = r#"{"daySignName": "Imix", "daySignQualities": "Nurturer",
            "daySignMeaning": "Origins.", "galacticToneNumber": 7.0,
            "galacticToneMeaning": "Resonance.", "summary": "Grounded."}"#;
        let m: MayanAstrology = serde_json::from_str(raw).unwrap();
        assert_eq!(m.galactic_tone_number, 7);

        let bad = raw.replace("7.0", "-3");
        assert!(serde_json::from_str::<MayanAstrology>(&bad).is_err());
    }
}
