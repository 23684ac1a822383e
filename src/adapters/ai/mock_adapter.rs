//! Mock report generator for running without API calls.
//!
//! Builds deterministic reports from the local numerology core so every screen has
//! something real to render during development and tests.

use crate::domain::lunar::lunar_phase;
use crate::domain::numerology::{
    CHINESE_ZODIAC, Element, JAPANESE_ZODIAC, cyclic_animal_sign, day_number, zodiac_sign,
};
use crate::domain::report::{
    AnimalZodiac, AstrologicalBalance, BehaviourProfile, Compatibility, CoreNumberValue,
    CoreNumbers, EnergeticWeather, FinancialMatrix, Guidance, IdentityLayer, OpportunityLevel,
    PairwiseAnalysis, PersonalityArchetype, SynergyBreakdown,
};
use crate::domain::{
    CalendarDate, Contact, CrmReport, DailyBriefing, DomainError, JournalAnalysis, MoonPhase,
    ReportSection, ReportSubject, SynergyReport, reduce_digits,
};
use crate::ports::ReportGenerator;
use std::time::Duration;
use tracing::info;

const NOT_PROVIDED: &str = "Not provided";

/// Mock generator.
///
/// Returns locally derived responses without making API calls.
/// Simulates network latency with configurable delay.
pub struct MockReportGenerator {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
}

impl MockReportGenerator {
    /// Create a new mock generator with default delay (100ms).
    pub fn new() -> Self {
        Self { delay_ms: 100 }
    }

    /// Create a mock generator with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }

    async fn simulate_latency(&self) {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
    }
}

impl Default for MockReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// `"11/2"` for master numbers, plain digit otherwise.
fn core_number_label(n: u8) -> String {
    if n > 9 {
        format!("{}/{}", n, reduce_digits(u64::from(n), false))
    } else {
        n.to_string()
    }
}

fn element_balance(dominant: Element) -> AstrologicalBalance {
    let score = |e: Element| if e == dominant { 8.0 } else { 4.0 };
    AstrologicalBalance {
        fire: score(Element::Fire),
        earth: score(Element::Earth),
        air: score(Element::Air),
        water: score(Element::Water),
    }
}

fn element_compatibility(a: Element, b: Element) -> Compatibility {
    use Element::*;
    match (a, b) {
        _ if a == b => Compatibility::High,
        (Fire, Air) | (Air, Fire) | (Earth, Water) | (Water, Earth) => Compatibility::Medium,
        (Fire, Water) | (Water, Fire) | (Earth, Air) | (Air, Earth) => Compatibility::Low,
        _ => Compatibility::Neutral,
    }
}

fn mock_report(subject: &ReportSubject) -> CrmReport {
    let zodiac = zodiac_sign(&subject.birth_date);
    let birth = CalendarDate::parse_iso(&subject.birth_date);
    let life_path = birth.as_ref().map(day_number);
    let life_path_label = life_path
        .map(core_number_label)
        .unwrap_or_else(|| "?".into());
    let personal_year = subject
        .personal_year
        .map(|py| py.to_string())
        .unwrap_or_else(|| "?".into());
    let moon = birth
        .as_ref()
        .map(|d| lunar_phase(d).phase.name())
        .unwrap_or(NOT_PROVIDED);
    let chinese = cyclic_animal_sign(&subject.birth_date, &CHINESE_ZODIAC);
    let japanese = cyclic_animal_sign(&subject.birth_date, &JAPANESE_ZODIAC);

    let opportunity_level = match subject.personal_year {
        Some(1 | 3 | 8) => OpportunityLevel::High,
        Some(7 | 9) => OpportunityLevel::Low,
        _ => OpportunityLevel::Neutral,
    };

    CrmReport {
        core_numbers: Some(CoreNumbers {
            life_path_number: CoreNumberValue {
                number: life_path_label.clone(),
                summary: format!("[MOCK] Life Path {} from the birth date.", life_path_label),
            },
            expression_number: CoreNumberValue {
                number: "?".into(),
                summary: "[MOCK] Requires the model.".into(),
            },
            soul_urge_number: CoreNumberValue {
                number: "?".into(),
                summary: "[MOCK] Requires the model.".into(),
            },
            personality_number: "?".into(),
            birthday_number: birth
                .as_ref()
                .map(|d| d.day().to_string())
                .unwrap_or_else(|| "?".into()),
            maturity_number: "?".into(),
            hidden_passion_number: "?".into(),
            challenge_numbers: "?".into(),
            karmic_debt_numbers: "None".into(),
            personal_cycle: format!("Personal Year {}", personal_year),
        }),
        identity: IdentityLayer {
            archetype_title: format!("The {} {}", zodiac.element, zodiac.sign_name()),
            core_frequency_color: match zodiac.element {
                Element::Fire => "Crimson",
                Element::Earth => "Forest Green",
                Element::Air => "Sky Blue",
                Element::Water => "Deep Indigo",
            }
            .into(),
        },
        profile: BehaviourProfile {
            life_path_story_summary: format!(
                "[MOCK] {} walks Life Path {}.",
                subject.name, life_path_label
            ),
            moon_story: format!("[MOCK] Born under a {}.", moon),
            expression_number_behavior_type: "[MOCK] Configure an API key for the full reading."
                .into(),
            attachment_pattern: "[MOCK] Unknown.".into(),
        },
        weather: EnergeticWeather {
            personal_year_and_month_cycle: format!("[MOCK] Personal Year {}.", personal_year),
            major_transits: "[MOCK] No transit data offline.".into(),
            suggested_messaging_tone: format!("[MOCK] Speak to their {} nature.", zodiac.element),
            shadow_to_activated_state: "[MOCK] From hesitation to momentum.".into(),
        },
        guidance: Guidance {
            opportunity_level,
            best_way_to_influence: "[MOCK] Lead with shared goals.".into(),
            relationship_growth_path: "[MOCK] Regular, low-pressure check-ins.".into(),
            do_and_donot_approaches: "[MOCK] Do be specific. Don't overpromise.".into(),
            timing_recommendations: format!(
                "[MOCK] Days whose number is {} resonate most.",
                life_path_label
            ),
        },
        sections: vec![
            ReportSection::PersonalityArchetype(PersonalityArchetype {
                logic: 5.0,
                creativity: 5.0,
                intuition: 5.0,
                structure: 5.0,
                social: 5.0,
            }),
            ReportSection::ElementalBalance {
                balance: element_balance(zodiac.element),
                summary: Some(format!("[MOCK] {} dominant.", zodiac.element)),
            },
            ReportSection::ChineseZodiac(AnimalZodiac {
                animal_sign: chinese.into(),
                element: zodiac.element.to_string(),
                summary: "[MOCK] Derived from the birth year.".into(),
            }),
            ReportSection::JapaneseZodiac(AnimalZodiac {
                animal_sign: japanese.into(),
                element: zodiac.element.to_string(),
                summary: "[MOCK] Derived from the birth year.".into(),
            }),
            ReportSection::FinancialMatrix(FinancialMatrix {
                wealth_code_number: life_path_label.clone(),
                wealth_code_summary: "[MOCK] Offline estimate.".into(),
                investment_archetype: "The Patient Builder".into(),
                financial_cycle_theme: format!("Personal Year {}", personal_year),
                strategic_advice: vec!["[MOCK] Configure an API key.".into()],
            }),
        ],
    }
}

fn mock_pair(a: &Contact, b: &Contact) -> PairwiseAnalysis {
    let za = zodiac_sign(&a.birth_date);
    let zb = zodiac_sign(&b.birth_date);
    let sun = element_compatibility(za.element, zb.element);
    let life_path = match (
        a.report.as_ref().and_then(|r| r.life_path()),
        b.report.as_ref().and_then(|r| r.life_path()),
    ) {
        (Some(x), Some(y)) if x == y => Compatibility::High,
        (Some(_), Some(_)) => Compatibility::Medium,
        _ => Compatibility::Neutral,
    };
    let neutral = || SynergyBreakdown {
        compatibility: Compatibility::Neutral,
        analysis: "[MOCK] Needs birth time and location.".into(),
    };

    PairwiseAnalysis {
        contact1_name: a.name.clone(),
        contact2_name: b.name.clone(),
        synergy_type: format!("{} meets {}", za.element, zb.element),
        analysis: format!("[MOCK] {} and {}.", za.sign_name(), zb.sign_name()),
        sun_sign_synergy: SynergyBreakdown {
            compatibility: sun,
            analysis: format!("[MOCK] {} with {}.", za.element, zb.element),
        },
        moon_sign_synergy: neutral(),
        ascendant_sign_synergy: neutral(),
        life_path_synergy: SynergyBreakdown {
            compatibility: life_path,
            analysis: "[MOCK] Compared from stored reports.".into(),
        },
        expression_number_synergy: neutral(),
    }
}

#[async_trait::async_trait]
impl ReportGenerator for MockReportGenerator {
    async fn generate_report(&self, subject: &ReportSubject) -> Result<CrmReport, DomainError> {
        info!(name = %subject.name, "[MOCK] Simulating report generation");
        self.simulate_latency().await;
        Ok(mock_report(subject))
    }

    async fn generate_synergy(&self, contacts: &[Contact]) -> Result<SynergyReport, DomainError> {
        info!(members = contacts.len(), "[MOCK] Simulating synergy report");
        self.simulate_latency().await;

        let mut pairwise_analyses = Vec::new();
        for (i, a) in contacts.iter().enumerate() {
            for b in &contacts[i + 1..] {
                pairwise_analyses.push(mock_pair(a, b));
            }
        }
        let names: Vec<_> = contacts.iter().map(|c| c.name.as_str()).collect();

        Ok(SynergyReport {
            overall_summary: format!("[MOCK] Group of {}: {}.", names.len(), names.join(", ")),
            strengths: "[MOCK] Shared elements reinforce each other.".into(),
            challenges: "[MOCK] Opposing elements need translation.".into(),
            strategic_advice: "[MOCK] Pair complementary elements on projects.".into(),
            pairwise_analyses,
        })
    }

    async fn daily_briefing(&self, report: &CrmReport) -> Result<DailyBriefing, DomainError> {
        info!("[MOCK] Simulating daily briefing");
        self.simulate_latency().await;
        Ok(DailyBriefing {
            headline: format!("[MOCK] A day for {}", report.identity.archetype_title),
            key_priorities: vec![
                report.guidance.best_way_to_influence.clone(),
                report.guidance.relationship_growth_path.clone(),
            ],
            potential_challenge: report.weather.shadow_to_activated_state.clone(),
            key_superpower: report.profile.expression_number_behavior_type.clone(),
            mantra: "[MOCK] One step at a time.".into(),
        })
    }

    async fn analyze_journal(&self, content: &str) -> Result<JournalAnalysis, DomainError> {
        info!(entry_len = content.len(), "[MOCK] Simulating journal analysis");
        self.simulate_latency().await;
        let words = content.split_whitespace().count();
        Ok(JournalAnalysis {
            key_themes: format!("[MOCK] Reflection across {} words.", words),
            growth_opportunity: "[MOCK] Notice what repeats.".into(),
            reflection_question: "[MOCK] What would make tomorrow lighter?".into(),
        })
    }

    async fn lunar_insight(&self, phase: MoonPhase) -> Result<String, DomainError> {
        info!(phase = %phase, "[MOCK] Simulating lunar insight");
        self.simulate_latency().await;
        Ok(format!(
            "[MOCK] The {} invites you to align your actions with its rhythm.",
            phase
        ))
    }
}
