//! Model-facing report shape and its conversion into [`CrmReport`].
//!
//! The model answers with the nested layout the response schema asks for (optional
//! systems live under `whyTheyAreLikeThis`). Sections are lifted out into the tagged list.

use crate::domain::report::{
    AnimalZodiac, ArabicEsoterics, AstrologicalBalance, AztecAstrology, BehaviourProfile,
    CoreNumbers, CrmReport, EgyptianAstrology, EnergeticWeather, FinancialMatrix, Guidance,
    HumanDesign, IdentityLayer, MayanAstrology, PersonalityArchetype, ReportSection,
    VedicAstrology,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireReport {
    #[serde(default)]
    core_numbers: Option<CoreNumbers>,
    identity_layer: IdentityLayer,
    why_they_are_like_this: WireWhy,
    energetic_weather: EnergeticWeather,
    what_to_do_with_them: Guidance,
    #[serde(default)]
    financial_matrix: Option<FinancialMatrix>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireWhy {
    #[serde(flatten)]
    profile: BehaviourProfile,
    #[serde(default)]
    personality_archetype: Option<PersonalityArchetype>,
    #[serde(default)]
    astrological_balance: Option<AstrologicalBalance>,
    #[serde(default)]
    astrological_balance_summary: Option<String>,
    #[serde(default)]
    human_design: Option<HumanDesign>,
    #[serde(default)]
    arabic_esoterics: Option<ArabicEsoterics>,
    #[serde(default)]
    mayan_astrology: Option<MayanAstrology>,
    #[serde(default)]
    aztec_astrology: Option<AztecAstrology>,
    #[serde(default)]
    egyptian_astrology: Option<EgyptianAstrology>,
    #[serde(default)]
    vedic_astrology: Option<VedicAstrology>,
    #[serde(default)]
    chinese_zodiac: Option<AnimalZodiac>,
    #[serde(default)]
    japanese_zodiac: Option<AnimalZodiac>,
}

impl From<WireReport> for CrmReport {
    fn from(wire: WireReport) -> Self {
        let why = wire.why_they_are_like_this;
        let balance = why
            .astrological_balance
            .map(|balance| ReportSection::ElementalBalance {
                balance,
                summary: why.astrological_balance_summary,
            });

        let sections = [
            why.personality_archetype.map(ReportSection::PersonalityArchetype),
            balance,
            why.human_design.map(ReportSection::HumanDesign),
            why.arabic_esoterics.map(ReportSection::ArabicEsoterics),
            why.mayan_astrology.map(ReportSection::Mayan),
            why.aztec_astrology.map(ReportSection::Aztec),
            why.egyptian_astrology.map(ReportSection::Egyptian),
            why.vedic_astrology.map(ReportSection::Vedic),
            why.chinese_zodiac.map(ReportSection::ChineseZodiac),
            why.japanese_zodiac.map(ReportSection::JapaneseZodiac),
            wire.financial_matrix.map(ReportSection::FinancialMatrix),
        ]
        .into_iter()
        .flatten()
        .collect();

        CrmReport {
            core_numbers: wire.core_numbers,
            identity: wire.identity_layer,
            profile: why.profile,
            weather: wire.energetic_weather,
            guidance: wire.what_to_do_with_them,
            sections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::OpportunityLevel;

    const MINIMAL: &str = r#"{
        "identityLayer": {"archetypeTitle": "The Sovereign Architect", "coreFrequencyColor": "Gold"},
        "whyTheyAreLikeThis": {
            "lifePathStorySummary": "Builds things.",
            "moonStory": "Feels deeply.",
            "expressionNumberBehaviorType": "Leader.",
            "attachmentPattern": "Slow to trust."
        },
        "energeticWeather": {
            "personalYearAndMonthCycle": "Year 8.",
            "majorTransits": "Jupiter.",
            "suggestedMessagingTone": "Direct.",
            "shadowToActivatedState": "Control to stewardship."
        },
        "whatToDoWithThem": {
            "opportunityLevel": "Neutral",
            "bestWayToInfluence": "Data.",
            "relationshipGrowthPath": "Shared goals.",
            "doAndDonotApproaches": "Do prepare.",
            "timingRecommendations": "Next week."
        }
    }"#;

    #[test]
    fn test_minimal_report_has_no_sections() {
        let wire: WireReport = serde_json::from_str(MINIMAL).unwrap();
        let report = CrmReport::from(wire);
        assert!(report.core_numbers.is_none());
        assert!(report.sections.is_empty());
        assert_eq!(report.guidance.opportunity_level, OpportunityLevel::Neutral);
        assert_eq!(report.profile.moon_story, "Feels deeply.");
    }

    #[test]
    fn test_optional_systems_become_sections_in_order() {
        let mut value: serde_json::Value = serde_json::from_str(MINIMAL).unwrap();
        let why = &mut value["whyTheyAreLikeThis"];
        why["astrologicalBalance"] =
            serde_json::json!({"fire": 8, "earth": 3, "air": 6, "water": 2});
        why["astrologicalBalanceSummary"] = "Fire-led.".into();
        why["chineseZodiac"] =
            serde_json::json!({"animalSign": "Dragon", "element": "Metal", "summary": "Bold."});
        why["personalityArchetype"] = serde_json::json!(
            {"logic": 7, "creativity": 6, "intuition": 5, "structure": 9, "social": 4}
        );
        value["financialMatrix"] = serde_json::json!({
            "wealthCodeNumber": "8", "wealthCodeSummary": "Empire builder.",
            "investmentArchetype": "The Stable Empire Builder",
            "financialCycleTheme": "Expansion", "strategicAdvice": ["Scale"]
        });

        let report = CrmReport::from(serde_json::from_value::<WireReport>(value).unwrap());
        let titles: Vec<_> = report.sections.iter().map(|s| s.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Personality Archetype",
                "Elemental Balance",
                "Chinese Zodiac",
                "Financial Matrix"
            ]
        );
        assert_eq!(report.financial_cycle_theme().as_deref(), Some("Expansion"));
        match &report.sections[1] {
            ReportSection::ElementalBalance { balance, summary } => {
                assert_eq!(balance.dominant(), "Fire");
                assert_eq!(summary.as_deref(), Some("Fire-led."));
            }
            other => panic!("unexpected section {other:?}"),
        }
    }
}
