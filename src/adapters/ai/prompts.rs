//! Prompt templates and JSON response schemas for the report model.
//!
//! Schemas follow the OpenAI `json_schema` response format subset that Gemini's
//! compatible endpoint accepts: objects with every property required, strings, numbers,
//! arrays and string enums.

use crate::domain::{MoonPhase, ReportSubject};
use serde_json::{Value, json};

const NOT_PROVIDED: &str = "Not provided";

fn text(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn number(description: &str) -> Value {
    json!({ "type": "number", "description": description })
}

fn text_list(description: &str) -> Value {
    json!({ "type": "array", "items": { "type": "string" }, "description": description })
}

fn one_of(values: &[&str], description: &str) -> Value {
    json!({ "type": "string", "enum": values, "description": description })
}

/// Object schema with every property required.
fn object(properties: Value) -> Value {
    let required: Vec<Value> = properties
        .as_object()
        .map(|m| m.keys().cloned().map(Value::String).collect())
        .unwrap_or_default();
    json!({ "type": "object", "properties": properties, "required": required })
}

fn core_number_value(description: &str) -> Value {
    let mut schema = object(json!({
        "number": text("The calculated number, including master numbers (e.g. '8', '11/2', '22/4')."),
        "summary": text("A 1-2 sentence summary of this number's core meaning for the individual."),
    }));
    if let Some(m) = schema.as_object_mut() {
        m.insert("description".into(), Value::String(description.into()));
    }
    schema
}

fn core_numbers_schema() -> Value {
    object(json!({
        "lifePathNumber": core_number_value("The Life Path Number and its core meaning."),
        "expressionNumber": core_number_value("The Expression (Destiny) Number and its core meaning."),
        "soulUrgeNumber": core_number_value("The Soul Urge (Heart's Desire) Number and its core meaning."),
        "personalityNumber": text("The Personality Number and how they appear to others."),
        "birthdayNumber": text("The Birthday Number and its specific influence."),
        "maturityNumber": text("The Maturity Number, representing ultimate potential."),
        "hiddenPassionNumber": text("The Hidden Passion Number, revealing deep desires."),
        "challengeNumbers": text("Primary Challenge Numbers they must overcome."),
        "karmicDebtNumbers": text("Any Karmic Debt numbers (13, 14, 16, 19) present and their meanings."),
        "personalCycle": text("A summary of their current Personal Year, Month, and Day cycles."),
    }))
}

fn animal_zodiac_schema(tradition: &str, example: &str) -> Value {
    object(json!({
        "animalSign": text(&format!("The person's {tradition} zodiac animal sign (e.g. {example}).")),
        "element": text("The element of their birth year (Wood, Fire, Earth, Metal, Water)."),
        "summary": text("A 1-2 sentence summary of the sign and element's strategic implications."),
    }))
}

fn why_schema() -> Value {
    object(json!({
        "lifePathStorySummary": text("A 2-sentence strategic summary of their life's narrative arc based on numerology."),
        "moonStory": text("Their emotional processing strategy based on their moon sign, framed empoweringly."),
        "expressionNumberBehaviorType": text("Their primary mode of operation based on their expression number."),
        "attachmentPattern": text("Their likely attachment and trust style, with how to build trust with them."),
        "personalityArchetype": object(json!({
            "logic": number("1-10 score for analytical thinking."),
            "creativity": number("1-10 score for artistic and innovative expression."),
            "intuition": number("1-10 score for intuitive and empathetic ability."),
            "structure": number("1-10 score for discipline and planning."),
            "social": number("1-10 score for communication and desire for connection."),
        })),
        "astrologicalBalance": object(json!({
            "fire": number("1-10 score for Fire (passion, action)."),
            "earth": number("1-10 score for Earth (practicality, stability)."),
            "air": number("1-10 score for Air (intellect, communication)."),
            "water": number("1-10 score for Water (emotion, intuition)."),
        })),
        "astrologicalBalanceSummary": text("1-2 sentences on the dominant and weakest elements."),
        "humanDesign": object(json!({
            "type": text("Human Design Type (Manifestor, Generator, Manifesting Generator, Projector, Reflector)."),
            "strategy": text("Their Strategy for decision-making."),
            "innerAuthority": text("Their Inner Authority (e.g. Sacral, Emotional, Splenic)."),
            "profile": text("Their Profile (e.g. 6/2, 4/1)."),
            "definition": text("Their Definition (Single, Split, Triple Split, Quadruple Split)."),
            "centers": text("Defined and open centers (e.g. '7 Defined, 2 Open')."),
            "summary": text("1-2 sentences on what this configuration means for life and work."),
        })),
        "arabicEsoterics": object(json!({
            "abjadValue": number("Abjad numerical value of the full birth name."),
            "abjadNameMeaning": text("Esoteric meaning of the Abjad value."),
            "rulingPlanet": text("Ruling planet with its Arabic name (e.g. 'Jupiter (Al-Mushtari)')."),
            "dominantElement": text("Dominant element with its Arabic name (e.g. 'Fire (Al-Nar)')."),
            "esotericQuality": text("A descriptive title for their esoteric nature."),
            "strategicGuidance": text("1-2 sentences of actionable guidance."),
        })),
        "mayanAstrology": object(json!({
            "daySignName": text("Tzolkin Day Sign (Nahual), e.g. 'Imix'."),
            "daySignQualities": text("3-4 comma-separated archetypal qualities."),
            "daySignMeaning": text("Core essence of the Day Sign."),
            "galacticToneNumber": number("Galactic Tone, 1-13."),
            "galacticToneMeaning": text("How the Tone shapes the Day Sign."),
            "summary": text("1-2 sentence strategic synthesis."),
        })),
        "aztecAstrology": object(json!({
            "trecenaName": text("Ruling Trecena, e.g. '1 Crocodile'."),
            "trecenaMeaning": text("Theme of the Trecena."),
            "daySignName": text("Aztec Day Sign, e.g. 'Cipactli'."),
            "daySignQualities": text("3-4 comma-separated archetypal qualities."),
            "daySignMeaning": text("Core meaning of the Day Sign."),
            "lordOfTheNight": text("Lord of the Night, e.g. 'Xiuhtecuhtli'."),
            "lordOfTheNightInfluence": text("One sentence on this Lord's influence."),
            "summary": text("1-2 sentence strategic synthesis."),
        })),
        "egyptianAstrology": object(json!({
            "signName": text("Egyptian sign, e.g. 'The Nile'."),
            "rulingDeity": text("Ruling god or goddess."),
            "keyCharacteristics": text("3-5 comma-separated traits."),
            "strategicGuidance": text("1-2 sentences of actionable guidance."),
        })),
        "vedicAstrology": object(json!({
            "rashiMoonSign": text("Rashi (Moon Sign), e.g. 'Mesha - Aries'."),
            "nakshatraLunarMansion": text("Nakshatra and Pada, e.g. 'Ashwini Pada 1'."),
            "lagnaAscendant": text("Lagna (Ascendant), e.g. 'Simha - Leo'."),
            "currentDashaPeriod": text("Current major Dasha, e.g. 'Saturn Dasha'."),
            "keyPlanetaryInfluences": text("1-2 sentences on key placements."),
            "strategicGuidance": text("1-2 sentences of actionable guidance."),
        })),
        "chineseZodiac": animal_zodiac_schema("Chinese", "'Dragon', 'Rabbit'"),
        "japaneseZodiac": animal_zodiac_schema("Japanese (Junishi)", "'Dragon', 'Boar'"),
    }))
}

/// Schema for a full profile report.
pub fn report_schema() -> Value {
    object(json!({
        "coreNumbers": core_numbers_schema(),
        "identityLayer": object(json!({
            "archetypeTitle": text("A mythological or modern archetype title, like 'The Sovereign Architect'."),
            "coreFrequencyColor": text("A color for their core energetic frequency, with a brief explanation."),
        })),
        "whyTheyAreLikeThis": why_schema(),
        "energeticWeather": object(json!({
            "personalYearAndMonthCycle": text("Their current personal year and month cycle and what it means."),
            "majorTransits": text("Current major transits, highlighting pressure and opportunity zones."),
            "suggestedMessagingTone": text("The most effective tone to use when communicating with them today."),
            "shadowToActivatedState": text("Their primary shadow tendency mapped to its activated expression."),
        })),
        "whatToDoWithThem": object(json!({
            "opportunityLevel": one_of(&["High", "Neutral", "Low"], "Current opportunity level for proposals."),
            "bestWayToInfluence": text("The most effective way to influence or motivate them."),
            "relationshipGrowthPath": text("Key steps for growing the relationship."),
            "doAndDonotApproaches": text("A simple list of Do and Do Not approaches."),
            "timingRecommendations": text("Specific timing, e.g. 'talk this week', 'wait 3 days'."),
        })),
        "financialMatrix": object(json!({
            "wealthCodeNumber": text("Primary Wealth Code number with a 1-sentence explanation."),
            "wealthCodeSummary": text("2-3 sentences on innate financial strengths and weaknesses."),
            "investmentArchetype": text("Investment style archetype, e.g. 'The Stable Empire Builder'."),
            "financialCycleTheme": text("Financial theme of their current Personal Year."),
            "strategicAdvice": text_list("3-4 short, actionable pieces of financial advice."),
        })),
    }))
}

fn synergy_breakdown(description: &str) -> Value {
    let mut schema = object(json!({
        "compatibility": one_of(&["High", "Medium", "Low", "Neutral"], "Compatibility for this aspect."),
        "analysis": text("A 1-2 sentence analysis of this synergy point."),
    }));
    if let Some(m) = schema.as_object_mut() {
        m.insert("description".into(), Value::String(description.into()));
    }
    schema
}

pub fn synergy_schema() -> Value {
    let pairwise = object(json!({
        "contact1Name": { "type": "string" },
        "contact2Name": { "type": "string" },
        "synergyType": text("A title for this relationship, e.g. 'Creative Powerhouse'."),
        "analysis": text("2-3 sentences on the overall dynamic between the two."),
        "sunSignSynergy": synergy_breakdown("Sun sign compatibility (core identity)."),
        "moonSignSynergy": synergy_breakdown("Moon sign compatibility (emotional nature)."),
        "ascendantSignSynergy": synergy_breakdown("Ascendant compatibility (outward persona)."),
        "lifePathSynergy": synergy_breakdown("Life Path Number compatibility."),
        "expressionNumberSynergy": synergy_breakdown("Expression Number compatibility."),
    }));
    object(json!({
        "overallSummary": text("A high-level summary of the group's energetic dynamic."),
        "strengths": text("Primary strengths and positive synergies of the group."),
        "challenges": text("Potential friction points or blind spots."),
        "strategicAdvice": text("Actionable advice for the group's potential and harmony."),
        "pairwiseAnalyses": { "type": "array", "items": pairwise },
    }))
}

pub fn daily_briefing_schema() -> Value {
    object(json!({
        "headline": text("A catchy headline for the day's energy."),
        "keyPriorities": text_list("3 short, actionable priorities for the day."),
        "potentialChallenge": text("A key challenge or shadow aspect to watch today."),
        "keySuperpower": text("The superpower from their core numbers to leverage today."),
        "mantra": text("A concise, empowering mantra for the day."),
    }))
}

pub fn journal_schema() -> Value {
    object(json!({
        "keyThemes": text("The 2-3 core emotional or strategic themes of the entry."),
        "growthOpportunity": text("The single most significant growth opportunity right now."),
        "reflectionQuestion": text("One open-ended question to deepen reflection."),
    }))
}

fn or_not_provided(v: &Option<String>) -> &str {
    v.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or(NOT_PROVIDED)
}

pub fn report_prompt(subject: &ReportSubject) -> String {
    let personal_year = subject
        .personal_year
        .map(|py| py.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    format!(
        r#"You are a "Cosmic Relationship Manager". You synthesize numerology, astrology and other esoteric systems into a comprehensive, actionable profile. Your tone is insightful, empowering and clear.

First calculate the Core Numbers from the full birth name and birth date. Then fill every other section of the schema:
1. personalityArchetype: 1-10 scores for logic, creativity, intuition, structure and social.
2. astrologicalBalance: 1-10 scores for fire, earth, air and water, plus astrologicalBalanceSummary.
3. humanDesign: use birth date, time and location. Without a birth time, give the most likely configuration and say it is less precise.
4. arabicEsoterics: Ilm al-Huruf and Abjad numerology of the name.
5. mayanAstrology, aztecAstrology, egyptianAstrology: from the birth date.
6. vedicAstrology: sidereal chart from birth date, time and location.
7. chineseZodiac and japaneseZodiac: animal sign and element of the birth year (the Pig is the Boar in Japan).
8. financialMatrix: from the core numbers and the current Personal Year.

Person:
- Name: {name}
- Birth Date: {birth_date}
- Birth Time: {birth_time}
- Birth Location: {birth_location}
- Calculated Current Personal Year: {personal_year}

For energeticWeather.personalYearAndMonthCycle you MUST use the Personal Year {personal_year} given above. Do not calculate it yourself.
The whatToDoWithThem section must contain concrete, actionable advice."#,
        name = subject.name,
        birth_date = subject.birth_date,
        birth_time = or_not_provided(&subject.birth_time),
        birth_location = or_not_provided(&subject.birth_location),
    )
}

/// `group_csv` is the semicolon-delimited group table from `csv_utils::contacts_to_csv`.
pub fn synergy_prompt(group_csv: &str) -> String {
    format!(
        r#"You are a "Network Synergy Analyst", an expert in interpersonal dynamics through numerology and astrology.
Analyze the group below. Each row carries the person's birth data and, when available, their full report as JSON.

Group (CSV, Name;Birth Date;Birth Time;Birth Location;Report):
{group_csv}

Provide the overall summary, strengths, challenges and strategic advice for the group.
Then, for EVERY unique pair, give a 2-3 sentence analysis and a compatibility rating (High, Medium, Low, Neutral) with 1-2 sentences for each of: sun sign, moon sign (use moonStory), ascendant, life path (use lifePathNumber) and expression number."#
    )
}

pub fn daily_briefing_prompt(report_json: &str) -> String {
    format!(
        r#"You are a "Cosmic Strategist". Condense the profile report below into a concise, actionable daily briefing for this person today.
Use energeticWeather as the primary lens for today and combine it with coreNumbers and identity. Be sharp and empowering.

Report:
{report_json}"#
    )
}

pub fn journal_prompt(entry: &str) -> String {
    format!(
        r#"You are a "Cosmic Strategist" with deep wisdom in psychology, spirituality and high-performance coaching.
Distill the journal entry below into high-level strategic insight. No generic advice.

Journal entry:
"{entry}""#
    )
}

pub fn lunar_prompt(phase: MoonPhase) -> String {
    format!(
        "You are a \"Cosmic Strategist\". Give a brief, actionable strategic insight for the current lunar phase: {phase}. \
         Focus on its influence on emotions, energy and key decisions for a high-achieving executive. \
         Answer with a single paragraph of 2-3 sentences."
    )
}

/// Wraps a schema as an OpenAI `response_format.json_schema` payload body.
pub fn named_schema(name: &str, schema: Value) -> Value {
    json!({ "name": name, "schema": schema })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> ReportSubject {
        ReportSubject {
            name: "Ada Lovelace".into(),
            birth_date: "1815-12-10".into(),
            birth_time: None,
            birth_location: Some("London".into()),
            personal_year: Some(4),
        }
    }

    #[test]
    fn test_report_prompt_pins_personal_year() {
        let p = report_prompt(&subject());
        assert!(p.contains("- Name: Ada Lovelace"));
        assert!(p.contains("- Birth Time: Not provided"));
        assert!(p.contains("- Birth Location: London"));
        assert!(p.contains("Calculated Current Personal Year: 4"));
        assert!(p.contains("MUST use the Personal Year 4"));
    }

    #[test]
    fn test_object_requires_every_property() {
        let schema = report_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 6);
        let why_required = schema["properties"]["whyTheyAreLikeThis"]["required"]
            .as_array()
            .unwrap();
        assert!(why_required.contains(&Value::String("japaneseZodiac".into())));
        assert_eq!(
            schema["properties"]["whatToDoWithThem"]["properties"]["opportunityLevel"]["enum"],
            json!(["High", "Neutral", "Low"])
        );
    }

    #[test]
    fn test_synergy_schema_nests_pairwise_items() {
        let schema = synergy_schema();
        let items = &schema["properties"]["pairwiseAnalyses"]["items"];
        assert_eq!(items["required"].as_array().unwrap().len(), 9);
        assert_eq!(
            items["properties"]["sunSignSynergy"]["description"],
            "Sun sign compatibility (core identity)."
        );
    }

    #[test]
    fn test_lunar_prompt_names_phase() {
        assert!(lunar_prompt(MoonPhase::WaningGibbous).contains("Waning Gibbous"));
    }
}
