//! Daily insights: today's moon, cosmic snapshots of contacts, and the journal.
//!
//! Snapshots are computed locally. Only the lunar insight text and journal analysis
//! go through the report generator.

use crate::domain::numerology::{
    VIETNAMESE_ZODIAC, ZodiacResult, alignment_days, cyclic_animal_sign, day_number,
    personal_year_cycle, personal_year_for, zodiac_sign,
};
use crate::domain::{
    CalendarDate, Contact, DomainError, JournalEntry, LunarCache, LunarPhaseResult, lunar_phase,
};
use crate::ports::{JournalRepo, PreferencesPort, ReportGenerator};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Today's date (UTC).
pub fn today() -> CalendarDate {
    CalendarDate::from(Utc::now().date_naive())
}

/// Deterministic display values for one contact on a given day.
#[derive(Debug, Clone, PartialEq)]
pub struct CosmicSnapshot {
    pub zodiac: ZodiacResult,
    pub vietnamese_animal: &'static str,
    pub personal_year: Option<u8>,
    pub birth_moon: Option<LunarPhaseResult>,
}

impl CosmicSnapshot {
    pub fn personal_year_cycle(&self) -> Option<[(u8, bool); 9]> {
        self.personal_year.map(personal_year_cycle)
    }
}

pub fn snapshot(contact: &Contact, today: &CalendarDate) -> CosmicSnapshot {
    CosmicSnapshot {
        zodiac: zodiac_sign(&contact.birth_date),
        vietnamese_animal: cyclic_animal_sign(&contact.birth_date, &VIETNAMESE_ZODIAC),
        personal_year: personal_year_for(&contact.birth_date, today.year()),
        birth_moon: CalendarDate::parse_iso(&contact.birth_date).map(|d| lunar_phase(&d)),
    }
}

/// Life path for alignment: the report's number when present, else the birth date's
/// master-preserving day number.
pub fn life_path_of(contact: &Contact) -> Option<u8> {
    contact
        .report
        .as_ref()
        .and_then(|r| r.life_path())
        .or_else(|| CalendarDate::parse_iso(&contact.birth_date).map(|d| day_number(&d)))
}

/// Dates of `year` that resonate with the contact's life path.
pub fn alignment_days_for(contact: &Contact, year: i32) -> Vec<CalendarDate> {
    life_path_of(contact)
        .map(|lp| alignment_days(lp, year))
        .unwrap_or_default()
}

/// Today's moon with its insight.
#[derive(Debug, Clone, PartialEq)]
pub struct MoonToday {
    pub date: CalendarDate,
    pub phase: LunarPhaseResult,
    pub insight: String,
    /// Served from the per-day cache.
    pub cached: bool,
}

pub struct InsightService {
    generator: Arc<dyn ReportGenerator>,
    journal: Arc<dyn JournalRepo>,
    prefs: Arc<dyn PreferencesPort>,
}

impl InsightService {
    pub fn new(
        generator: Arc<dyn ReportGenerator>,
        journal: Arc<dyn JournalRepo>,
        prefs: Arc<dyn PreferencesPort>,
    ) -> Self {
        Self {
            generator,
            journal,
            prefs,
        }
    }

    /// Phase for `date` plus an insight, asked for at most once per calendar day.
    pub async fn moon_today(&self, date: CalendarDate) -> Result<MoonToday, DomainError> {
        let phase = lunar_phase(&date);
        let mut prefs = self.prefs.load().await?;

        if let Some(cache) = prefs.lunar_insight_for(&date) {
            debug!(date = %date, "lunar insight cache hit");
            return Ok(MoonToday {
                date,
                phase,
                insight: cache.insight.clone(),
                cached: true,
            });
        }

        let insight = self.generator.lunar_insight(phase.phase).await?;
        prefs.lunar_cache = Some(LunarCache {
            date: date.to_string(),
            phase: phase.phase,
            insight: insight.clone(),
        });
        self.prefs.save(&prefs).await?;
        info!(date = %date, phase = %phase.phase, "cached lunar insight");

        Ok(MoonToday {
            date,
            phase,
            insight,
            cached: false,
        })
    }

    /// Analyze and store a journal entry. The entry is kept even if analysis fails.
    pub async fn write_entry(
        &self,
        date: CalendarDate,
        content: &str,
    ) -> Result<JournalEntry, DomainError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation("Journal entry is empty".into()));
        }

        let analysis = match self.generator.analyze_journal(content).await {
            Ok(a) => Some(a),
            Err(e) => {
                warn!(error = %e, "journal analysis failed, saving entry without it");
                None
            }
        };

        let now = Utc::now();
        let entry = JournalEntry {
            id: now
                .timestamp_nanos_opt()
                .unwrap_or_else(|| now.timestamp_millis())
                .to_string(),
            date: date.to_string(),
            content: content.to_string(),
            analysis,
        };
        self.journal.save_entry(&entry).await?;
        info!(entry_id = %entry.id, analyzed = entry.analysis.is_some(), "journal entry saved");
        Ok(entry)
    }

    pub async fn entries(&self) -> Result<Vec<JournalEntry>, DomainError> {
        self.journal.list_entries().await
    }
}
