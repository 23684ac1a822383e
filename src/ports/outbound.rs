//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    ArchetypeTemplate, Contact, CrmReport, DailyBriefing, DomainError, JournalAnalysis,
    JournalEntry, MoonPhase, NewContact, ReportSubject, SynergyReport, ViewPreferences,
};

/// Structured report generation (LLM-backed in production).
///
/// The calendar and numerology core never calls this; only use cases do.
#[async_trait::async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Full profile report for one person.
    async fn generate_report(&self, subject: &ReportSubject) -> Result<CrmReport, DomainError>;

    /// Group dynamics for two or more contacts.
    async fn generate_synergy(&self, contacts: &[Contact]) -> Result<SynergyReport, DomainError>;

    /// Short actionable briefing derived from an existing report.
    async fn daily_briefing(&self, report: &CrmReport) -> Result<DailyBriefing, DomainError>;

    async fn analyze_journal(&self, content: &str) -> Result<JournalAnalysis, DomainError>;

    /// One or two sentences of guidance for today's moon phase.
    async fn lunar_insight(&self, phase: MoonPhase) -> Result<String, DomainError>;
}

/// Contact storage.
#[async_trait::async_trait]
pub trait ContactRepo: Send + Sync {
    async fn list_contacts(&self) -> Result<Vec<Contact>, DomainError>;

    /// Insert new contacts and return them with assigned ids (`"{unix_millis}-{index}"`).
    async fn insert_contacts(&self, contacts: &[NewContact]) -> Result<Vec<Contact>, DomainError>;

    /// Update identity fields of an existing contact. Report columns are untouched.
    async fn update_contact(&self, contact: &Contact) -> Result<(), DomainError>;

    async fn delete_contacts(&self, ids: &[String]) -> Result<(), DomainError>;

    /// Attach a report, also storing its financial cycle theme on the contact.
    async fn save_report(&self, contact_id: &str, report: &CrmReport) -> Result<(), DomainError>;
}

/// Saved report templates.
#[async_trait::async_trait]
pub trait ArchetypeRepo: Send + Sync {
    async fn list_archetypes(&self) -> Result<Vec<ArchetypeTemplate>, DomainError>;

    async fn find_archetype_for_contact(
        &self,
        contact_id: &str,
    ) -> Result<Option<ArchetypeTemplate>, DomainError>;

    /// Upsert keyed by the originating contact id. Returns the stored template.
    async fn save_archetype(
        &self,
        template: &ArchetypeTemplate,
    ) -> Result<ArchetypeTemplate, DomainError>;
}

#[async_trait::async_trait]
pub trait JournalRepo: Send + Sync {
    async fn save_entry(&self, entry: &JournalEntry) -> Result<(), DomainError>;

    /// Newest first.
    async fn list_entries(&self) -> Result<Vec<JournalEntry>, DomainError>;
}

/// Explicit load/save of view state between sessions.
#[async_trait::async_trait]
pub trait PreferencesPort: Send + Sync {
    async fn load(&self) -> Result<ViewPreferences, DomainError>;

    async fn save(&self, prefs: &ViewPreferences) -> Result<(), DomainError>;
}
