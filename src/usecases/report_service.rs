//! Report service. Orchestrates report generation, archetype templates and export.
//!
//! Coordinates between the report generator (model), the contact and archetype
//! repositories, and the filesystem (Markdown reports).

use crate::domain::numerology::{current_year, personal_year_for};
use crate::domain::{
    ArchetypeTemplate, Contact, CrmReport, DailyBriefing, DomainError, OriginalContact,
    ReportSubject, SynergyReport,
};
use crate::ports::{ArchetypeRepo, ContactRepo, ReportGenerator};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

/// What the generator is told about `contact`, with the Personal Year for `reference_year`.
pub fn subject_for(contact: &Contact, reference_year: i32) -> ReportSubject {
    ReportSubject {
        name: contact.name.clone(),
        birth_date: contact.birth_date.clone(),
        birth_time: contact.birth_time.clone(),
        birth_location: contact.birth_location.clone(),
        personal_year: personal_year_for(&contact.birth_date, reference_year),
    }
}

/// Result of a batch run. One failure never aborts the rest.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub succeeded: usize,
    /// `(contact name, error message)`
    pub failed: Vec<(String, String)>,
}

fn file_slug(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "contact".to_string()
    } else {
        slug.to_string()
    }
}

/// Render a contact's report as Markdown.
pub fn report_markdown(contact: &Contact, report: &CrmReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", contact.name));
    md.push_str(&format!(
        "**Born:** {} | **Time:** {} | **Place:** {}\n\n",
        contact.birth_date,
        contact.birth_time.as_deref().unwrap_or("Not provided"),
        contact.birth_location.as_deref().unwrap_or("Not provided"),
    ));
    md.push_str(&format!(
        "## {} ({})\n\n",
        report.identity.archetype_title, report.identity.core_frequency_color
    ));
    md.push_str("---\n\n");

    if let Some(core) = &report.core_numbers {
        md.push_str("## 🔢 Core Numbers\n\n");
        for (label, value) in [
            ("Life Path", &core.life_path_number),
            ("Expression", &core.expression_number),
            ("Soul Urge", &core.soul_urge_number),
        ] {
            md.push_str(&format!("- **{}:** {} ({})\n", label, value.number, value.summary));
        }
        md.push_str(&format!("- **Personality:** {}\n", core.personality_number));
        md.push_str(&format!("- **Birthday:** {}\n", core.birthday_number));
        md.push_str(&format!("- **Maturity:** {}\n", core.maturity_number));
        md.push_str(&format!("- **Hidden Passion:** {}\n", core.hidden_passion_number));
        md.push_str(&format!("- **Challenges:** {}\n", core.challenge_numbers));
        md.push_str(&format!("- **Karmic Debt:** {}\n", core.karmic_debt_numbers));
        md.push_str(&format!("- **Cycle:** {}\n\n", core.personal_cycle));
    }

    md.push_str("## 🧭 Why They Are Like This\n\n");
    md.push_str(&format!("{}\n\n", report.profile.life_path_story_summary));
    md.push_str(&format!("- **Moon:** {}\n", report.profile.moon_story));
    md.push_str(&format!(
        "- **Expression:** {}\n",
        report.profile.expression_number_behavior_type
    ));
    md.push_str(&format!(
        "- **Attachment:** {}\n\n",
        report.profile.attachment_pattern
    ));

    md.push_str("## 🌦️ Energetic Weather\n\n");
    md.push_str(&format!(
        "- **Cycle:** {}\n",
        report.weather.personal_year_and_month_cycle
    ));
    md.push_str(&format!("- **Transits:** {}\n", report.weather.major_transits));
    md.push_str(&format!(
        "- **Messaging tone:** {}\n",
        report.weather.suggested_messaging_tone
    ));
    md.push_str(&format!(
        "- **Shadow to activated:** {}\n\n",
        report.weather.shadow_to_activated_state
    ));

    md.push_str("## 🚀 What To Do With Them\n\n");
    md.push_str(&format!(
        "**Opportunity:** {}\n\n",
        report.guidance.opportunity_level
    ));
    md.push_str(&format!(
        "- **Influence:** {}\n",
        report.guidance.best_way_to_influence
    ));
    md.push_str(&format!(
        "- **Growth path:** {}\n",
        report.guidance.relationship_growth_path
    ));
    md.push_str(&format!(
        "- **Do / Don't:** {}\n",
        report.guidance.do_and_donot_approaches
    ));
    md.push_str(&format!(
        "- **Timing:** {}\n\n",
        report.guidance.timing_recommendations
    ));

    for section in &report.sections {
        md.push_str(&format!("## {}\n\n", section.title()));
        for (label, value) in section.fields() {
            md.push_str(&format!("- **{}:** {}\n", label, value));
        }
        md.push('\n');
    }

    if let Some(notes) = &contact.notes {
        md.push_str("## 📝 Notes\n\n");
        md.push_str(notes);
        md.push_str("\n\n");
    }

    md.push_str("---\n");
    md.push_str(&format!(
        "*Generated by cosmic-crm on {}*\n",
        Utc::now().format("%Y-%m-%d")
    ));
    md
}

/// Service for report workflows.
pub struct ReportService {
    generator: Arc<dyn ReportGenerator>,
    contacts: Arc<dyn ContactRepo>,
    archetypes: Arc<dyn ArchetypeRepo>,
    reports_dir: PathBuf,
}

impl ReportService {
    /// Create a new report service.
    ///
    /// # Arguments
    /// * `generator` - report generator (OpenAI-compatible, Mock, etc.)
    /// * `contacts` - contact repository
    /// * `archetypes` - archetype template repository
    /// * `reports_dir` - directory for Markdown exports
    pub fn new(
        generator: Arc<dyn ReportGenerator>,
        contacts: Arc<dyn ContactRepo>,
        archetypes: Arc<dyn ArchetypeRepo>,
        reports_dir: PathBuf,
    ) -> Self {
        Self {
            generator,
            contacts,
            archetypes,
            reports_dir,
        }
    }

    /// Generate and persist a report. Returns the contact with the report attached.
    pub async fn generate(&self, contact: &Contact) -> Result<Contact, DomainError> {
        let subject = subject_for(contact, current_year());
        let report = self.generator.generate_report(&subject).await?;
        self.contacts.save_report(&contact.id, &report).await?;
        info!(contact_id = %contact.id, "report saved");

        let mut updated = contact.clone();
        updated.financial_cycle_theme = report.financial_cycle_theme();
        updated.report = Some(report);
        Ok(updated)
    }

    /// Generate reports one after another for every contact in `contacts` that lacks one.
    ///
    /// `on_done` is called after each attempt with whether it succeeded.
    pub async fn generate_batch<F>(&self, contacts: &[Contact], mut on_done: F) -> BatchOutcome
    where
        F: FnMut(&Contact, bool) + Send,
    {
        let pending: Vec<&Contact> = contacts.iter().filter(|c| !c.has_report()).collect();
        info!(
            selected = contacts.len(),
            pending = pending.len(),
            "starting batch generation"
        );

        let mut outcome = BatchOutcome::default();
        for contact in pending {
            match self.generate(contact).await {
                Ok(_) => {
                    outcome.succeeded += 1;
                    on_done(contact, true);
                }
                Err(e) => {
                    warn!(contact_id = %contact.id, error = %e, "batch item failed");
                    outcome.failed.push((contact.name.clone(), e.to_string()));
                    on_done(contact, false);
                }
            }
        }

        info!(
            succeeded = outcome.succeeded,
            failed = outcome.failed.len(),
            "batch generation complete"
        );
        outcome
    }

    pub async fn archetypes(&self) -> Result<Vec<ArchetypeTemplate>, DomainError> {
        self.archetypes.list_archetypes().await
    }

    /// The saved template for `contact`, if any. Callers confirm before overwriting.
    pub async fn existing_archetype(
        &self,
        contact: &Contact,
    ) -> Result<Option<ArchetypeTemplate>, DomainError> {
        self.archetypes.find_archetype_for_contact(&contact.id).await
    }

    /// Save the contact's current report as a named template. Re-saving for the same
    /// contact overwrites the name, report and identity snapshot.
    pub async fn save_archetype(
        &self,
        contact: &Contact,
        name: &str,
    ) -> Result<ArchetypeTemplate, DomainError> {
        let report = contact.report.clone().ok_or_else(|| {
            DomainError::Validation(format!("{} has no report to save", contact.name))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("Archetype name is required".into()));
        }
        let template = ArchetypeTemplate {
            id: format!("archetype-{}", contact.id),
            name: name.to_string(),
            report,
            original_contact: OriginalContact {
                id: contact.id.clone(),
                identity: contact.identity(),
            },
        };
        self.archetypes.save_archetype(&template).await
    }

    /// Fresh report from the template's original contact data. Nothing is persisted.
    pub async fn regenerate_from_archetype(
        &self,
        template: &ArchetypeTemplate,
    ) -> Result<Contact, DomainError> {
        let mut contact = template.to_contact();
        let subject = subject_for(&contact, current_year());
        let report = self.generator.generate_report(&subject).await?;
        info!(archetype = %template.name, "regenerated live report from archetype");
        contact.financial_cycle_theme = report.financial_cycle_theme();
        contact.report = Some(report);
        Ok(contact)
    }

    /// Group dynamics for two or more contacts.
    pub async fn synergy(&self, contacts: &[Contact]) -> Result<SynergyReport, DomainError> {
        if contacts.len() < 2 {
            return Err(DomainError::Validation(
                "Select at least two contacts for a synergy report".into(),
            ));
        }
        self.generator.generate_synergy(contacts).await
    }

    pub async fn daily_briefing(&self, contact: &Contact) -> Result<DailyBriefing, DomainError> {
        let report = contact.report.as_ref().ok_or_else(|| {
            DomainError::Validation(format!("{} has no report yet", contact.name))
        })?;
        self.generator.daily_briefing(report).await
    }

    /// Write the contact's report as Markdown into the reports directory.
    pub async fn export_markdown(&self, contact: &Contact) -> Result<PathBuf, DomainError> {
        let report = contact.report.as_ref().ok_or_else(|| {
            DomainError::Validation(format!("{} has no report to export", contact.name))
        })?;

        fs::create_dir_all(&self.reports_dir)
            .await
            .map_err(|e| DomainError::Repo(format!("Failed to create reports dir: {}", e)))?;

        let filename = format!("report_{}_{}.md", file_slug(&contact.name), contact.id);
        let path = self.reports_dir.join(filename);
        fs::write(&path, report_markdown(contact, report))
            .await
            .map_err(|e| DomainError::Repo(format!("Failed to write report: {}", e)))?;

        info!(path = %path.display(), "report exported");
        Ok(path)
    }
}
