//! Implements InputPort. Inquire-based interactive menus.
//!
//! Main menu -> Profiles / Synergy / Archetypes / Moon Moves / Journal, plus contact
//! entry, bulk import and batch generation. Prompts are skippable with Esc.

use super::banner::{NEBULA_VIOLET, STAR_GOLD};
use super::progress;
use crate::domain::numerology::{day_number, personal_year_cycle};
use crate::domain::preferences::CrmView;
use crate::domain::report::{OpportunityLevel, PairwiseAnalysis};
use crate::domain::{
    ArchetypeTemplate, CalendarDate, Contact, CrmReport, DailyBriefing, DomainError,
    JournalEntry, NewContact, ParseOutcome, ReportFilter, ReportSection, SortConfig,
    SynergyReport, ViewPreferences, lunar_phase,
};
use crate::ports::{InputPort, PreferencesPort};
use crate::usecases::insight_service::{alignment_days_for, snapshot, today};
use crate::usecases::{ContactService, InsightService, ReportService};
use async_trait::async_trait;
use crossterm::style::Stylize;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::{Confirm, InquireError, MultiSelect, Select, Text};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Apply the cosmic color theme to every inquire prompt.
pub fn apply_theme() {
    let violet = Color::Rgb {
        r: NEBULA_VIOLET.0,
        g: NEBULA_VIOLET.1,
        b: NEBULA_VIOLET.2,
    };
    let gold = Color::Rgb {
        r: STAR_GOLD.0,
        g: STAR_GOLD.1,
        b: STAR_GOLD.2,
    };

    let mut config = RenderConfig::default_colored();
    config.prompt_prefix = Styled::new("✦").with_fg(gold);
    config.answered_prompt_prefix = Styled::new("✔").with_fg(violet);
    config.highlighted_option_prefix = Styled::new("➤").with_fg(gold);
    config.selected_checkbox = Styled::new("◉").with_fg(gold);
    config.unselected_checkbox = Styled::new("○").with_fg(violet);
    config.answer = StyleSheet::new().with_attr(Attributes::BOLD).with_fg(gold);
    config.help_message = StyleSheet::new().with_fg(violet);
    inquire::set_global_render_config(config);
}

fn ui_err(e: InquireError) -> DomainError {
    DomainError::Ui(e.to_string())
}

fn heading(title: &str) {
    println!();
    println!("{}", format!("✦ {} ✦", title).bold().magenta());
}

fn field(label: &str, value: &str) {
    println!("  {} {}", format!("{label}:").yellow(), value);
}

fn report_error(e: &DomainError) {
    println!("{}", format!("✖ {}", e).red());
}

/// Score on a 1-10 scale as a bar.
fn score_bar(score: f64) -> String {
    let filled = score.clamp(0.0, 10.0).round() as usize;
    format!("{}{} {:.1}", "█".repeat(filled), "░".repeat(10 - filled), score)
}

/// The nine-year cycle with the current year bracketed.
fn cycle_line(current: u8) -> String {
    personal_year_cycle(current)
        .iter()
        .map(|(year, is_current)| {
            if *is_current {
                format!("[{year}]")
            } else {
                year.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainAction {
    Profiles,
    AddContact,
    BulkImport,
    BatchGenerate,
    Synergy,
    Archetypes,
    MoonMoves,
    Journal,
    SearchSort,
    Exit,
}

impl MainAction {
    const ALL: [MainAction; 10] = [
        MainAction::Profiles,
        MainAction::AddContact,
        MainAction::BulkImport,
        MainAction::BatchGenerate,
        MainAction::Synergy,
        MainAction::Archetypes,
        MainAction::MoonMoves,
        MainAction::Journal,
        MainAction::SearchSort,
        MainAction::Exit,
    ];

    /// Remembered top-level view for this action, if it is one.
    fn view(self) -> Option<CrmView> {
        match self {
            MainAction::Profiles => Some(CrmView::Profiles),
            MainAction::Synergy => Some(CrmView::Synergy),
            MainAction::Archetypes => Some(CrmView::Archetypes),
            MainAction::MoonMoves => Some(CrmView::MoonMoves),
            MainAction::Journal => Some(CrmView::Journal),
            _ => None,
        }
    }

    fn cursor_for(view: CrmView) -> usize {
        Self::ALL
            .iter()
            .position(|a| a.view() == Some(view))
            .unwrap_or(0)
    }
}

impl fmt::Display for MainAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MainAction::Profiles => "👤 Profiles",
            MainAction::AddContact => "➕ Add contact",
            MainAction::BulkImport => "📥 Bulk import",
            MainAction::BatchGenerate => "⚡ Generate missing reports",
            MainAction::Synergy => "🔗 Network synergy",
            MainAction::Archetypes => "🏛  Archetypes",
            MainAction::MoonMoves => "🌙 Moon moves",
            MainAction::Journal => "📓 Journal",
            MainAction::SearchSort => "🔎 Search, filter & sort",
            MainAction::Exit => "🚪 Exit",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContactAction {
    ViewReport,
    Snapshot,
    Generate,
    Briefing,
    SaveArchetype,
    Export,
    Edit,
    Delete,
    Back,
}

impl ContactAction {
    fn for_contact(contact: &Contact) -> Vec<ContactAction> {
        let mut actions = Vec::new();
        if contact.has_report() {
            actions.push(ContactAction::ViewReport);
        }
        actions.push(ContactAction::Snapshot);
        actions.push(ContactAction::Generate);
        if contact.has_report() {
            actions.extend([
                ContactAction::Briefing,
                ContactAction::SaveArchetype,
                ContactAction::Export,
            ]);
        }
        actions.extend([ContactAction::Edit, ContactAction::Delete, ContactAction::Back]);
        actions
    }
}

impl fmt::Display for ContactAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContactAction::ViewReport => "View report",
            ContactAction::Snapshot => "Cosmic snapshot",
            ContactAction::Generate => "Generate report",
            ContactAction::Briefing => "Daily briefing",
            ContactAction::SaveArchetype => "Save as archetype",
            ContactAction::Export => "Export Markdown",
            ContactAction::Edit => "Edit",
            ContactAction::Delete => "Delete",
            ContactAction::Back => "Back",
        };
        f.write_str(s)
    }
}

/// Select option wrapping a contact.
struct ContactChoice<'a>(&'a Contact);

impl fmt::Display for ContactChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        match &c.report {
            Some(r) => write!(
                f,
                "{} ({}) ✦ {}",
                c.name, c.birth_date, r.identity.archetype_title
            ),
            None => write!(f, "{} ({}) · no report", c.name, c.birth_date),
        }
    }
}

struct ArchetypeChoice<'a>(&'a ArchetypeTemplate);

impl fmt::Display for ArchetypeChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (from {})",
            self.0.name, self.0.original_contact.identity.name
        )
    }
}

struct EntryChoice<'a>(&'a JournalEntry);

impl fmt::Display for EntryChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.0.content.chars().take(48).collect();
        let ellipsis = if self.0.content.chars().count() > 48 { "…" } else { "" };
        write!(f, "{}  {}{}", self.0.date, preview, ellipsis)
    }
}

fn print_report(contact: &Contact, report: &CrmReport) {
    heading(&format!(
        "{} · {}",
        contact.name, report.identity.archetype_title
    ));
    field("Frequency", &report.identity.core_frequency_color);

    if let Some(core) = &report.core_numbers {
        heading("Core Numbers");
        field(
            "Life Path",
            &format!("{} ({})", core.life_path_number.number, core.life_path_number.summary),
        );
        field(
            "Expression",
            &format!("{} ({})", core.expression_number.number, core.expression_number.summary),
        );
        field(
            "Soul Urge",
            &format!("{} ({})", core.soul_urge_number.number, core.soul_urge_number.summary),
        );
        field("Personality", &core.personality_number);
        field("Birthday", &core.birthday_number);
        field("Maturity", &core.maturity_number);
        field("Hidden Passion", &core.hidden_passion_number);
        field("Challenges", &core.challenge_numbers);
        field("Karmic Debt", &core.karmic_debt_numbers);
        field("Cycle", &core.personal_cycle);
    }

    heading("Why They Are Like This");
    field("Life Path Story", &report.profile.life_path_story_summary);
    field("Moon", &report.profile.moon_story);
    field("Expression", &report.profile.expression_number_behavior_type);
    field("Attachment", &report.profile.attachment_pattern);

    heading("Energetic Weather");
    field("Cycle", &report.weather.personal_year_and_month_cycle);
    field("Transits", &report.weather.major_transits);
    field("Messaging Tone", &report.weather.suggested_messaging_tone);
    field("Shadow → Activated", &report.weather.shadow_to_activated_state);

    heading("What To Do With Them");
    let level = report.guidance.opportunity_level.to_string();
    let level = match report.guidance.opportunity_level {
        OpportunityLevel::High => level.green(),
        OpportunityLevel::Neutral => level.yellow(),
        OpportunityLevel::Low => level.red(),
    };
    println!("  {} {}", "Opportunity:".yellow(), level.bold());
    field("Influence", &report.guidance.best_way_to_influence);
    field("Growth Path", &report.guidance.relationship_growth_path);
    field("Do / Don't", &report.guidance.do_and_donot_approaches);
    field("Timing", &report.guidance.timing_recommendations);

    for section in &report.sections {
        heading(section.title());
        match section {
            ReportSection::PersonalityArchetype(p) => {
                for (label, score) in [
                    ("Logic", p.logic),
                    ("Creativity", p.creativity),
                    ("Intuition", p.intuition),
                    ("Structure", p.structure),
                    ("Social", p.social),
                ] {
                    println!("  {} {}", format!("{label:<11}").yellow(), score_bar(score));
                }
            }
            ReportSection::ElementalBalance { balance, summary } => {
                for (label, score) in [
                    ("Fire", balance.fire),
                    ("Earth", balance.earth),
                    ("Air", balance.air),
                    ("Water", balance.water),
                ] {
                    println!("  {} {}", format!("{label:<11}").yellow(), score_bar(score));
                }
                field("Dominant", balance.dominant());
                if let Some(s) = summary {
                    field("Summary", s);
                }
            }
            other => {
                for (label, value) in other.fields() {
                    field(label, &value);
                }
            }
        }
    }
}

fn print_briefing(contact: &Contact, briefing: &DailyBriefing) {
    heading(&format!("Daily Briefing · {}", contact.name));
    println!("  {}", briefing.headline.as_str().bold());
    for (i, priority) in briefing.key_priorities.iter().enumerate() {
        println!("  {}. {}", i + 1, priority);
    }
    field("Watch out for", &briefing.potential_challenge);
    field("Superpower", &briefing.key_superpower);
    field("Mantra", &briefing.mantra);
}

fn print_pair(pair: &PairwiseAnalysis) {
    heading(&format!(
        "{} × {} · {}",
        pair.contact1_name, pair.contact2_name, pair.synergy_type
    ));
    println!("  {}", pair.analysis);
    for (label, breakdown) in pair.breakdowns() {
        field(
            label,
            &format!("{} ({})", breakdown.compatibility, breakdown.analysis),
        );
    }
}

fn print_synergy(report: &SynergyReport) {
    heading("Network Synergy");
    println!("  {}", report.overall_summary);
    field("Strengths", &report.strengths);
    field("Challenges", &report.challenges);
    field("Strategic Advice", &report.strategic_advice);
    for pair in &report.pairwise_analyses {
        print_pair(pair);
    }
}

fn print_import_preview(outcome: &ParseOutcome) {
    println!(
        "  {} / {}",
        format!("{} ready", outcome.contacts.len()).green(),
        format!("{} errors", outcome.errors.len()).red()
    );
    for message in outcome.error_messages() {
        println!("  {}", message.red());
    }
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    contacts: Arc<ContactService>,
    reports: Arc<ReportService>,
    insights: Arc<InsightService>,
    prefs: Arc<dyn PreferencesPort>,
}

impl TuiInputPort {
    pub fn new(
        contacts: Arc<ContactService>,
        reports: Arc<ReportService>,
        insights: Arc<InsightService>,
        prefs: Arc<dyn PreferencesPort>,
    ) -> Self {
        Self {
            contacts,
            reports,
            insights,
            prefs,
        }
    }

    async fn remember_view(&self, view: CrmView) -> Result<(), DomainError> {
        let mut prefs = self.prefs.load().await?;
        if prefs.view != view {
            prefs.view = view;
            self.prefs.save(&prefs).await?;
        }
        Ok(())
    }

    async fn dispatch(&self, action: MainAction) -> Result<(), DomainError> {
        if let Some(view) = action.view() {
            self.remember_view(view).await?;
        }
        match action {
            MainAction::Profiles => self.profiles().await,
            MainAction::AddContact => self.add_contact().await,
            MainAction::BulkImport => self.bulk_import().await,
            MainAction::BatchGenerate => self.batch_generate().await,
            MainAction::Synergy => self.synergy().await,
            MainAction::Archetypes => self.archetypes().await,
            MainAction::MoonMoves => self.moon_moves().await,
            MainAction::Journal => self.journal().await,
            MainAction::SearchSort => self.search_sort().await,
            MainAction::Exit => Ok(()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Profiles
    // ─────────────────────────────────────────────────────────────────────

    async fn profiles(&self) -> Result<(), DomainError> {
        let contacts = self.contacts.list().await?;
        let prefs = self.prefs.load().await?;
        let visible = prefs.visible_contacts(&contacts);

        heading("Profiles");
        let search = if prefs.search_term.is_empty() {
            "none".to_string()
        } else {
            format!("'{}'", prefs.search_term)
        };
        println!(
            "  Search: {} | Filter: {} | Sort: {} | {} of {} shown",
            search,
            prefs.report_filter,
            prefs.sort,
            visible.len(),
            contacts.len()
        );
        if visible.is_empty() {
            println!("  No contacts match. Add some or change the search.");
            return Ok(());
        }

        let options: Vec<ContactChoice> = visible.into_iter().map(ContactChoice).collect();
        let Some(choice) = Select::new("Select a contact", options)
            .with_page_size(12)
            .prompt_skippable()
            .map_err(ui_err)?
        else {
            return Ok(());
        };
        let mut contact = choice.0.clone();

        loop {
            let actions = ContactAction::for_contact(&contact);
            let Some(action) = Select::new(&format!("{} ·", contact.name), actions)
                .prompt_skippable()
                .map_err(ui_err)?
            else {
                return Ok(());
            };
            match action {
                ContactAction::ViewReport => {
                    if let Some(report) = &contact.report {
                        print_report(&contact, report);
                    }
                }
                ContactAction::Snapshot => print_snapshot(&contact),
                ContactAction::Generate => {
                    if contact.has_report()
                        && !Confirm::new("Replace the existing report?")
                            .with_default(false)
                            .prompt()
                            .map_err(ui_err)?
                    {
                        continue;
                    }
                    let spinner = progress::spinner(format!(
                        "Consulting the stars for {}...",
                        contact.name
                    ));
                    let result = self.reports.generate(&contact).await;
                    spinner.finish_and_clear();
                    match result {
                        Ok(updated) => {
                            contact = updated;
                            if let Some(report) = &contact.report {
                                print_report(&contact, report);
                            }
                        }
                        Err(e) => report_error(&e),
                    }
                }
                ContactAction::Briefing => {
                    let spinner = progress::spinner("Preparing today's briefing...");
                    let result = self.reports.daily_briefing(&contact).await;
                    spinner.finish_and_clear();
                    match result {
                        Ok(briefing) => print_briefing(&contact, &briefing),
                        Err(e) => report_error(&e),
                    }
                }
                ContactAction::SaveArchetype => self.save_archetype(&contact).await?,
                ContactAction::Export => match self.reports.export_markdown(&contact).await {
                    Ok(path) => println!("  {} {}", "Saved".green(), path.display()),
                    Err(e) => report_error(&e),
                },
                ContactAction::Edit => {
                    let Some(changes) = prompt_contact_form(Some(&contact.identity()))? else {
                        continue;
                    };
                    match self.contacts.edit(&contact, changes).await {
                        Ok(updated) => {
                            contact = updated;
                            println!("  {}", "Contact updated.".green());
                        }
                        Err(e) => report_error(&e),
                    }
                }
                ContactAction::Delete => {
                    let confirmed = Confirm::new(&format!("Delete {}?", contact.name))
                        .with_default(false)
                        .prompt()
                        .map_err(ui_err)?;
                    if confirmed {
                        self.contacts.delete(&[contact.id.clone()]).await?;
                        println!("  {}", "Deleted.".green());
                        return Ok(());
                    }
                }
                ContactAction::Back => return Ok(()),
            }
        }
    }

    async fn save_archetype(&self, contact: &Contact) -> Result<(), DomainError> {
        let existing = self.reports.existing_archetype(contact).await?;
        if existing.is_some() {
            let overwrite = Confirm::new(
                "An archetype for this contact already exists. Overwrite it with the latest report?",
            )
            .with_default(false)
            .prompt()
            .map_err(ui_err)?;
            if !overwrite {
                return Ok(());
            }
        }

        let suggested = existing
            .map(|a| a.name)
            .or_else(|| {
                contact
                    .report
                    .as_ref()
                    .map(|r| r.identity.archetype_title.clone())
            })
            .unwrap_or_default();
        let Some(name) = Text::new("Archetype name:")
            .with_initial_value(&suggested)
            .prompt_skippable()
            .map_err(ui_err)?
        else {
            return Ok(());
        };

        match self.reports.save_archetype(contact, &name).await {
            Ok(saved) => println!("  {} {}", "Saved archetype".green(), saved.name),
            Err(e) => report_error(&e),
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Contact entry / import
    // ─────────────────────────────────────────────────────────────────────

    async fn add_contact(&self) -> Result<(), DomainError> {
        heading("New Contact");
        let Some(new) = prompt_contact_form(None)? else {
            return Ok(());
        };
        match self.contacts.add(new).await {
            Ok(contact) => println!("  {} {}", "Added".green(), contact.name),
            Err(e) => report_error(&e),
        }
        Ok(())
    }

    async fn bulk_import(&self) -> Result<(), DomainError> {
        heading("Bulk Import");
        println!("  Columns: Name,Birth Date (YYYY-MM-DD),Birth Time,Birth Location. Header optional.");
        let sources = vec!["Paste lines", "Read a .csv / text file"];
        let Some(source) = Select::new("Source", sources)
            .prompt_skippable()
            .map_err(ui_err)?
        else {
            return Ok(());
        };

        let outcome = if source == "Paste lines" {
            let text = prompt_pasted_lines()?;
            self.contacts.preview_import(&text)
        } else {
            let Some(path) = Text::new("File path:").prompt_skippable().map_err(ui_err)? else {
                return Ok(());
            };
            self.contacts
                .preview_import_file(&PathBuf::from(path.trim()))
                .await?
        };

        print_import_preview(&outcome);
        if outcome.contacts.is_empty() {
            return Ok(());
        }
        let confirmed = Confirm::new(&format!("Import {} contacts?", outcome.contacts.len()))
            .with_default(true)
            .prompt()
            .map_err(ui_err)?;
        if confirmed {
            let stored = self.contacts.import(&outcome.contacts).await?;
            println!("  {}", format!("Imported {} contacts.", stored.len()).green());
        }
        Ok(())
    }

    async fn batch_generate(&self) -> Result<(), DomainError> {
        let contacts = self.contacts.list().await?;
        let pending: Vec<&Contact> = contacts.iter().filter(|c| !c.has_report()).collect();
        heading("Generate Missing Reports");
        if pending.is_empty() {
            println!("  Every contact already has a report.");
            return Ok(());
        }

        let all: Vec<usize> = (0..pending.len()).collect();
        let options: Vec<ContactChoice> = pending.into_iter().map(ContactChoice).collect();
        let Some(selected) = MultiSelect::new("Contacts to generate", options)
            .with_default(&all)
            .with_page_size(12)
            .prompt_skippable()
            .map_err(ui_err)?
        else {
            return Ok(());
        };
        if selected.is_empty() {
            return Ok(());
        }
        let selected: Vec<Contact> = selected.into_iter().map(|c| c.0.clone()).collect();

        let bar = progress::batch_bar(selected.len() as u64);
        let outcome = self
            .reports
            .generate_batch(&selected, |contact, ok| {
                let mark = if ok { "✔" } else { "✖" };
                bar.set_message(format!("{mark} {}", contact.name));
                bar.inc(1);
            })
            .await;
        bar.finish_with_message("done");

        println!(
            "  {} / {}",
            format!("{} generated", outcome.succeeded).green(),
            format!("{} failed", outcome.failed.len()).red()
        );
        for (name, error) in &outcome.failed {
            println!("  {}", format!("{name}: {error}").red());
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Synergy / archetypes
    // ─────────────────────────────────────────────────────────────────────

    async fn synergy(&self) -> Result<(), DomainError> {
        let contacts = self.contacts.list().await?;
        let mut prefs = self.prefs.load().await?;
        prefs.prune_selection(&contacts);

        heading("Network Synergy");
        if contacts.len() < 2 {
            println!("  Add at least two contacts first.");
            return Ok(());
        }

        let defaults: Vec<usize> = contacts
            .iter()
            .enumerate()
            .filter(|(_, c)| prefs.synergy_selection.contains(&c.id))
            .map(|(i, _)| i)
            .collect();
        let options: Vec<ContactChoice> = contacts.iter().map(ContactChoice).collect();
        let Some(selected) = MultiSelect::new("Select two or more contacts", options)
            .with_default(&defaults)
            .with_page_size(12)
            .prompt_skippable()
            .map_err(ui_err)?
        else {
            return Ok(());
        };
        let group: Vec<Contact> = selected.into_iter().map(|c| c.0.clone()).collect();

        prefs.synergy_selection = group.iter().map(|c| c.id.clone()).collect();
        self.prefs.save(&prefs).await?;

        let spinner = progress::spinner(format!("Mapping {} connections...", group.len()));
        let result = self.reports.synergy(&group).await;
        spinner.finish_and_clear();
        match result {
            Ok(report) => print_synergy(&report),
            Err(e) => report_error(&e),
        }
        Ok(())
    }

    async fn archetypes(&self) -> Result<(), DomainError> {
        let archetypes = self.reports.archetypes().await?;
        heading("Archetypes");
        if archetypes.is_empty() {
            println!("  No archetypes yet. Save one from a contact's report.");
            return Ok(());
        }

        let options: Vec<ArchetypeChoice> = archetypes.iter().map(ArchetypeChoice).collect();
        let Some(choice) = Select::new("Select an archetype", options)
            .prompt_skippable()
            .map_err(ui_err)?
        else {
            return Ok(());
        };
        let template = choice.0;

        let actions = vec!["View saved report", "Generate a live report", "Back"];
        let Some(action) = Select::new(&format!("{} ·", template.name), actions)
            .prompt_skippable()
            .map_err(ui_err)?
        else {
            return Ok(());
        };
        match action {
            "View saved report" => {
                let contact = template.to_contact();
                print_report(&contact, &template.report);
            }
            "Generate a live report" => {
                let spinner = progress::spinner(format!(
                    "Regenerating from {}...",
                    template.original_contact.identity.name
                ));
                let result = self.reports.regenerate_from_archetype(template).await;
                spinner.finish_and_clear();
                match result {
                    Ok(contact) => {
                        if let Some(report) = &contact.report {
                            print_report(&contact, report);
                        }
                        println!("  {}", "Live report (not saved).".dim());
                    }
                    Err(e) => report_error(&e),
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Moon moves / journal
    // ─────────────────────────────────────────────────────────────────────

    async fn moon_moves(&self) -> Result<(), DomainError> {
        let today = today();
        let spinner = progress::spinner("Reading the moon...");
        let result = self.insights.moon_today(today).await;
        spinner.finish_and_clear();

        heading("Moon Moves");
        match result {
            Ok(moon) => {
                println!(
                    "  {} {} · {}% illuminated",
                    moon.phase.symbol_glyph(),
                    moon.phase.phase_name().bold(),
                    moon.phase.illumination_percent
                );
                println!("  {}", moon.insight.as_str().italic());
                if moon.cached {
                    debug!(date = %moon.date, "showing cached lunar insight");
                }
            }
            Err(e) => {
                warn!(error = %e, "lunar insight unavailable");
                let phase = lunar_phase(&today);
                println!(
                    "  {} {} · {}% illuminated",
                    phase.symbol_glyph(),
                    phase.phase_name().bold(),
                    phase.illumination_percent
                );
                report_error(&e);
            }
        }

        heading("Next 7 Nights");
        if let Some(start) = today.to_naive() {
            for date in start.iter_days().skip(1).take(7).map(CalendarDate::from) {
                let phase = lunar_phase(&date);
                println!(
                    "  {} {} {:<16} {:>3}%",
                    date,
                    phase.symbol_glyph(),
                    phase.phase_name(),
                    phase.illumination_percent
                );
            }
        }
        Ok(())
    }

    async fn journal(&self) -> Result<(), DomainError> {
        heading("Journal");
        let actions = vec!["Write today's entry", "Browse entries", "Back"];
        let Some(action) = Select::new("Journal", actions)
            .prompt_skippable()
            .map_err(ui_err)?
        else {
            return Ok(());
        };
        match action {
            "Write today's entry" => {
                let Some(content) = Text::new("What's on your mind?")
                    .prompt_skippable()
                    .map_err(ui_err)?
                else {
                    return Ok(());
                };
                let spinner = progress::spinner("Reflecting...");
                let result = self.insights.write_entry(today(), &content).await;
                spinner.finish_and_clear();
                match result {
                    Ok(entry) => print_entry(&entry),
                    Err(e) => report_error(&e),
                }
            }
            "Browse entries" => {
                let entries = self.insights.entries().await?;
                if entries.is_empty() {
                    println!("  No entries yet.");
                    return Ok(());
                }
                let options: Vec<EntryChoice> = entries.iter().map(EntryChoice).collect();
                if let Some(choice) = Select::new("Entries", options)
                    .with_page_size(12)
                    .prompt_skippable()
                    .map_err(ui_err)?
                {
                    print_entry(choice.0);
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Preferences
    // ─────────────────────────────────────────────────────────────────────

    async fn search_sort(&self) -> Result<(), DomainError> {
        let mut prefs: ViewPreferences = self.prefs.load().await?;
        heading("Search, Filter & Sort");

        if let Some(term) = Text::new("Search by name (empty for all):")
            .with_initial_value(&prefs.search_term)
            .prompt_skippable()
            .map_err(ui_err)?
        {
            prefs.search_term = term.trim().to_string();
        }

        let filter_cursor = ReportFilter::ALL
            .iter()
            .position(|f| *f == prefs.report_filter)
            .unwrap_or(0);
        if let Some(filter) = Select::new("Show", ReportFilter::ALL.to_vec())
            .with_starting_cursor(filter_cursor)
            .prompt_skippable()
            .map_err(ui_err)?
        {
            prefs.report_filter = filter;
        }

        let sort_cursor = SortConfig::OPTIONS
            .iter()
            .position(|s| *s == prefs.sort)
            .unwrap_or(0);
        if let Some(sort) = Select::new("Sort by", SortConfig::OPTIONS.to_vec())
            .with_starting_cursor(sort_cursor)
            .prompt_skippable()
            .map_err(ui_err)?
        {
            prefs.sort = sort;
        }

        self.prefs.save(&prefs).await?;
        println!("  {}", "Preferences saved.".green());
        Ok(())
    }
}

fn print_snapshot(contact: &Contact) {
    let today = today();
    let snap = snapshot(contact, &today);
    heading(&format!("Cosmic Snapshot · {}", contact.name));
    field(
        "Sun Sign",
        &format!("{} ({})", snap.zodiac.sign_name(), snap.zodiac.element),
    );
    field("Vietnamese Zodiac", snap.vietnamese_animal);
    match snap.personal_year {
        Some(py) => field("Personal Year", &format!("{}   {}", py, cycle_line(py))),
        None => field("Personal Year", "Unknown"),
    }
    if let Some(moon) = snap.birth_moon {
        field(
            "Birth Moon",
            &format!("{} {}", moon.symbol_glyph(), moon.phase_name()),
        );
    }

    let upcoming: Vec<String> = alignment_days_for(contact, today.year())
        .into_iter()
        .filter(|d| *d >= today)
        .take(5)
        .map(|d| format!("{} ({})", d, day_number(&d)))
        .collect();
    if !upcoming.is_empty() {
        field("Next Alignment Days", &upcoming.join(", "));
    }
}

fn print_entry(entry: &JournalEntry) {
    heading(&format!("Journal · {}", entry.date));
    println!("  {}", entry.content);
    match &entry.analysis {
        Some(a) => {
            field("Key Themes", &a.key_themes);
            field("Growth Opportunity", &a.growth_opportunity);
            field("Reflect", &a.reflection_question);
        }
        None => println!("  {}", "No analysis.".dim()),
    }
}

fn text_field<'a>(label: &'a str, value: Option<&'a str>) -> Result<Option<String>, DomainError> {
    let mut prompt = Text::new(label);
    if let Some(v) = value {
        prompt = prompt.with_initial_value(v);
    }
    prompt.prompt_skippable().map_err(ui_err)
}

/// Contact form. `initial` pre-fills the fields when editing. `None` when cancelled.
fn prompt_contact_form(initial: Option<&NewContact>) -> Result<Option<NewContact>, DomainError> {
    let Some(name) = text_field("Name:", initial.map(|c| c.name.as_str()))? else {
        return Ok(None);
    };
    let Some(birth_date) = text_field(
        "Birth date (YYYY-MM-DD):",
        initial.map(|c| c.birth_date.as_str()),
    )?
    else {
        return Ok(None);
    };
    let birth_time = text_field(
        "Birth time (optional):",
        initial.and_then(|c| c.birth_time.as_deref()),
    )?;
    let birth_location = text_field(
        "Birth location (optional):",
        initial.and_then(|c| c.birth_location.as_deref()),
    )?;
    let notes = text_field("Notes (optional):", initial.and_then(|c| c.notes.as_deref()))?;

    Ok(Some(NewContact {
        name,
        birth_date,
        birth_time,
        birth_location,
        notes,
    }))
}

/// Read pasted lines until an empty one.
fn prompt_pasted_lines() -> Result<String, DomainError> {
    let mut lines = Vec::new();
    loop {
        let line = Text::new(&format!("Line {}:", lines.len() + 1))
            .with_help_message("Empty line to finish")
            .prompt_skippable()
            .map_err(ui_err)?
            .unwrap_or_default();
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let prefs = self.prefs.load().await?;
            let action = Select::new("Cosmic CRM", MainAction::ALL.to_vec())
                .with_starting_cursor(MainAction::cursor_for(prefs.view))
                .with_page_size(MainAction::ALL.len())
                .prompt_skippable();
            let action = match action {
                Ok(Some(MainAction::Exit)) | Ok(None) => break,
                Err(InquireError::OperationInterrupted) => break,
                Ok(Some(action)) => action,
                Err(e) => return Err(ui_err(e)),
            };
            if let Err(e) = self.dispatch(action).await {
                warn!(error = %e, action = %action, "menu action failed");
                report_error(&e);
            }
        }
        println!("{}", "May the stars keep you. ✦".magenta());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::tests::sample_report;

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(7.0), "███████░░░ 7.0");
        assert_eq!(score_bar(12.0), "██████████ 12.0");
        assert_eq!(score_bar(-1.0), "░░░░░░░░░░ -1.0");
    }

    #[test]
    fn test_cycle_line_marks_current() {
        assert_eq!(cycle_line(3), "1 2 [3] 4 5 6 7 8 9");
    }

    #[test]
    fn test_main_menu_cursor_follows_view() {
        assert_eq!(MainAction::cursor_for(CrmView::Profiles), 0);
        assert_eq!(
            MainAction::ALL[MainAction::cursor_for(CrmView::Journal)],
            MainAction::Journal
        );
    }

    #[test]
    fn test_contact_actions_depend_on_report() {
        let mut contact = Contact::from_new("1-0".into(), NewContact::new("Ada", "1815-12-10"));
        let without = ContactAction::for_contact(&contact);
        assert!(!without.contains(&ContactAction::ViewReport));
        assert!(!without.contains(&ContactAction::Export));

        contact.report = Some(sample_report());
        let with = ContactAction::for_contact(&contact);
        assert_eq!(with[0], ContactAction::ViewReport);
        assert!(with.contains(&ContactAction::SaveArchetype));
        assert_eq!(with.last(), Some(&ContactAction::Back));
    }

    #[test]
    fn test_contact_choice_label() {
        let mut contact = Contact::from_new("1-0".into(), NewContact::new("Ada", "1815-12-10"));
        assert_eq!(
            ContactChoice(&contact).to_string(),
            "Ada (1815-12-10) · no report"
        );
        contact.report = Some(sample_report());
        assert_eq!(
            ContactChoice(&contact).to_string(),
            "Ada (1815-12-10) ✦ The Visionary Bridge"
        );
    }
}
