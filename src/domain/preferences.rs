//! Directory view state: search, filter, sort and cached insights.
//!
//! Loaded and saved explicitly through `PreferencesPort`; nothing here touches storage.

use super::calendar::CalendarDate;
use super::entities::{Contact, ContactId};
use super::lunar::MoonPhase;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrmView {
    #[default]
    Profiles,
    Synergy,
    Archetypes,
    MoonMoves,
    Journal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFilter {
    #[default]
    All,
    HasReport,
    NoReport,
}

impl ReportFilter {
    pub const ALL: [ReportFilter; 3] = [
        ReportFilter::All,
        ReportFilter::HasReport,
        ReportFilter::NoReport,
    ];

    fn accepts(&self, contact: &Contact) -> bool {
        match self {
            ReportFilter::All => true,
            ReportFilter::HasReport => contact.has_report(),
            ReportFilter::NoReport => !contact.has_report(),
        }
    }
}

impl fmt::Display for ReportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReportFilter::All => "All contacts",
            ReportFilter::HasReport => "With report",
            ReportFilter::NoReport => "Without report",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    BirthDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    pub const OPTIONS: [SortConfig; 4] = [
        SortConfig::new(SortKey::Name, SortDirection::Ascending),
        SortConfig::new(SortKey::Name, SortDirection::Descending),
        SortConfig::new(SortKey::BirthDate, SortDirection::Ascending),
        SortConfig::new(SortKey::BirthDate, SortDirection::Descending),
    ];

    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    fn compare(&self, a: &Contact, b: &Contact) -> Ordering {
        let ordering = match self.key {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            // None (missing/unparseable) sorts before any real date.
            SortKey::BirthDate => CalendarDate::parse_iso(&a.birth_date)
                .cmp(&CalendarDate::parse_iso(&b.birth_date)),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self.key {
            SortKey::Name => "Name",
            SortKey::BirthDate => "Birth date",
        };
        let dir = match self.direction {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        };
        write!(f, "{key} ({dir})")
    }
}

/// Today's moon insight, valid for a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunarCache {
    /// `YYYY-MM-DD`
    pub date: String,
    pub phase: MoonPhase,
    pub insight: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewPreferences {
    pub view: CrmView,
    pub search_term: String,
    pub report_filter: ReportFilter,
    pub sort: SortConfig,
    pub synergy_selection: Vec<ContactId>,
    pub lunar_cache: Option<LunarCache>,
}

impl ViewPreferences {
    /// Contacts matching the search term and report filter, in the configured order.
    pub fn visible_contacts<'a>(&self, contacts: &'a [Contact]) -> Vec<&'a Contact> {
        let needle = self.search_term.trim().to_lowercase();
        let mut visible: Vec<&Contact> = contacts
            .iter()
            .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
            .filter(|c| self.report_filter.accepts(c))
            .collect();
        visible.sort_by(|a, b| self.sort.compare(a, b));
        visible
    }

    /// Cached insight for `today`, if one was stored on that day.
    pub fn lunar_insight_for(&self, today: &CalendarDate) -> Option<&LunarCache> {
        let today = today.to_string();
        self.lunar_cache.as_ref().filter(|c| c.date == today)
    }

    /// Drop selected ids that no longer exist.
    pub fn prune_selection(&mut self, contacts: &[Contact]) {
        self.synergy_selection
            .retain(|id| contacts.iter().any(|c| &c.id == id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewContact;
    use crate::domain::report::tests::sample_report;

    fn contact(id: &str, name: &str, birth_date: &str, with_report: bool) -> Contact {
        let mut c = Contact::from_new(id.to_string(), NewContact::new(name, birth_date));
        if with_report {
            c.report = Some(sample_report());
        }
        c
    }

    fn directory() -> Vec<Contact> {
        vec![
            contact("1", "charlie", "1990-05-01", false),
            contact("2", "Alice", "1985-12-24", true),
            contact("3", "bob", "", false),
            contact("4", "Alicia", "2001-01-01", false),
        ]
    }

    fn names(v: &[&Contact]) -> Vec<String> {
        v.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_default_sort_is_name_case_insensitive() {
        let contacts = directory();
        let prefs = ViewPreferences::default();
        assert_eq!(
            names(&prefs.visible_contacts(&contacts)),
            vec!["Alice", "Alicia", "bob", "charlie"]
        );
    }

    #[test]
    fn test_birth_date_sort_puts_missing_first_and_reverses() {
        let contacts = directory();
        let mut prefs = ViewPreferences {
            sort: SortConfig::new(SortKey::BirthDate, SortDirection::Ascending),
            ..Default::default()
        };
        assert_eq!(
            names(&prefs.visible_contacts(&contacts)),
            vec!["bob", "Alice", "charlie", "Alicia"]
        );

        prefs.sort.direction = SortDirection::Descending;
        assert_eq!(
            names(&prefs.visible_contacts(&contacts)),
            vec!["Alicia", "charlie", "Alice", "bob"]
        );
    }

    #[test]
    fn test_search_and_report_filter() {
        let contacts = directory();
        let mut prefs = ViewPreferences {
            search_term: "  ALI ".into(),
            ..Default::default()
        };
        assert_eq!(names(&prefs.visible_contacts(&contacts)), vec!["Alice", "Alicia"]);

        prefs.report_filter = ReportFilter::HasReport;
        assert_eq!(names(&prefs.visible_contacts(&contacts)), vec!["Alice"]);

        prefs.report_filter = ReportFilter::NoReport;
        assert_eq!(names(&prefs.visible_contacts(&contacts)), vec!["Alicia"]);
    }

    #[test]
    fn test_lunar_cache_is_per_day() {
        let prefs = ViewPreferences {
            lunar_cache: Some(LunarCache {
                date: "2024-03-10".into(),
                phase: MoonPhase::NewMoon,
                insight: "Plant seeds.".into(),
            }),
            ..Default::default()
        };
        let today = CalendarDate::new(2024, 3, 10).unwrap();
        let tomorrow = CalendarDate::new(2024, 3, 11).unwrap();
        assert!(prefs.lunar_insight_for(&today).is_some());
        assert!(prefs.lunar_insight_for(&tomorrow).is_none());
    }

    #[test]
    fn test_prune_selection_and_partial_json() {
        let contacts = directory();
        let mut prefs: ViewPreferences =
            serde_json::from_str(r#"{"synergy_selection": ["2", "99", "4"]}"#).unwrap();
        assert_eq!(prefs.view, CrmView::Profiles);
        prefs.prune_selection(&contacts);
        assert_eq!(prefs.synergy_selection, vec!["2".to_string(), "4".to_string()]);
    }
}
