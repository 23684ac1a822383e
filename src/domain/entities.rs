//! Domain entities. Pure data structures for the core business.
//!
//! No database/HTTP types here. Adapters map into these.

use super::report::{CrmReport, JournalAnalysis};
use serde::{Deserialize, Serialize};

/// Opaque contact identifier assigned by the repository.
pub type ContactId = String;

/// A contact record as produced by the bulk parser or the contact form.
///
/// `birth_date` always has the `YYYY-MM-DD` shape once accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub name: String,
    pub birth_date: String,
    pub birth_time: Option<String>,
    pub birth_location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewContact {
    pub fn new(name: impl Into<String>, birth_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            birth_date: birth_date.into(),
            birth_time: None,
            birth_location: None,
            notes: None,
        }
    }
}

/// A stored contact, optionally carrying its generated report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub birth_date: String,
    pub birth_time: Option<String>,
    pub birth_location: Option<String>,
    pub notes: Option<String>,
    pub report: Option<CrmReport>,
    /// Denormalized from the report's financial matrix for list views.
    pub financial_cycle_theme: Option<String>,
}

impl Contact {
    pub fn from_new(id: ContactId, new: NewContact) -> Self {
        Self {
            id,
            name: new.name,
            birth_date: new.birth_date,
            birth_time: new.birth_time,
            birth_location: new.birth_location,
            notes: new.notes,
            report: None,
            financial_cycle_theme: None,
        }
    }

    pub fn has_report(&self) -> bool {
        self.report.is_some()
    }

    /// Identity fields without the report.
    pub fn identity(&self) -> NewContact {
        NewContact {
            name: self.name.clone(),
            birth_date: self.birth_date.clone(),
            birth_time: self.birth_time.clone(),
            birth_location: self.birth_location.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Snapshot of the contact a saved archetype was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalContact {
    pub id: ContactId,
    #[serde(flatten)]
    pub identity: NewContact,
}

/// A saved report template. At most one per originating contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeTemplate {
    pub id: String,
    pub name: String,
    pub report: CrmReport,
    pub original_contact: OriginalContact,
}

impl ArchetypeTemplate {
    /// Rebuild a displayable contact from the template (report attached).
    pub fn to_contact(&self) -> Contact {
        let mut contact = Contact::from_new(
            self.original_contact.id.clone(),
            self.original_contact.identity.clone(),
        );
        contact.report = Some(self.report.clone());
        contact
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub content: String,
    pub analysis: Option<JournalAnalysis>,
}

/// What the report generator is told about a person: identity fields plus the locally
/// computed Personal Year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubject {
    pub name: String,
    pub birth_date: String,
    pub birth_time: Option<String>,
    pub birth_location: Option<String>,
    /// `None` when the birth date cannot be parsed.
    pub personal_year: Option<u8>,
}
