//! Contact management. Bulk import, manual entry, edit and delete.
//!
//! Manual entries go through the same validation rules as the bulk parser.

use crate::domain::contact_parser::is_birth_date_shape;
use crate::domain::{Contact, ContactId, DomainError, NewContact, ParseOutcome, parse_contacts};
use crate::ports::ContactRepo;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Blank optional fields become `None`.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normalize and validate a contact typed in by hand.
pub fn validate_contact(contact: NewContact) -> Result<NewContact, DomainError> {
    let name = contact.name.trim().to_string();
    let birth_date = contact.birth_date.trim().to_string();
    if name.is_empty() || birth_date.is_empty() {
        return Err(DomainError::Validation(
            "Missing required fields (Name, Birth Date).".into(),
        ));
    }
    if !is_birth_date_shape(&birth_date) {
        return Err(DomainError::Validation(format!(
            "Invalid birth date format for '{}'. Please use YYYY-MM-DD.",
            name
        )));
    }
    Ok(NewContact {
        name,
        birth_date,
        birth_time: non_blank(contact.birth_time),
        birth_location: non_blank(contact.birth_location),
        notes: non_blank(contact.notes),
    })
}

pub struct ContactService {
    contacts: Arc<dyn ContactRepo>,
}

impl ContactService {
    pub fn new(contacts: Arc<dyn ContactRepo>) -> Self {
        Self { contacts }
    }

    pub async fn list(&self) -> Result<Vec<Contact>, DomainError> {
        self.contacts.list_contacts().await
    }

    /// Parse pasted text without importing anything.
    pub fn preview_import(&self, text: &str) -> ParseOutcome {
        let outcome = parse_contacts(text);
        info!(
            contacts = outcome.contacts.len(),
            errors = outcome.errors.len(),
            "parsed bulk input"
        );
        outcome
    }

    /// Read a `.csv` or text file and parse it without importing anything.
    pub async fn preview_import_file(&self, path: &Path) -> Result<ParseOutcome, DomainError> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::Import(format!("Failed to read {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), bytes = text.len(), "read import file");
        Ok(self.preview_import(&text))
    }

    /// Store accepted contacts. Returns them with assigned ids.
    pub async fn import(&self, contacts: &[NewContact]) -> Result<Vec<Contact>, DomainError> {
        if contacts.is_empty() {
            return Ok(Vec::new());
        }
        let stored = self.contacts.insert_contacts(contacts).await?;
        info!(count = stored.len(), "imported contacts");
        Ok(stored)
    }

    pub async fn add(&self, contact: NewContact) -> Result<Contact, DomainError> {
        let contact = validate_contact(contact)?;
        let mut stored = self.contacts.insert_contacts(&[contact]).await?;
        let stored = stored
            .pop()
            .ok_or_else(|| DomainError::Repo("insert returned no contact".into()))?;
        info!(contact_id = %stored.id, "added contact");
        Ok(stored)
    }

    /// Replace identity fields of `contact` with validated `changes`. The report stays.
    pub async fn edit(&self, contact: &Contact, changes: NewContact) -> Result<Contact, DomainError> {
        let changes = validate_contact(changes)?;
        let mut updated = contact.clone();
        updated.name = changes.name;
        updated.birth_date = changes.birth_date;
        updated.birth_time = changes.birth_time;
        updated.birth_location = changes.birth_location;
        updated.notes = changes.notes;
        self.contacts.update_contact(&updated).await?;
        info!(contact_id = %updated.id, "updated contact");
        Ok(updated)
    }

    pub async fn delete(&self, ids: &[ContactId]) -> Result<(), DomainError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.contacts.delete_contacts(ids).await?;
        info!(count = ids.len(), "deleted contacts");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::SqliteRepo;

    async fn service() -> (tempfile::TempDir, ContactService) {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteRepo::connect(dir.path()).await.unwrap();
        (dir, ContactService::new(Arc::new(repo)))
    }

    #[test]
    fn test_validate_contact_trims_and_drops_blanks() {
        let mut input = NewContact::new("  Ada  ", " 1815-12-10 ");
        input.birth_time = Some("   ".into());
        input.birth_location = Some(" London ".into());
        let valid = validate_contact(input).unwrap();
        assert_eq!(valid.name, "Ada");
        assert_eq!(valid.birth_date, "1815-12-10");
        assert_eq!(valid.birth_time, None);
        assert_eq!(valid.birth_location.as_deref(), Some("London"));
    }

    #[test]
    fn test_validate_contact_uses_parser_rules() {
        let missing = validate_contact(NewContact::new("", "1990-01-01")).unwrap_err();
        assert!(matches!(missing, DomainError::Validation(_)));

        let bad = validate_contact(NewContact::new("John", "01/01/1990")).unwrap_err();
        assert!(bad.to_string().contains("YYYY-MM-DD"));
    }

    #[tokio::test]
    async fn test_import_preview_then_store() {
        let (_dir, service) = service().await;
        let outcome = service.preview_import("Name,Birth Date\nA,2020-01-01\nB,bad\nC,2021-03-04");
        assert_eq!(outcome.contacts.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert!(service.list().await.unwrap().is_empty());

        let stored = service.import(&outcome.contacts).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_preview_import_file() {
        let (dir, service) = service().await;
        let path = dir.path().join("contacts.csv");
        tokio::fs::write(&path, "John Doe,1990-01-01,08:30,Paris\n")
            .await
            .unwrap();
        let outcome = service.preview_import_file(&path).await.unwrap();
        assert_eq!(outcome.contacts[0].birth_location.as_deref(), Some("Paris"));

        let missing = service
            .preview_import_file(&dir.path().join("nope.csv"))
            .await
            .unwrap_err();
        assert!(matches!(missing, DomainError::Import(_)));
    }

    #[tokio::test]
    async fn test_add_edit_delete() {
        let (_dir, service) = service().await;
        let added = service.add(NewContact::new("Ada", "1815-12-10")).await.unwrap();

        let mut changes = added.identity();
        changes.name = "Ada Lovelace".into();
        changes.notes = Some("Analyst".into());
        let edited = service.edit(&added, changes).await.unwrap();
        assert_eq!(edited.id, added.id);

        let listed = service.list().await.unwrap();
        assert_eq!(listed[0].name, "Ada Lovelace");
        assert_eq!(listed[0].notes.as_deref(), Some("Analyst"));

        service.delete(&[added.id.clone()]).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
    }
}
