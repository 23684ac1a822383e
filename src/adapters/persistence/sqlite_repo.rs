//! SQLite-backed repository via libsql. Implements the contact, archetype and journal ports.
//!
//! One database file (`cosmic_crm.db`) in the data directory. Reports and other nested
//! records are stored as JSON text columns.

use crate::domain::{
    ArchetypeTemplate, Contact, CrmReport, DomainError, JournalAnalysis, JournalEntry,
    NewContact, OriginalContact,
};
use crate::ports::{ArchetypeRepo, ContactRepo, JournalRepo};
use libsql::{Connection, Database, Row, params};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

const CONTACTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    birth_date TEXT NOT NULL,
    birth_time TEXT,
    birth_location TEXT,
    notes TEXT,
    report_json TEXT,
    financial_cycle_theme TEXT,
    created_at INTEGER NOT NULL
)"#;

/// One template per originating contact.
const ARCHETYPES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS archetypes (
    id TEXT PRIMARY KEY,
    contact_id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    report_json TEXT NOT NULL,
    original_contact_json TEXT NOT NULL,
    updated_at INTEGER NOT NULL
)"#;

const JOURNAL_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS journal_entries (
    id TEXT PRIMARY KEY,
    date TEXT NOT NULL,
    content TEXT NOT NULL,
    analysis_json TEXT,
    created_at INTEGER NOT NULL
)"#;
const JOURNAL_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_journal_date ON journal_entries (date DESC, created_at DESC)";

const CONTACT_COLUMNS: &str = "id, name, birth_date, birth_time, birth_location, notes, report_json, financial_cycle_theme";

fn repo_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::Repo(e.to_string())
}

fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// SQLite repository. Safe to share via Arc.
pub struct SqliteRepo {
    db: Database,
    db_path: PathBuf,
    /// Last millisecond stamp handed out for contact ids; keeps batches unique.
    last_id_millis: AtomicI64,
}

impl SqliteRepo {
    /// Connect to (or create) the database and ensure the schema exists.
    ///
    /// Sets WAL mode and synchronous=NORMAL.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(repo_err)?;
        let db_path = base.join("cosmic_crm.db");
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(repo_err)?;
        let conn = db.connect().map_err(repo_err)?;

        // PRAGMA returns a row; execute() fails when rows come back.
        Self::run_pragma(&conn, "PRAGMA journal_mode=WAL").await?;
        Self::run_pragma(&conn, "PRAGMA synchronous=NORMAL").await?;

        for ddl in [CONTACTS_TABLE, ARCHETYPES_TABLE, JOURNAL_TABLE, JOURNAL_INDEX] {
            conn.execute(ddl, ()).await.map_err(repo_err)?;
        }

        info!(path = %db_path.display(), "SQLite connected with WAL mode");

        Ok(Self {
            db,
            db_path,
            last_id_millis: AtomicI64::new(0),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn run_pragma(conn: &Connection, sql: &str) -> Result<(), DomainError> {
        let mut rows = conn
            .query(sql, ())
            .await
            .map_err(|e| DomainError::Repo(format!("{sql} failed: {e}")))?;
        while rows.next().await.map_err(repo_err)?.is_some() {}
        Ok(())
    }

    fn conn(&self) -> Result<Connection, DomainError> {
        self.db.connect().map_err(repo_err)
    }

    /// Strictly increasing millisecond stamp, so back-to-back batches never collide.
    fn next_id_millis(&self) -> i64 {
        let now = unix_millis();
        let prev = self
            .last_id_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(prev + 1)
    }

    fn to_json<T: serde::Serialize>(value: &T) -> Result<String, DomainError> {
        serde_json::to_string(value).map_err(repo_err)
    }

    fn from_json<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DomainError> {
        serde_json::from_str(s).map_err(repo_err)
    }

    fn row_to_contact(row: &Row) -> Result<Contact, DomainError> {
        let report_json: Option<String> = row.get::<String>(6).ok();
        let report = report_json
            .as_deref()
            .map(Self::from_json::<CrmReport>)
            .transpose()?;
        Ok(Contact {
            id: row.get(0).map_err(repo_err)?,
            name: row.get(1).map_err(repo_err)?,
            birth_date: row.get(2).map_err(repo_err)?,
            birth_time: row.get::<String>(3).ok(),
            birth_location: row.get::<String>(4).ok(),
            notes: row.get::<String>(5).ok(),
            report,
            financial_cycle_theme: row.get::<String>(7).ok(),
        })
    }

    fn row_to_archetype(row: &Row) -> Result<ArchetypeTemplate, DomainError> {
        let report_json: String = row.get(2).map_err(repo_err)?;
        let original_json: String = row.get(3).map_err(repo_err)?;
        Ok(ArchetypeTemplate {
            id: row.get(0).map_err(repo_err)?,
            name: row.get(1).map_err(repo_err)?,
            report: Self::from_json(&report_json)?,
            original_contact: Self::from_json::<OriginalContact>(&original_json)?,
        })
    }
}

#[async_trait::async_trait]
impl ContactRepo for SqliteRepo {
    async fn list_contacts(&self) -> Result<Vec<Contact>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                &format!("SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY created_at, rowid"),
                (),
            )
            .await
            .map_err(repo_err)?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next().await.map_err(repo_err)? {
            contacts.push(Self::row_to_contact(&row)?);
        }
        Ok(contacts)
    }

    async fn insert_contacts(&self, contacts: &[NewContact]) -> Result<Vec<Contact>, DomainError> {
        if contacts.is_empty() {
            return Ok(Vec::new());
        }
        let stamp = self.next_id_millis();
        let conn = self.conn()?;
        let tx = conn.transaction().await.map_err(repo_err)?;
        let mut inserted = Vec::with_capacity(contacts.len());
        for (index, new) in contacts.iter().enumerate() {
            let id = format!("{stamp}-{index}");
            tx.execute(
                r#"
                INSERT INTO contacts (id, name, birth_date, birth_time, birth_location, notes, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    id.as_str(),
                    new.name.as_str(),
                    new.birth_date.as_str(),
                    new.birth_time.clone(),
                    new.birth_location.clone(),
                    new.notes.clone(),
                    stamp
                ],
            )
            .await
            .map_err(repo_err)?;
            inserted.push(Contact::from_new(id, new.clone()));
        }
        tx.commit().await.map_err(repo_err)?;
        info!(count = inserted.len(), path = %self.db_path.display(), "inserted contacts");
        Ok(inserted)
    }

    async fn update_contact(&self, contact: &Contact) -> Result<(), DomainError> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                r#"
                UPDATE contacts
                SET name = ?2, birth_date = ?3, birth_time = ?4, birth_location = ?5, notes = ?6
                WHERE id = ?1
                "#,
                params![
                    contact.id.as_str(),
                    contact.name.as_str(),
                    contact.birth_date.as_str(),
                    contact.birth_time.clone(),
                    contact.birth_location.clone(),
                    contact.notes.clone()
                ],
            )
            .await
            .map_err(repo_err)?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("contact {}", contact.id)));
        }
        debug!(contact_id = %contact.id, "updated contact");
        Ok(())
    }

    async fn delete_contacts(&self, ids: &[String]) -> Result<(), DomainError> {
        let conn = self.conn()?;
        let tx = conn.transaction().await.map_err(repo_err)?;
        for id in ids {
            tx.execute("DELETE FROM contacts WHERE id = ?1", params![id.as_str()])
                .await
                .map_err(repo_err)?;
        }
        tx.commit().await.map_err(repo_err)?;
        info!(count = ids.len(), "deleted contacts");
        Ok(())
    }

    async fn save_report(&self, contact_id: &str, report: &CrmReport) -> Result<(), DomainError> {
        let json = Self::to_json(report)?;
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE contacts SET report_json = ?2, financial_cycle_theme = ?3 WHERE id = ?1",
                params![contact_id, json, report.financial_cycle_theme()],
            )
            .await
            .map_err(repo_err)?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("contact {contact_id}")));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ArchetypeRepo for SqliteRepo {
    async fn list_archetypes(&self) -> Result<Vec<ArchetypeTemplate>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                "SELECT id, name, report_json, original_contact_json FROM archetypes ORDER BY name",
                (),
            )
            .await
            .map_err(repo_err)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await.map_err(repo_err)? {
            out.push(Self::row_to_archetype(&row)?);
        }
        Ok(out)
    }

    async fn find_archetype_for_contact(
        &self,
        contact_id: &str,
    ) -> Result<Option<ArchetypeTemplate>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                r#"
                SELECT id, name, report_json, original_contact_json
                FROM archetypes WHERE contact_id = ?1
                "#,
                params![contact_id],
            )
            .await
            .map_err(repo_err)?;
        match rows.next().await.map_err(repo_err)? {
            Some(row) => Ok(Some(Self::row_to_archetype(&row)?)),
            None => Ok(None),
        }
    }

    async fn save_archetype(
        &self,
        template: &ArchetypeTemplate,
    ) -> Result<ArchetypeTemplate, DomainError> {
        let contact_id = template.original_contact.id.clone();
        let report_json = Self::to_json(&template.report)?;
        let original_json = Self::to_json(&template.original_contact)?;
        let conn = self.conn()?;
        let updated = conn
            .execute(
                r#"
                UPDATE archetypes
                SET name = ?2, report_json = ?3, original_contact_json = ?4, updated_at = ?5
                WHERE contact_id = ?1
                "#,
                params![
                    contact_id.as_str(),
                    template.name.as_str(),
                    report_json.as_str(),
                    original_json.as_str(),
                    unix_millis()
                ],
            )
            .await
            .map_err(repo_err)?;
        if updated == 0 {
            conn.execute(
                r#"
                INSERT INTO archetypes (id, contact_id, name, report_json, original_contact_json, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    template.id.as_str(),
                    contact_id.as_str(),
                    template.name.as_str(),
                    report_json,
                    original_json,
                    unix_millis()
                ],
            )
            .await
            .map_err(repo_err)?;
        }

        info!(contact_id = %contact_id, name = %template.name, "saved archetype");
        self.find_archetype_for_contact(&contact_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("archetype for {contact_id}")))
    }
}

#[async_trait::async_trait]
impl JournalRepo for SqliteRepo {
    async fn save_entry(&self, entry: &JournalEntry) -> Result<(), DomainError> {
        let analysis_json = entry.analysis.as_ref().map(Self::to_json).transpose()?;
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO journal_entries (id, date, content, analysis_json, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (id) DO UPDATE SET
                content = excluded.content,
                analysis_json = excluded.analysis_json
            "#,
            params![
                entry.id.as_str(),
                entry.date.as_str(),
                entry.content.as_str(),
                analysis_json,
                unix_millis()
            ],
        )
        .await
        .map_err(repo_err)?;
        Ok(())
    }

    async fn list_entries(&self) -> Result<Vec<JournalEntry>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                r#"
                SELECT id, date, content, analysis_json FROM journal_entries
                ORDER BY date DESC, created_at DESC, rowid DESC
                "#,
                (),
            )
            .await
            .map_err(repo_err)?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await.map_err(repo_err)? {
            let analysis = row
                .get::<String>(3)
                .ok()
                .as_deref()
                .map(Self::from_json::<JournalAnalysis>)
                .transpose()?;
            entries.push(JournalEntry {
                id: row.get(0).map_err(repo_err)?,
                date: row.get(1).map_err(repo_err)?,
                content: row.get(2).map_err(repo_err)?,
                analysis,
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::tests::sample_report;

    async fn repo() -> (tempfile::TempDir, SqliteRepo) {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteRepo::connect(dir.path()).await.unwrap();
        (dir, repo)
    }

    #[tokio::test]
    async fn test_insert_assigns_batch_ids_in_order() {
        let (_dir, repo) = repo().await;
        let first = repo
            .insert_contacts(&[
                NewContact::new("Ada", "1815-12-10"),
                NewContact::new("Alan", "1912-06-23"),
            ])
            .await
            .unwrap();
        let second = repo
            .insert_contacts(&[NewContact::new("Grace", "1906-12-09")])
            .await
            .unwrap();

        assert!(first[0].id.ends_with("-0"));
        assert!(first[1].id.ends_with("-1"));
        assert_ne!(first[0].id, second[0].id);

        let listed = repo.list_contacts().await.unwrap();
        let names: Vec<_> = listed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Alan", "Grace"]);
        assert!(listed.iter().all(|c| c.report.is_none()));
    }

    #[tokio::test]
    async fn test_save_report_and_update_keep_report() {
        let (_dir, repo) = repo().await;
        let mut contact = repo
            .insert_contacts(&[NewContact::new("Ada", "1815-12-10")])
            .await
            .unwrap()
            .remove(0);

        repo.save_report(&contact.id, &sample_report()).await.unwrap();
        contact.notes = Some("Met at the engine demo".into());
        contact.birth_location = Some("London".into());
        repo.update_contact(&contact).await.unwrap();

        let stored = repo.list_contacts().await.unwrap().remove(0);
        assert_eq!(stored.report, Some(sample_report()));
        assert_eq!(stored.financial_cycle_theme.as_deref(), Some("Consolidation"));
        assert_eq!(stored.notes.as_deref(), Some("Met at the engine demo"));
        assert_eq!(stored.birth_location.as_deref(), Some("London"));
        assert_eq!(stored.birth_time, None);
    }

    #[tokio::test]
    async fn test_missing_contact_is_not_found() {
        let (_dir, repo) = repo().await;
        let err = repo.save_report("nope", &sample_report()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_contacts() {
        let (_dir, repo) = repo().await;
        let inserted = repo
            .insert_contacts(&[
                NewContact::new("A", "2000-01-01"),
                NewContact::new("B", "2000-01-02"),
                NewContact::new("C", "2000-01-03"),
            ])
            .await
            .unwrap();
        repo.delete_contacts(&[inserted[0].id.clone(), inserted[2].id.clone()])
            .await
            .unwrap();
        let left = repo.list_contacts().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "B");
    }

    #[tokio::test]
    async fn test_archetype_upsert_by_contact() {
        let (_dir, repo) = repo().await;
        let original = OriginalContact {
            id: "c-1".into(),
            identity: NewContact::new("Ada", "1815-12-10"),
        };
        let first = repo
            .save_archetype(&ArchetypeTemplate {
                id: "a-1".into(),
                name: "The Analyst".into(),
                report: sample_report(),
                original_contact: original.clone(),
            })
            .await
            .unwrap();
        let second = repo
            .save_archetype(&ArchetypeTemplate {
                id: "a-2".into(),
                name: "The Engine".into(),
                report: sample_report(),
                original_contact: original,
            })
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.name, "The Engine");
        let all = repo.list_archetypes().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].original_contact.identity.name, "Ada");
        assert!(repo.find_archetype_for_contact("c-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_journal_newest_first() {
        let (_dir, repo) = repo().await;
        for (id, date) in [("j1", "2024-01-01"), ("j2", "2024-03-01"), ("j3", "2024-02-01")] {
            repo.save_entry(&JournalEntry {
                id: id.into(),
                date: date.into(),
                content: format!("entry {id}"),
                analysis: None,
            })
            .await
            .unwrap();
        }
        repo.save_entry(&JournalEntry {
            id: "j1".into(),
            date: "2024-01-01".into(),
            content: "entry j1".into(),
            analysis: Some(JournalAnalysis {
                key_themes: "Patience".into(),
                growth_opportunity: "Rest".into(),
                reflection_question: "What can wait?".into(),
            }),
        })
        .await
        .unwrap();

        let entries = repo.list_entries().await.unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["j2", "j3", "j1"]);
        assert!(entries[2].analysis.is_some());
    }
}
