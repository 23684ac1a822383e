//! Bulk contact ingestion from pasted text or an uploaded CSV.
//!
//! Best-effort: never fails as a whole. Valid rows are returned alongside one error per
//! rejected row so the caller can show "N ready / M failed" and let the user fix just
//! the failing lines.
//!
//! Expected columns: `Name,Birth Date,Birth Time,Birth Location`. The header row is
//! optional; without one this positional order is assumed. Fields are split on bare
//! commas. Quoted fields containing commas are not supported.

use super::calendar::is_iso_date_shape;
use super::entities::NewContact;
use thiserror::Error;

/// Why input (or one line of it) was rejected. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("No data provided.")]
    NoData,

    #[error("CSV header is invalid. Make sure it contains at least 'name' and 'birth date'.")]
    InvalidHeader,

    #[error("Line {line}: Not enough data. Expected at least Name, Birth Date.")]
    NotEnoughFields { line: usize },

    #[error("Line {line}: Missing required fields (Name, Birth Date).")]
    MissingRequired { line: usize },

    #[error("Line {line}: Invalid birth date format for '{name}'. Please use YYYY-MM-DD.")]
    InvalidDate { line: usize, name: String },
}

impl ImportError {
    /// 1-based source line, `None` for whole-input errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            ImportError::NoData | ImportError::InvalidHeader => None,
            ImportError::NotEnoughFields { line }
            | ImportError::MissingRequired { line }
            | ImportError::InvalidDate { line, .. } => Some(*line),
        }
    }

    /// Whole-input errors abort the parse.
    pub fn is_structural(&self) -> bool {
        self.line().is_none()
    }
}

/// Accepted contacts and rejected-line errors, both in input order.
///
/// Blank lines contribute to neither list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub contacts: Vec<NewContact>,
    pub errors: Vec<ImportError>,
}

impl ParseOutcome {
    fn fatal(error: ImportError) -> Self {
        Self {
            contacts: Vec::new(),
            errors: vec![error],
        }
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Resolved column positions. Optional columns may be absent from a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    name: usize,
    birth_date: usize,
    birth_time: Option<usize>,
    birth_location: Option<usize>,
}

impl Columns {
    const POSITIONAL: Columns = Columns {
        name: 0,
        birth_date: 1,
        birth_time: Some(2),
        birth_location: Some(3),
    };
}

/// Trim, strip surrounding double quotes, trim again.
fn clean_field(raw: &str) -> &str {
    raw.trim().trim_matches('"').trim()
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').map(clean_field).collect()
}

fn looks_like_header(first_line_lower: &str) -> bool {
    first_line_lower.contains("name")
        && (first_line_lower.contains("date") || first_line_lower.contains("birthdate"))
}

fn resolve_header(header_lower: &str) -> Option<Columns> {
    let cells = split_fields(header_lower);
    let find = |names: &[&str]| cells.iter().position(|c| names.contains(c));

    Some(Columns {
        name: find(&["name"])?,
        birth_date: find(&["birth date", "birthdate"])?,
        birth_time: find(&["birth time", "birthtime"]),
        birth_location: find(&["birth location", "birthlocation"]),
    })
}

/// Shape-only check: `2023-99-99` passes.
pub fn is_birth_date_shape(s: &str) -> bool {
    is_iso_date_shape(s)
}

fn optional_field(fields: &[&str], index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| fields.get(i))
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

fn parse_line(fields: &[&str], columns: &Columns, line: usize) -> Result<NewContact, ImportError> {
    if fields.len() < 2 {
        return Err(ImportError::NotEnoughFields { line });
    }

    let name = fields.get(columns.name).copied().unwrap_or_default();
    let birth_date = fields.get(columns.birth_date).copied().unwrap_or_default();
    if name.is_empty() || birth_date.is_empty() {
        return Err(ImportError::MissingRequired { line });
    }

    if !is_birth_date_shape(birth_date) {
        return Err(ImportError::InvalidDate {
            line,
            name: name.to_string(),
        });
    }

    Ok(NewContact {
        name: name.to_string(),
        birth_date: birth_date.to_string(),
        birth_time: optional_field(fields, columns.birth_time),
        birth_location: optional_field(fields, columns.birth_location),
        notes: None,
    })
}

/// Parse pasted text or CSV content into contacts plus per-line errors.
///
/// Line numbers in errors are 1-based over the trimmed input and count the header and
/// blank lines, so they match what the user sees in their file.
pub fn parse_contacts(raw_text: &str) -> ParseOutcome {
    let text = raw_text.trim();
    if text.is_empty() {
        return ParseOutcome::fatal(ImportError::NoData);
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let first_lower = lines[0].to_lowercase();

    let (columns, data_start) = if looks_like_header(&first_lower) {
        match resolve_header(&first_lower) {
            Some(columns) => (columns, 1),
            None => return ParseOutcome::fatal(ImportError::InvalidHeader),
        }
    } else {
        (Columns::POSITIONAL, 0)
    };

    let mut outcome = ParseOutcome::default();
    for (idx, line) in lines.iter().enumerate().skip(data_start) {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_fields(line);
        match parse_line(&fields, &columns, idx + 1) {
            Ok(contact) => outcome.contacts.push(contact),
            Err(e) => outcome.errors.push(e),
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_with_one_contact() {
        let out = parse_contacts("Name,Birth Date\nJohn Doe,1990-01-01");
        assert!(out.errors.is_empty());
        assert_eq!(out.contacts, vec![NewContact::new("John Doe", "1990-01-01")]);
    }

    #[test]
    fn test_invalid_date_without_header() {
        let out = parse_contacts("John Doe,not-a-date");
        assert!(out.contacts.is_empty());
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].line(), Some(1));
        assert_eq!(
            out.error_messages()[0],
            "Line 1: Invalid birth date format for 'John Doe'. Please use YYYY-MM-DD."
        );
    }

    #[test]
    fn test_empty_input() {
        for input in ["", "   ", "\n\n"] {
            let out = parse_contacts(input);
            assert!(out.contacts.is_empty());
            assert_eq!(out.error_messages(), vec!["No data provided.".to_string()]);
            assert!(out.errors[0].is_structural());
        }
    }

    #[test]
    fn test_blank_lines_skipped_without_shifting_line_numbers() {
        let out = parse_contacts("A,2020-01-01\n\nB,2020-02-02");
        assert_eq!(out.contacts.len(), 2);
        assert!(out.errors.is_empty());

        let out = parse_contacts("A,2020-01-01\n   \nB,bad\nC");
        assert_eq!(out.contacts.len(), 1);
        assert_eq!(
            out.error_messages(),
            vec![
                "Line 3: Invalid birth date format for 'B'. Please use YYYY-MM-DD.".to_string(),
                "Line 4: Not enough data. Expected at least Name, Birth Date.".to_string(),
            ]
        );
    }

    #[test]
    fn test_header_line_counts_toward_line_numbers() {
        let out = parse_contacts("name,birthdate\n,1990-01-01\nAda,");
        assert!(out.contacts.is_empty());
        let lines: Vec<_> = out.errors.iter().map(|e| e.line()).collect();
        assert_eq!(lines, vec![Some(2), Some(3)]);
        assert!(matches!(out.errors[0], ImportError::MissingRequired { .. }));
    }

    #[test]
    fn test_header_reorders_columns_and_optional_fields() {
        let input = "\"Birth Location\",\"Birth Date\",\"Name\",\"Birth Time\"\n\
                     \"Funchal, Madeira\",1985-02-05,Cristiano,05:25";
        let out = parse_contacts(input);
        // Naive split: the quoted comma shifts the columns, so this row fails.
        assert_eq!(out.contacts.len(), 0);
        assert_eq!(out.errors.len(), 1);

        let out = parse_contacts("birthlocation,birth date,NAME,birthtime\nPretoria,1971-06-28,Elon,07:30");
        assert!(out.errors.is_empty());
        let c = &out.contacts[0];
        assert_eq!(c.name, "Elon");
        assert_eq!(c.birth_date, "1971-06-28");
        assert_eq!(c.birth_time.as_deref(), Some("07:30"));
        assert_eq!(c.birth_location.as_deref(), Some("Pretoria"));
    }

    #[test]
    fn test_header_without_optional_columns() {
        let out = parse_contacts("Name,Birth Date,Email\nAda,1815-12-10,ada@example.com");
        assert!(out.errors.is_empty());
        assert_eq!(out.contacts[0].birth_time, None);
        assert_eq!(out.contacts[0].birth_location, None);
    }

    #[test]
    fn test_invalid_header() {
        let out = parse_contacts("Full Name,Date of Birth\nAda,1815-12-10");
        assert!(out.contacts.is_empty());
        assert_eq!(out.errors, vec![ImportError::InvalidHeader]);
        assert_eq!(
            out.errors[0].to_string(),
            "CSV header is invalid. Make sure it contains at least 'name' and 'birth date'."
        );
    }

    #[test]
    fn test_positional_optional_fields_and_quotes() {
        let out = parse_contacts("\"Taylor Swift\" , 1989-12-13 , 05:17, Reading\r\nNo Time,2001-01-01,,");
        assert!(out.errors.is_empty());
        assert_eq!(out.contacts[0].name, "Taylor Swift");
        assert_eq!(out.contacts[0].birth_time.as_deref(), Some("05:17"));
        assert_eq!(out.contacts[0].birth_location.as_deref(), Some("Reading"));
        assert_eq!(out.contacts[1].birth_time, None);
        assert_eq!(out.contacts[1].birth_location, None);
    }

    #[test]
    fn test_shape_only_date_validation() {
        let out = parse_contacts("Odd,2023-99-99");
        assert_eq!(out.contacts.len(), 1);
        assert!(!is_birth_date_shape("1990-1-01"));
        assert!(!is_birth_date_shape(" 1990-01-01"));

        let out = parse_contacts("Ada,١٩٩٠-١٠-٢٨");
        assert!(out.contacts.is_empty());
        assert_eq!(
            out.errors,
            vec![ImportError::InvalidDate {
                line: 1,
                name: "Ada".into()
            }]
        );
    }

    #[test]
    fn test_accepted_records_satisfy_invariants() {
        let input = "x,2020-01-01\n,2020-01-01\ny,20-01-01\nz,2020-01-01,,,extra\n\"\",\"\"\nw";
        let out = parse_contacts(input);
        assert_eq!(out.contacts.len(), 2);
        for c in &out.contacts {
            assert!(!c.name.is_empty());
            assert!(is_birth_date_shape(&c.birth_date));
        }
        assert_eq!(out.errors.len(), 4);
    }
}
