//! CSV utilities for model context. Uses the `csv` crate for safe serialization.
//!
//! Converts contacts to a semicolon-delimited table suitable for synergy prompts.

use crate::domain::Contact;

const HEADER: [&str; 5] = ["Name", "Birth Date", "Birth Time", "Birth Location", "Report"];
const NOT_PROVIDED: &str = "Not provided";

fn flatten_text(s: &str) -> String {
    s.replace('\n', " ").replace('\r', "")
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String, csv::Error> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;
    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

/// Convert contacts to a CSV string for model context.
///
/// Format: `Name;Birth Date;Birth Time;Birth Location;Report`. The report column holds
/// the compact JSON report, or is empty when the contact has none.
pub fn contacts_to_csv(contacts: &[Contact]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_writer(Vec::new());

    wtr.write_record(HEADER)?;

    for c in contacts {
        let report = match &c.report {
            Some(r) => serde_json::to_string(r)
                .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?,
            None => String::new(),
        };
        wtr.write_record([
            flatten_text(&c.name),
            c.birth_date.clone(),
            c.birth_time.clone().unwrap_or_else(|| NOT_PROVIDED.into()),
            c.birth_location
                .as_deref()
                .map(flatten_text)
                .unwrap_or_else(|| NOT_PROVIDED.into()),
            report,
        ])?;
    }

    wtr.flush()?;
    into_string(wtr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewContact;
    use crate::domain::report::tests::sample_report;

    #[test]
    fn test_contacts_to_csv_basic() {
        let mut ada = Contact::from_new("1-0".into(), NewContact::new("Ada", "1815-12-10"));
        ada.birth_location = Some("London".into());
        let alan = Contact::from_new("1-1".into(), NewContact::new("Alan", "1912-06-23"));

        let csv = contacts_to_csv(&[ada, alan]).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "Name;Birth Date;Birth Time;Birth Location;Report");
        assert_eq!(lines[1], "Ada;1815-12-10;Not provided;London;");
        assert_eq!(lines[2], "Alan;1912-06-23;Not provided;Not provided;");
    }

    #[test]
    fn test_report_json_is_quoted_and_readable_back() {
        let mut ada = Contact::from_new("1-0".into(), NewContact::new("Ada; Countess", "1815-12-10"));
        ada.report = Some(sample_report());
        ada.notes = Some("not exported".into());

        let csv = contacts_to_csv(&[ada]).unwrap();
        assert!(!csv.contains("not exported"));

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(csv.as_bytes());
        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "Ada; Countess");
        let report: serde_json::Value = serde_json::from_str(&row[4]).unwrap();
        assert_eq!(report["identity"]["archetypeTitle"], "The Visionary Bridge");
    }
}
