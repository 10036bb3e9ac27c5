//! Dataset listing and detail commands

use anyhow::{bail, Result};

use physidash_core::DatasetRecord;

use crate::output::Output;

/// List records, optionally filtered by a search string
pub fn list(records: &[DatasetRecord], search: Option<String>, output: &Output) -> Result<()> {
    match search {
        Some(query) => {
            let filtered: Vec<DatasetRecord> = records
                .iter()
                .filter(|r| matches_query(r, &query))
                .cloned()
                .collect();
            output.print_records(&filtered);
        }
        None => output.print_records(records),
    }
    Ok(())
}

/// Show a single record in full
pub fn show(records: &[DatasetRecord], id: String, output: &Output) -> Result<()> {
    let record_id = parse_record_id(&id, records)?;
    let record = records
        .iter()
        .find(|r| r.id == record_id)
        .ok_or_else(|| anyhow::anyhow!("Dataset not found: {}", id))?;

    output.print_record(record);
    Ok(())
}

/// Case-insensitive match over the fields worth searching
pub fn matches_query(record: &DatasetRecord, query: &str) -> bool {
    let query = query.to_lowercase();
    record.title.to_lowercase().contains(&query)
        || record.clinical_condition.to_lowercase().contains(&query)
        || record
            .physiological_modality
            .to_lowercase()
            .contains(&query)
        || record
            .keywords_used
            .iter()
            .any(|k| k.to_lowercase().contains(&query))
}

/// Parse a record ID (supports the full decimal id or a unique prefix)
fn parse_record_id(id: &str, records: &[DatasetRecord]) -> Result<i64> {
    // Try exact id first
    if let Ok(parsed) = id.parse::<i64>() {
        if records.iter().any(|r| r.id == parsed) {
            return Ok(parsed);
        }
    }

    // Try prefix match
    let matches: Vec<&DatasetRecord> = records
        .iter()
        .filter(|r| r.id.to_string().starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No dataset found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple datasets match '{}':", id);
            for record in &matches {
                eprintln!("  {} - {}", record.id, record.display_title());
            }
            bail!("Ambiguous ID. Please provide more digits.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<DatasetRecord> {
        let mut a = DatasetRecord::new(1700000001000, "MIT-BIH Arrhythmia Database");
        a.clinical_condition = "Arrhythmia".to_string();
        a.keywords_used = vec!["ECG".to_string()];

        let mut b = DatasetRecord::new(1700000002000, "Sleep-EDF");
        b.physiological_modality = "EEG, EOG".to_string();

        vec![a, b]
    }

    #[test]
    fn test_matches_query_fields() {
        let records = sample();
        assert!(matches_query(&records[0], "arrhythmia"));
        assert!(matches_query(&records[0], "ecg"));
        assert!(matches_query(&records[1], "eeg"));
        assert!(!matches_query(&records[1], "ecg"));
    }

    #[test]
    fn test_parse_record_id_exact() {
        let records = sample();
        assert_eq!(
            parse_record_id("1700000001000", &records).unwrap(),
            1700000001000
        );
    }

    #[test]
    fn test_parse_record_id_prefix() {
        let records = sample();
        assert_eq!(
            parse_record_id("17000000010", &records).unwrap(),
            1700000001000
        );
        // Shared prefix is ambiguous
        assert!(parse_record_id("1700", &records).is_err());
        // Unknown prefix
        assert!(parse_record_id("999", &records).is_err());
    }
}
