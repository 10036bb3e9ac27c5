//! Export rendering
//!
//! Turns the in-memory collection into downloadable artifacts: pretty JSON,
//! CSV with a fixed 15-column header, or a Markdown report. An empty
//! collection renders nothing (no file is produced).

use chrono::{DateTime, Local};

use crate::models::DatasetRecord;

/// The fixed CSV column set, in document field order
const CSV_COLUMNS: [&str; 15] = [
    "Title",
    "Year",
    "Description",
    "Physiological_Modality",
    "Clinical_Condition",
    "Environment_or_Acquisition_Setting",
    "Target_Research_Task",
    "Metadata_Completeness",
    "Dataset_Size",
    "Population_Type",
    "Licensing_or_Availability",
    "Keywords_Used",
    "Parent_Project",
    "Limitations",
    "Dataset_URL",
];

/// Export format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    /// File name of the exported artifact
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "physionet_curated.json",
            ExportFormat::Csv => "physionet_curated.csv",
            ExportFormat::Markdown => "physionet_curated.md",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, csv, md",
                s
            )),
        }
    }
}

/// Render the collection in the requested format
///
/// Returns `None` for an empty collection.
pub fn render(records: &[DatasetRecord], format: ExportFormat) -> Option<String> {
    match format {
        ExportFormat::Json => to_json(records),
        ExportFormat::Csv => to_csv(records),
        ExportFormat::Markdown => to_markdown(records, Local::now()),
    }
}

/// Pretty-printed JSON of the full collection, field order as received
pub fn to_json(records: &[DatasetRecord]) -> Option<String> {
    if records.is_empty() {
        return None;
    }
    // Serialization of a plain struct slice cannot fail
    Some(serde_json::to_string_pretty(records).expect("record serialization"))
}

/// CSV with the fixed 15-column header
pub fn to_csv(records: &[DatasetRecord]) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    let mut out = String::new();
    out.push_str(&CSV_COLUMNS.join(","));
    out.push('\n');

    for record in records {
        let keywords = record.keywords_used.join("; ");
        let cells: [&str; 15] = [
            &record.title,
            &record.year,
            &record.description,
            &record.physiological_modality,
            &record.clinical_condition,
            &record.environment,
            &record.target_research_task,
            &record.metadata_completeness,
            &record.dataset_size,
            &record.population_type,
            &record.licensing,
            &keywords,
            &record.parent_project,
            &record.limitations,
            record.dataset_url.as_deref().unwrap_or(""),
        ];

        let row: Vec<String> = cells.iter().map(|cell| escape_csv(cell)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    Some(out)
}

/// Markdown report: document header, then one section per record
pub fn to_markdown(records: &[DatasetRecord], generated_at: DateTime<Local>) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    let mut out = String::new();
    out.push_str("# PhysioNet Curated Datasets\n\n");
    out.push_str(&format!(
        "Generated: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!("Total datasets: {}\n\n", records.len()));

    for (index, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "# Dataset {}: {}\n\n",
            index + 1,
            record.display_title()
        ));

        push_field(&mut out, "Year", &record.year);
        push_field(&mut out, "Description", &record.description);
        push_field(
            &mut out,
            "Physiological Modality",
            &record.physiological_modality,
        );
        push_field(&mut out, "Clinical Condition", &record.clinical_condition);
        push_field(
            &mut out,
            "Environment or Acquisition Setting",
            &record.environment,
        );
        push_field(
            &mut out,
            "Target Research Task",
            &record.target_research_task,
        );
        push_field(
            &mut out,
            "Metadata Completeness",
            &record.metadata_completeness,
        );
        push_field(&mut out, "Dataset Size", &record.dataset_size);
        push_field(&mut out, "Population Type", &record.population_type);
        push_field(&mut out, "Licensing or Availability", &record.licensing);
        push_field(&mut out, "Keywords Used", &record.keywords_used.join(", "));
        push_field(&mut out, "Parent Project", &record.parent_project);
        push_field(&mut out, "Limitations", &record.limitations);
        push_field(
            &mut out,
            "Dataset URL",
            record.dataset_url.as_deref().unwrap_or(""),
        );

        out.push('\n');
    }

    Some(out)
}

/// Quote a CSV cell when it contains a comma, double quote, or newline
///
/// Internal double quotes are doubled, per standard CSV escaping.
fn escape_csv(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Append one bolded key/value line
fn push_field(out: &mut String, key: &str, value: &str) {
    out.push_str(&format!("**{}:** {}\n", key, value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_records() -> Vec<DatasetRecord> {
        let mut first = DatasetRecord::new(1, "MIT-BIH Arrhythmia Database");
        first.year = "2001".to_string();
        first.description = "Two-channel ambulatory ECG, annotated".to_string();
        first.physiological_modality = "ECG".to_string();
        first.metadata_completeness = "High".to_string();
        first.keywords_used = vec!["ECG".to_string(), "ICU".to_string()];
        first.dataset_url = Some("https://physionet.org/content/mitdb/".to_string());

        let mut second = DatasetRecord::new(2, "PTB-XL");
        second.metadata_completeness = "Moderate".to_string();

        vec![first, second]
    }

    #[test]
    fn test_empty_collection_is_a_no_op() {
        assert!(to_json(&[]).is_none());
        assert!(to_csv(&[]).is_none());
        assert!(to_markdown(&[], Local::now()).is_none());
    }

    #[test]
    fn test_json_round_trips_deep_equal() {
        let records = sample_records();
        let json = to_json(&records).unwrap();
        let parsed: Vec<DatasetRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_csv_header_and_row_count() {
        let records = sample_records();
        let csv = to_csv(&records).unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert_eq!(header.split(',').count(), 15);
        assert!(header.starts_with("Title,Year,Description"));
        assert!(header.ends_with("Parent_Project,Limitations,Dataset_URL"));

        assert_eq!(lines.count(), records.len());
    }

    #[test]
    fn test_csv_keywords_joined_with_semicolon() {
        let csv = to_csv(&sample_records()).unwrap();
        let first_row = csv.lines().nth(1).unwrap();
        assert!(first_row.contains("ECG; ICU"));
    }

    #[test]
    fn test_csv_comma_in_description_is_quoted() {
        let records = sample_records();
        let csv = to_csv(&records).unwrap();
        let first_row = csv.lines().nth(1).unwrap();
        // The comma-containing description cell is wrapped in quotes
        assert!(first_row.contains("\"Two-channel ambulatory ECG, annotated\""));
    }

    #[test]
    fn test_csv_escaping_rules() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_csv_quoted_cell_reparses_to_original() {
        // Standard CSV unquoting: strip outer quotes, undouble inner ones
        let original = "Two-channel, \"annotated\" ECG";
        let escaped = escape_csv(original);
        assert!(escaped.starts_with('"') && escaped.ends_with('"'));
        let unquoted = escaped[1..escaped.len() - 1].replace("\"\"", "\"");
        assert_eq!(unquoted, original);
    }

    #[test]
    fn test_markdown_header_and_sections() {
        let records = sample_records();
        let generated = Local.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let md = to_markdown(&records, generated).unwrap();

        assert!(md.starts_with("# PhysioNet Curated Datasets\n"));
        assert!(md.contains("Generated: 2024-06-01 12:00:00"));
        assert!(md.contains("Total datasets: 2"));
        assert!(md.contains("# Dataset 1: MIT-BIH Arrhythmia Database"));
        assert!(md.contains("# Dataset 2: PTB-XL"));
        assert!(md.contains("**Keywords Used:** ECG, ICU"));
        assert!(md.contains("**Metadata Completeness:** High"));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!(
            "markdown".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_artifact_file_names() {
        assert_eq!(ExportFormat::Json.file_name(), "physionet_curated.json");
        assert_eq!(ExportFormat::Csv.file_name(), "physionet_curated.csv");
        assert_eq!(ExportFormat::Markdown.file_name(), "physionet_curated.md");
    }
}
