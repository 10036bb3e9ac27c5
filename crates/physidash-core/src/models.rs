//! Data model for curated dataset records
//!
//! A `DatasetRecord` mirrors one entry of the backing JSON document written
//! by the external curation agent. Field names follow the document exactly;
//! struct order mirrors document order so pretty-printed export keeps the
//! fields as received.

use serde::{Deserialize, Serialize};

/// Sentinel the curation agent writes for fields it could not fill
pub const NOT_SPECIFIED: &str = "Not specified";

/// One curated dataset record
///
/// Every field is defaultable: the document carries no schema beyond the
/// agent's own conventions, and partially-filled records are expected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetRecord {
    /// Dataset title
    #[serde(rename = "Title", default)]
    pub title: String,
    /// Publication year
    #[serde(rename = "Year", default)]
    pub year: String,
    /// Free-text description
    #[serde(rename = "Description", default)]
    pub description: String,
    /// Comma-separated modality tags (e.g. "ECG, PPG")
    #[serde(rename = "Physiological_Modality", default)]
    pub physiological_modality: String,
    /// Clinical condition(s) covered
    #[serde(rename = "Clinical_Condition", default)]
    pub clinical_condition: String,
    /// Acquisition environment (ICU, ambulatory, ...)
    #[serde(rename = "Environment_or_Acquisition_Setting", default)]
    pub environment: String,
    /// Research task the dataset targets
    #[serde(rename = "Target_Research_Task", default)]
    pub target_research_task: String,
    /// "High", "Moderate" or "Low" as judged by the agent
    #[serde(rename = "Metadata_Completeness", default)]
    pub metadata_completeness: String,
    /// Subject count, hours of recording, etc.
    #[serde(rename = "Dataset_Size", default)]
    pub dataset_size: String,
    /// Population covered (adult, neonatal, ...)
    #[serde(rename = "Population_Type", default)]
    pub population_type: String,
    /// License or access terms
    #[serde(rename = "Licensing_or_Availability", default)]
    pub licensing: String,
    /// Keywords the agent searched with
    #[serde(rename = "Keywords_Used", default)]
    pub keywords_used: Vec<String>,
    /// Parent project or challenge
    #[serde(rename = "Parent_Project", default)]
    pub parent_project: String,
    /// Known limitations
    #[serde(rename = "Limitations", default)]
    pub limitations: String,
    /// Source page on PhysioNet
    #[serde(rename = "Dataset_URL", default, skip_serializing_if = "Option::is_none")]
    pub dataset_url: Option<String>,
    /// Identifier assigned by the agent (epoch milliseconds at curation time)
    #[serde(default)]
    pub id: i64,
    /// ISO timestamp of when the agent curated the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curated_date: Option<String>,
}

impl Default for DatasetRecord {
    fn default() -> Self {
        Self {
            title: String::new(),
            year: String::new(),
            description: String::new(),
            physiological_modality: String::new(),
            clinical_condition: String::new(),
            environment: String::new(),
            target_research_task: String::new(),
            metadata_completeness: String::new(),
            dataset_size: String::new(),
            population_type: String::new(),
            licensing: String::new(),
            keywords_used: Vec::new(),
            parent_project: String::new(),
            limitations: String::new(),
            dataset_url: None,
            id: 0,
            curated_date: None,
        }
    }
}

impl DatasetRecord {
    /// Create a record with just an id and title (mostly for tests)
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Self::default()
        }
    }

    /// First listed modality tag, if any
    ///
    /// The modality field is a comma-separated string; only the first
    /// segment is surfaced as a badge. The curation pipeline's
    /// "Not specified" sentinel counts as absent.
    pub fn first_modality(&self) -> Option<&str> {
        let first = self.physiological_modality.split(',').next()?.trim();
        if first.is_empty() || first == NOT_SPECIFIED {
            None
        } else {
            Some(first)
        }
    }

    /// Title with a fallback for untitled records
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(untitled)"
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_sparse_json() {
        let record: DatasetRecord =
            serde_json::from_str(r#"{"Title": "MIT-BIH", "id": 42}"#).unwrap();
        assert_eq!(record.title, "MIT-BIH");
        assert_eq!(record.id, 42);
        assert_eq!(record.year, "");
        assert!(record.keywords_used.is_empty());
        assert!(record.dataset_url.is_none());
        assert!(record.curated_date.is_none());
    }

    #[test]
    fn test_document_field_names() {
        let mut record = DatasetRecord::new(1, "Test");
        record.physiological_modality = "ECG".to_string();
        record.keywords_used = vec!["ecg".to_string()];

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("Title").is_some());
        assert!(json.get("Physiological_Modality").is_some());
        assert!(json.get("Keywords_Used").is_some());
        // Absent optional fields are omitted, not null
        assert!(json.get("Dataset_URL").is_none());
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut record = DatasetRecord::new(1700000000000, "PTB-XL");
        record.year = "2020".to_string();
        record.keywords_used = vec!["ecg".to_string(), "12-lead".to_string()];
        record.dataset_url = Some("https://physionet.org/content/ptb-xl/".to_string());

        let json = serde_json::to_string(&record).unwrap();
        let parsed: DatasetRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }

    #[test]
    fn test_first_modality() {
        let mut record = DatasetRecord::new(1, "Test");
        assert_eq!(record.first_modality(), None);

        record.physiological_modality = "ECG, PPG, Respiratory".to_string();
        assert_eq!(record.first_modality(), Some("ECG"));

        record.physiological_modality = "Not specified".to_string();
        assert_eq!(record.first_modality(), None);
    }

    #[test]
    fn test_display_title() {
        assert_eq!(DatasetRecord::new(1, "").display_title(), "(untitled)");
        assert_eq!(DatasetRecord::new(1, "MIMIC-IV").display_title(), "MIMIC-IV");
    }
}
