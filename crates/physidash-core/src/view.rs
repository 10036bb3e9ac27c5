//! Derived view state
//!
//! The single mutable state container the dashboard renders from: the
//! record collection (ordered as received), a loading flag, and the
//! last-refresh timestamp, plus the badge derivations.

use chrono::{DateTime, Local};

use crate::models::DatasetRecord;
use crate::source::RefreshOutcome;

/// Maximum width of the modality badge before truncation
const BADGE_MAX_LEN: usize = 14;

/// Three-way classification of Metadata_Completeness for badge coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletenessClass {
    /// "High" (positive)
    High,
    /// "Moderate" (neutral)
    Moderate,
    /// Anything else, including absent (default)
    Low,
}

impl CompletenessClass {
    /// Classify a raw completeness value
    pub fn classify(value: &str) -> Self {
        match value.trim() {
            "High" => CompletenessClass::High,
            "Moderate" => CompletenessClass::Moderate,
            _ => CompletenessClass::Low,
        }
    }
}

/// Where the currently displayed collection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataIndicator {
    /// Fresh copy from the source
    Live,
    /// Fallback cache copy (source unreachable)
    Cached,
    /// Document not created yet
    Empty,
    /// Last refresh failed with nothing to fall back on
    Stale,
}

/// The dashboard's view state
#[derive(Debug)]
pub struct ViewState {
    /// Records, ordered as received from the document
    pub records: Vec<DatasetRecord>,
    /// Whether a refresh is being awaited (initial load)
    pub loading: bool,
    /// When the document was last successfully retrieved
    pub last_refresh: Option<DateTime<Local>>,
    /// Provenance of the displayed collection
    pub indicator: DataIndicator,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            loading: true,
            last_refresh: None,
            indicator: DataIndicator::Stale,
        }
    }

    /// Apply a refresh result
    ///
    /// Fresh and Empty replace the collection and stamp last-refresh;
    /// Cached replaces the collection without claiming freshness;
    /// Unavailable leaves everything as it was.
    pub fn apply(&mut self, outcome: RefreshOutcome) {
        self.loading = false;
        match outcome {
            RefreshOutcome::Fresh(records) => {
                self.records = records;
                self.last_refresh = Some(Local::now());
                self.indicator = DataIndicator::Live;
            }
            RefreshOutcome::Empty => {
                self.records.clear();
                self.last_refresh = Some(Local::now());
                self.indicator = DataIndicator::Empty;
            }
            RefreshOutcome::Cached(records) => {
                self.records = records;
                self.indicator = DataIndicator::Cached;
            }
            RefreshOutcome::Unavailable => {
                // Keep the current collection
                self.indicator = DataIndicator::Stale;
            }
        }
    }

    /// Remove a record from the view by identifier
    ///
    /// View-only: the backing document and the fallback cache are never
    /// touched, so a later refresh restores the record if the document
    /// still lists it.
    pub fn remove(&mut self, id: i64) -> Option<DatasetRecord> {
        let pos = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(pos))
    }

    /// Look up a record by identifier
    pub fn get(&self, id: i64) -> Option<&DatasetRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Pluralized total, e.g. "1 dataset" / "12 datasets"
    pub fn count_label(&self) -> String {
        let n = self.records.len();
        if n == 1 {
            "1 dataset".to_string()
        } else {
            format!("{} datasets", n)
        }
    }

    /// Display string for the last refresh time
    pub fn last_refresh_label(&self) -> String {
        match self.last_refresh {
            Some(ts) => ts.format("%H:%M:%S").to_string(),
            None => "never".to_string(),
        }
    }
}

/// Modality badge for a record: truncated first-listed tag, if any
pub fn modality_badge(record: &DatasetRecord) -> Option<String> {
    let tag = record.first_modality()?;
    if tag.chars().count() > BADGE_MAX_LEN {
        let truncated: String = tag.chars().take(BADGE_MAX_LEN - 1).collect();
        Some(format!("{}…", truncated))
    } else {
        Some(tag.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<DatasetRecord> {
        (0..n)
            .map(|i| DatasetRecord::new(i as i64 + 1, format!("Dataset {}", i + 1)))
            .collect()
    }

    #[test]
    fn test_fresh_replaces_collection_in_order() {
        let mut view = ViewState::new();
        view.apply(RefreshOutcome::Fresh(records(3)));

        assert_eq!(view.records.len(), 3);
        assert_eq!(view.records[0].id, 1);
        assert_eq!(view.records[2].id, 3);
        assert!(view.last_refresh.is_some());
        assert_eq!(view.indicator, DataIndicator::Live);
        assert!(!view.loading);
    }

    #[test]
    fn test_not_found_yields_empty_collection_not_error() {
        let mut view = ViewState::new();
        view.apply(RefreshOutcome::Fresh(records(2)));
        view.apply(RefreshOutcome::Empty);

        assert!(view.records.is_empty());
        assert_eq!(view.indicator, DataIndicator::Empty);
        assert!(view.last_refresh.is_some());
    }

    #[test]
    fn test_cached_replaces_without_freshness_claim() {
        let mut view = ViewState::new();
        view.apply(RefreshOutcome::Cached(records(5)));

        assert_eq!(view.records.len(), 5);
        assert_eq!(view.indicator, DataIndicator::Cached);
        assert!(view.last_refresh.is_none());
    }

    #[test]
    fn test_unavailable_leaves_collection_unchanged() {
        let mut view = ViewState::new();
        view.apply(RefreshOutcome::Fresh(records(4)));
        let before = view.records.clone();

        view.apply(RefreshOutcome::Unavailable);
        assert_eq!(view.records, before);
        assert_eq!(view.indicator, DataIndicator::Stale);
    }

    #[test]
    fn test_remove_is_view_only_and_exact() {
        let mut view = ViewState::new();
        view.apply(RefreshOutcome::Fresh(records(3)));

        let removed = view.remove(2).unwrap();
        assert_eq!(removed.id, 2);
        assert_eq!(view.records.len(), 2);
        assert_eq!(view.records[0].id, 1);
        assert_eq!(view.records[1].id, 3);

        // Unknown id removes nothing
        assert!(view.remove(99).is_none());
        assert_eq!(view.records.len(), 2);
    }

    #[test]
    fn test_refresh_restores_deleted_record() {
        let mut view = ViewState::new();
        view.apply(RefreshOutcome::Fresh(records(3)));
        view.remove(2);
        assert!(view.get(2).is_none());

        // The backing document still lists the record; the next refresh wins
        view.apply(RefreshOutcome::Fresh(records(3)));
        assert!(view.get(2).is_some());
    }

    #[test]
    fn test_count_label_pluralization() {
        let mut view = ViewState::new();
        assert_eq!(view.count_label(), "0 datasets");

        view.apply(RefreshOutcome::Fresh(records(1)));
        assert_eq!(view.count_label(), "1 dataset");

        view.apply(RefreshOutcome::Fresh(records(2)));
        assert_eq!(view.count_label(), "2 datasets");
    }

    #[test]
    fn test_last_refresh_label_never() {
        let view = ViewState::new();
        assert_eq!(view.last_refresh_label(), "never");
    }

    #[test]
    fn test_completeness_classification() {
        assert_eq!(CompletenessClass::classify("High"), CompletenessClass::High);
        assert_eq!(
            CompletenessClass::classify("Moderate"),
            CompletenessClass::Moderate
        );
        assert_eq!(CompletenessClass::classify("Low"), CompletenessClass::Low);
        assert_eq!(CompletenessClass::classify(""), CompletenessClass::Low);
        assert_eq!(
            CompletenessClass::classify("Not specified"),
            CompletenessClass::Low
        );
    }

    #[test]
    fn test_modality_badge() {
        let mut record = DatasetRecord::new(1, "Test");
        assert!(modality_badge(&record).is_none());

        record.physiological_modality = "ECG, PPG".to_string();
        assert_eq!(modality_badge(&record).unwrap(), "ECG");

        record.physiological_modality = "Not specified".to_string();
        assert!(modality_badge(&record).is_none());

        record.physiological_modality = "Continuous Blood Pressure".to_string();
        let badge = modality_badge(&record).unwrap();
        assert!(badge.ends_with('…'));
        assert!(badge.chars().count() <= BADGE_MAX_LEN);
    }
}
