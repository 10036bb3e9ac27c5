//! Application state and logic

use std::time::{Duration, Instant};

use physidash_core::{export, DatasetRecord, ExportFormat, RefreshOutcome, ViewState};

use crate::clipboard::copy_to_clipboard;

/// How long transient status messages stay visible
const STATUS_TIMEOUT: Duration = Duration::from_secs(2);

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Filter/search mode (after pressing /)
    Filter,
    /// Delete confirmation modal (after pressing d)
    ConfirmDelete,
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// View state fed by the refresh pipeline (full collection)
    pub view: ViewState,
    /// Records currently displayed (filter applied)
    pub rows: Vec<DatasetRecord>,
    /// Currently selected row index
    pub selected: usize,
    /// Scroll offset for the detail pane
    pub detail_scroll: u16,
    /// Filter text for real-time filtering
    pub filter_text: String,
    /// Cursor position in the filter input
    pub filter_cursor: usize,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Whether a refresh task is currently in flight (single-flight guard)
    pub refresh_in_flight: bool,
    /// Record pending delete confirmation
    pub pending_delete: Option<i64>,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Pending 'g' keypress for gg sequence (with timestamp)
    pub pending_g: Option<Instant>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            view: ViewState::new(),
            rows: Vec::new(),
            selected: 0,
            detail_scroll: 0,
            filter_text: String::new(),
            filter_cursor: 0,
            status_message: None,
            status_message_time: None,
            refresh_in_flight: false,
            pending_delete: None,
            show_help: false,
            pending_g: None,
        }
    }

    /// Set a status message (auto-dismissed after 2 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// The currently selected record
    pub fn current_record(&self) -> Option<&DatasetRecord> {
        self.rows.get(self.selected)
    }

    /// Apply a completed refresh to the view
    pub fn apply_refresh(&mut self, outcome: RefreshOutcome) {
        self.refresh_in_flight = false;
        let message = match &outcome {
            RefreshOutcome::Fresh(records) => format!("Refreshed: {} records", records.len()),
            RefreshOutcome::Empty => "Refreshed: no datasets curated yet".to_string(),
            RefreshOutcome::Cached(records) => {
                format!("Source unreachable; showing {} cached records", records.len())
            }
            RefreshOutcome::Unavailable => "Source unreachable; no cached copy".to_string(),
        };
        self.view.apply(outcome);
        self.apply_filter();
        self.set_status(message);
    }

    /// Rebuild the displayed rows from the collection and filter text
    pub fn apply_filter(&mut self) {
        if self.filter_text.is_empty() {
            self.rows = self.view.records.clone();
        } else {
            let query = self.filter_text.clone();
            self.rows = self
                .view
                .records
                .iter()
                .filter(|r| crate::commands::dataset::matches_query(r, &query))
                .cloned()
                .collect();
        }

        // Clamp selection to new list bounds (preserve position when possible)
        if self.rows.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.rows.len() - 1);
        }
    }

    /// Move selection up
    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.detail_scroll = 0;
        }
    }

    /// Move selection down
    pub fn move_down(&mut self) {
        if self.selected < self.rows.len().saturating_sub(1) {
            self.selected += 1;
            self.detail_scroll = 0;
        }
    }

    /// Move selection to the first row (vim 'gg')
    pub fn move_to_first(&mut self) {
        self.selected = 0;
        self.detail_scroll = 0;
    }

    /// Move selection to the last row (vim 'G')
    pub fn move_to_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
        self.detail_scroll = 0;
    }

    /// Enter filter mode
    pub fn enter_filter_mode(&mut self) {
        self.input_mode = InputMode::Filter;
        self.filter_text.clear();
        self.filter_cursor = 0;
        self.apply_filter();
    }

    /// Exit filter mode, clearing the filter
    pub fn clear_filter(&mut self) {
        self.input_mode = InputMode::Normal;
        self.filter_text.clear();
        self.filter_cursor = 0;
        self.apply_filter();
    }

    /// Insert a character into the filter input
    pub fn insert_char(&mut self, c: char) {
        self.filter_text.insert(self.filter_cursor, c);
        self.filter_cursor += c.len_utf8();
        self.apply_filter();
    }

    /// Delete the character before the cursor
    pub fn delete_char(&mut self) {
        if self.filter_cursor > 0 {
            let prev = self.filter_text[..self.filter_cursor]
                .chars()
                .next_back()
                .map(|c| c.len_utf8())
                .unwrap_or(0);
            self.filter_cursor -= prev;
            self.filter_text.remove(self.filter_cursor);
            self.apply_filter();
        }
    }

    /// Ask for confirmation before removing the selected record
    pub fn request_delete(&mut self) {
        if let Some(record) = self.current_record() {
            self.pending_delete = Some(record.id);
            self.input_mode = InputMode::ConfirmDelete;
        }
    }

    /// Confirm the pending delete (view-only removal)
    pub fn confirm_delete(&mut self) {
        self.input_mode = InputMode::Normal;
        let Some(id) = self.pending_delete.take() else {
            return;
        };

        if let Some(removed) = self.view.remove(id) {
            let saved_index = self.selected;
            self.apply_filter();
            if !self.rows.is_empty() {
                self.selected = saved_index.min(self.rows.len() - 1);
            }
            self.set_status(format!(
                "Removed '{}' from view (document unchanged)",
                removed.display_title()
            ));
        }
    }

    /// Cancel the pending delete
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.input_mode = InputMode::Normal;
    }

    /// Title of the record pending deletion (for the confirm popup)
    pub fn pending_delete_title(&self) -> Option<&str> {
        let id = self.pending_delete?;
        self.view.get(id).map(|r| r.display_title())
    }

    /// JSON payload for the clipboard; an empty collection copies `[]`
    fn collection_json(&self) -> String {
        export::to_json(&self.view.records).unwrap_or_else(|| "[]".to_string())
    }

    /// Copy the full collection as pretty JSON to the clipboard
    pub fn copy_collection(&mut self) {
        let json = self.collection_json();

        if copy_to_clipboard(&json) {
            self.set_status(format!("Copied {} to clipboard", self.view.count_label()));
        } else {
            self.set_status("Clipboard unavailable");
        }
    }

    /// Export the full collection to a file in the export directory
    pub fn export_collection(&mut self, format: ExportFormat, dir: &std::path::Path) {
        let Some(rendered) = export::render(&self.view.records, format) else {
            self.set_status("Nothing to export");
            return;
        };

        if let Err(e) = std::fs::create_dir_all(dir) {
            self.set_status(format!("Export failed: {}", e));
            return;
        }

        let path = dir.join(format.file_name());
        match std::fs::write(&path, rendered) {
            Ok(_) => self.set_status(format!("Exported to {}", path.display())),
            Err(e) => self.set_status(format!("Export failed: {}", e)),
        }
    }
}
