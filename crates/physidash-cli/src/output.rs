//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use physidash_core::{CompletenessClass, DatasetRecord};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single record in full
    pub fn print_record(&self, record: &DatasetRecord) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:           {}", record.id);
                println!("Title:        {}", record.display_title());
                print_if_set("Year:         ", &record.year);
                print_if_set("Description:  ", &record.description);
                print_if_set("Modality:     ", &record.physiological_modality);
                print_if_set("Condition:    ", &record.clinical_condition);
                print_if_set("Setting:      ", &record.environment);
                print_if_set("Task:         ", &record.target_research_task);
                print_if_set("Completeness: ", &record.metadata_completeness);
                print_if_set("Size:         ", &record.dataset_size);
                print_if_set("Population:   ", &record.population_type);
                print_if_set("Licensing:    ", &record.licensing);
                if !record.keywords_used.is_empty() {
                    println!("Keywords:     {}", record.keywords_used.join(", "));
                }
                print_if_set("Project:      ", &record.parent_project);
                print_if_set("Limitations:  ", &record.limitations);
                if let Some(ref url) = record.dataset_url {
                    println!("URL:          {}", url);
                }
                if let Some(ref curated) = record.curated_date {
                    println!("Curated:      {}", curated);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(record).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", record.id);
            }
        }
    }

    /// Print a list of records
    pub fn print_records(&self, records: &[DatasetRecord]) {
        match self.format {
            OutputFormat::Human => {
                if records.is_empty() {
                    println!("No datasets found.");
                    return;
                }
                for record in records {
                    let completeness = match CompletenessClass::classify(
                        &record.metadata_completeness,
                    ) {
                        CompletenessClass::High => "High",
                        CompletenessClass::Moderate => "Moderate",
                        CompletenessClass::Low => "Low",
                    };
                    println!(
                        "{} | {} | {} | {}",
                        record.id,
                        truncate(record.display_title(), 45),
                        completeness,
                        if record.year.is_empty() { "-" } else { &record.year }
                    );
                }
                println!("\n{} dataset(s)", records.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(records).unwrap());
            }
            OutputFormat::Quiet => {
                for record in records {
                    println!("{}", record.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_if_set(label: &str, value: &str) {
    if !value.is_empty() {
        println!("{}{}", label, value);
    }
}

/// Truncate a string to max length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }
}
