//! Stats command handler
//!
//! Mirrors the curation agent's own database-stats report: total count plus
//! the most recent records (the agent prepends new records, so document
//! order is recency order).

use anyhow::Result;

use physidash_core::DatasetRecord;

use crate::output::{Output, OutputFormat};

/// How many recent records the report shows
const RECENT_COUNT: usize = 5;

/// Show collection statistics
pub fn show(records: &[DatasetRecord], output: &Output) -> Result<()> {
    let recent: Vec<&DatasetRecord> = records.iter().take(RECENT_COUNT).collect();

    match output.format {
        OutputFormat::Json => {
            let recent_json: Vec<_> = recent
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "id": r.id,
                        "title": r.title,
                        "year": r.year,
                        "curated_date": r.curated_date,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "total_datasets": records.len(),
                    "recent_datasets": recent_json,
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", records.len());
        }
        OutputFormat::Human => {
            println!("Total datasets: {}", records.len());
            if !recent.is_empty() {
                println!();
                println!("Most recent:");
                for record in recent {
                    let curated = record.curated_date.as_deref().unwrap_or("-");
                    println!(
                        "  {} | {} | {}",
                        record.id,
                        crate::output::truncate(record.display_title(), 45),
                        curated
                    );
                }
            }
        }
    }

    Ok(())
}
