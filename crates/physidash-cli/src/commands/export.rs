//! Export command handler

use std::path::PathBuf;

use anyhow::{Context, Result};

use physidash_core::{export, DatasetRecord, ExportFormat};

use crate::output::Output;

/// Render the collection and write the artifact file
pub fn run(
    records: &[DatasetRecord],
    format: String,
    output_dir: PathBuf,
    output: &Output,
) -> Result<()> {
    let format: ExportFormat = format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let Some(rendered) = export::render(records, format) else {
        output.message("No datasets to export.");
        return Ok(());
    };

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
    let path = output_dir.join(format.file_name());
    std::fs::write(&path, rendered)
        .with_context(|| format!("Failed to write export file: {:?}", path))?;

    output.success(&format!(
        "Exported {} dataset(s) to {}",
        records.len(),
        path.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[test]
    fn test_export_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![DatasetRecord::new(1, "MIT-BIH")];
        let output = Output::new(OutputFormat::Quiet);

        run(
            &records,
            "csv".to_string(),
            dir.path().to_path_buf(),
            &output,
        )
        .unwrap();

        let path = dir.path().join("physionet_curated.csv");
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("Title,Year"));
    }

    #[test]
    fn test_export_empty_collection_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = Output::new(OutputFormat::Quiet);

        run(&[], "json".to_string(), dir.path().to_path_buf(), &output).unwrap();
        assert!(!dir.path().join("physionet_curated.json").exists());
    }

    #[test]
    fn test_export_unknown_format_fails() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![DatasetRecord::new(1, "MIT-BIH")];
        let output = Output::new(OutputFormat::Quiet);

        assert!(run(
            &records,
            "xml".to_string(),
            dir.path().to_path_buf(),
            &output
        )
        .is_err());
    }
}
