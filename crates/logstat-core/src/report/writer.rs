use super::ReportTemplate;
use crate::Result;
use crate::analysis::ReportRow;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Renders ranked rows into the HTML template and stores one file per run.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    template: ReportTemplate,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>, template: ReportTemplate) -> Self {
        Self {
            output_dir: output_dir.into(),
            template,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn report_path(&self, run_id: usize) -> PathBuf {
        self.output_dir.join(format!("report{}.html", run_id))
    }

    /// Write `report<run_id>.html` into the output directory and return its path.
    ///
    /// The directory is created if missing. The file is staged next to its
    /// destination and renamed into place, so readers never see a partial report.
    pub fn write(&self, rows: &[ReportRow], run_id: usize) -> Result<PathBuf> {
        let destination = self.report_path(run_id);
        tracing::debug!(
            "Writing report with {} rows to: {}",
            rows.len(),
            destination.display()
        );

        let table_json = serde_json::to_string(rows)?;
        let html = self.template.render(&table_json);

        std::fs::create_dir_all(&self.output_dir)?;

        let mut staged = NamedTempFile::new_in(&self.output_dir)?;
        staged.write_all(html.as_bytes())?;
        staged.flush()?;
        staged.persist(&destination).map_err(|e| e.error)?;

        tracing::info!("Report {} written to {}", run_id, destination.display());

        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ReportRow> {
        vec![ReportRow {
            url: "/api/v2/banner/1".to_string(),
            count: 2,
            count_percent: "66.66667".to_string(),
            time_avg: "0.300".to_string(),
            time_max: "0.390".to_string(),
            time_med: "0.300".to_string(),
            time_sum: 0.6,
            time_percent: "85.7143".to_string(),
        }]
    }

    #[test]
    fn test_write_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("reports");
        let writer = ReportWriter::new(&output, ReportTemplate::builtin());

        let path = writer.write(&rows(), 3).unwrap();
        assert_eq!(path, output.join("report3.html"));

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains(r#""url":"/api/v2/banner/1""#));
        assert!(!html.contains("$table_json"));
    }

    #[test]
    fn test_written_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let template = ReportTemplate::from_string("$table_json").unwrap();
        let writer = ReportWriter::new(dir.path(), template);

        let path = writer.write(&rows(), 1).unwrap();
        let parsed: Vec<ReportRow> =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed, rows());
    }

    #[test]
    fn test_write_leaves_no_staging_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path(), ReportTemplate::builtin());
        writer.write(&rows(), 1).unwrap();
        writer.write(&rows(), 2).unwrap();

        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["report1.html", "report2.html"]);
    }
}
