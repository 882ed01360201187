use crate::{Error, Result};
use std::path::Path;

/// Token in the HTML shell that is replaced by the JSON row array.
pub const TABLE_PLACEHOLDER: &str = "$table_json";

const BUILTIN_TEMPLATE: &str = include_str!("report.html");

/// Static HTML shell that report rows are substituted into.
#[derive(Debug, Clone)]
pub struct ReportTemplate {
    html: String,
}

impl ReportTemplate {
    pub fn builtin() -> Self {
        Self {
            html: BUILTIN_TEMPLATE.to_string(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading report template from: {}", path.display());
        Self::from_string(std::fs::read_to_string(path)?)
    }

    pub fn from_string(html: impl Into<String>) -> Result<Self> {
        let html = html.into();
        if !html.contains(TABLE_PLACEHOLDER) {
            return Err(Error::TemplatePlaceholderMissing(
                TABLE_PLACEHOLDER.to_string(),
            ));
        }
        Ok(Self { html })
    }

    /// Replace every placeholder occurrence with `table_json`
    pub fn render(&self, table_json: &str) -> String {
        self.html.replace(TABLE_PLACEHOLDER, table_json)
    }
}

impl Default for ReportTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}
