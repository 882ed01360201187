mod template;
mod writer;

pub use template::{ReportTemplate, TABLE_PLACEHOLDER};
pub use writer::ReportWriter;
