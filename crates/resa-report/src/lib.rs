//! Markdown research reports: rendering, parsing back, and the structured
//! sidecar written next to each report.

pub mod error;
pub mod headings;
pub mod parse;
pub mod render;
pub mod sidecar;
pub mod store;

pub use error::ReportError;
pub use parse::parse_report;
pub use render::{render_report, report_filename, ReportInput};
pub use sidecar::{sidecar_path, ReportSidecar, SIDECAR_VERSION};
pub use store::{load_previous_report, write_report};
