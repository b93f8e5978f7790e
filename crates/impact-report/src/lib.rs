//! `impact-report` — report writers for comparison results.
//!
//! | Backend        | Output                                                     |
//! |----------------|------------------------------------------------------------|
//! | [`TextReport`] | line-oriented text on any `Write` (stdout by default)      |
//! | [`CsvReport`]  | `affected_agents.csv`, `route_changes.csv`, `<metric>_deltas.csv` |
//!
//! Both implement [`ReportWriter`], so the CLI renders one comparison value
//! through whichever backend the user picked.
//!
//! # Usage
//!
//! ```rust,ignore
//! use impact_report::{ReportWriter, TextReport};
//!
//! let mut out = TextReport::stdout();
//! out.write_routes(&comparison)?;
//! out.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod text;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvReport;
pub use error::{ReportError, ReportResult};
pub use text::TextReport;
pub use writer::{ReportWriter, format_route};
