//! The `ReportWriter` trait implemented by all report backends.

use impact_analysis::{RouteComparison, ScalarComparison, Selection};
use impact_core::LinkId;

use crate::ReportResult;

/// Trait implemented by the text and CSV reports.
pub trait ReportWriter {
    /// The affected population found in the baseline trace.
    fn write_selection(&mut self, selection: &Selection) -> ReportResult<()>;

    /// Route comparison: changed agents plus summary counts.
    fn write_routes(&mut self, comparison: &RouteComparison) -> ReportResult<()>;

    /// Scalar comparison: every agent plus summary counts.
    fn write_scalars(&mut self, comparison: &ScalarComparison) -> ReportResult<()>;

    /// Flush all underlying outputs.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> ReportResult<()>;
}

/// `[L1, L2, L3]`; `[]` for an empty route.
pub fn format_route(route: &[LinkId]) -> String {
    let inner: Vec<&str> = route.iter().map(LinkId::as_str).collect();
    format!("[{}]", inner.join(", "))
}
