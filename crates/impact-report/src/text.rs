//! Human-readable text backend.

use std::io::{self, Stdout, Write};

use impact_analysis::{Direction, RouteComparison, ScalarComparison, Selection};

use crate::writer::{ReportWriter, format_route};
use crate::ReportResult;

/// Writes line-oriented reports to any `Write`.
///
/// Scalar lines look like
///
/// ```text
/// 1001: before=1530.2, after=1812.9, diff=282.7 ↑
/// ```
pub struct TextReport<W: Write> {
    out: W,
}

impl TextReport<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Unwrap the inner writer (e.g. to inspect a `Vec<u8>` in tests).
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportWriter for TextReport<W> {
    fn write_selection(&mut self, selection: &Selection) -> ReportResult<()> {
        writeln!(
            self.out,
            "The total number of agents directly affected: {}",
            selection.population.len()
        )?;
        for agent in &selection.population {
            writeln!(self.out, "{agent}")?;
        }
        if !selection.unresolved.is_empty() {
            writeln!(
                self.out,
                "Vehicles on affected links with no known driver: {}",
                selection.unresolved.len()
            )?;
        }
        Ok(())
    }

    fn write_routes(&mut self, comparison: &RouteComparison) -> ReportResult<()> {
        for row in comparison.changed() {
            writeln!(
                self.out,
                "Agent {} path changed: before={} after={}",
                row.agent,
                format_route(&row.before),
                format_route(&row.after),
            )?;
        }
        writeln!(self.out, "Number of affected agents: {}", comparison.population_size())?;
        writeln!(
            self.out,
            "Number of agents whose paths have changed: {}",
            comparison.changed_count()
        )?;
        Ok(())
    }

    fn write_scalars(&mut self, comparison: &ScalarComparison) -> ReportResult<()> {
        let metric = comparison.metric;
        writeln!(self.out, "=== Change in {} (in {}) ===", metric.title(), metric.unit())?;
        for row in &comparison.rows {
            writeln!(
                self.out,
                "{}: before={:.1}, after={:.1}, diff={:.1} {}",
                row.agent,
                row.before,
                row.after,
                row.diff(),
                row.direction(),
            )?;
        }
        writeln!(
            self.out,
            "Agents: {}, increased: {}, decreased: {}, unchanged: {}",
            comparison.population_size(),
            comparison.count(Direction::Increase),
            comparison.count(Direction::Decrease),
            comparison.count(Direction::NoChange),
        )?;
        writeln!(
            self.out,
            "Total: before={:.1}, after={:.1}",
            comparison.total_before(),
            comparison.total_after(),
        )?;
        Ok(())
    }

    fn finish(&mut self) -> ReportResult<()> {
        self.out.flush()?;
        Ok(())
    }
}
