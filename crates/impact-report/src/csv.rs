//! CSV output backend.
//!
//! Each comparison kind goes to its own file in the output directory:
//! - `affected_agents.csv`
//! - `route_changes.csv`
//! - `distance_deltas.csv` / `travel_time_deltas.csv`

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;

use impact_analysis::{RouteComparison, ScalarComparison, Selection};

use crate::writer::{ReportWriter, format_route};
use crate::ReportResult;

/// Writes comparisons as CSV files in one directory.
pub struct CsvReport {
    dir:     PathBuf,
    open:    Vec<Writer<File>>,
    written: Vec<PathBuf>,
}

impl CsvReport {
    /// Create the output directory if needed.
    pub fn new(dir: &Path) -> ReportResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf(), open: Vec::new(), written: Vec::new() })
    }

    /// Paths of every file written so far.
    pub fn files(&self) -> &[PathBuf] {
        &self.written
    }

    fn create(&mut self, name: &str, header: &[&str]) -> ReportResult<Writer<File>> {
        let path = self.dir.join(name);
        let mut w = Writer::from_path(&path)?;
        w.write_record(header)?;
        self.written.push(path);
        Ok(w)
    }
}

impl ReportWriter for CsvReport {
    fn write_selection(&mut self, selection: &Selection) -> ReportResult<()> {
        let mut w = self.create("affected_agents.csv", &["agent_id"])?;
        for agent in &selection.population {
            w.write_record([agent.as_str()])?;
        }
        self.open.push(w);
        Ok(())
    }

    fn write_routes(&mut self, comparison: &RouteComparison) -> ReportResult<()> {
        let mut w = self.create(
            "route_changes.csv",
            &["agent_id", "changed", "before_links", "after_links", "before", "after"],
        )?;
        for row in &comparison.rows {
            w.write_record(&[
                row.agent.to_string(),
                (row.changed() as u8).to_string(),
                row.before.len().to_string(),
                row.after.len().to_string(),
                format_route(&row.before),
                format_route(&row.after),
            ])?;
        }
        self.open.push(w);
        Ok(())
    }

    fn write_scalars(&mut self, comparison: &ScalarComparison) -> ReportResult<()> {
        let name = format!("{}_deltas.csv", comparison.metric.name());
        let mut w = self.create(&name, &["agent_id", "before", "after", "diff", "direction"])?;
        for row in &comparison.rows {
            w.write_record(&[
                row.agent.to_string(),
                row.before.to_string(),
                row.after.to_string(),
                row.diff().to_string(),
                row.direction().to_string(),
            ])?;
        }
        self.open.push(w);
        Ok(())
    }

    fn finish(&mut self) -> ReportResult<()> {
        for mut w in self.open.drain(..) {
            w.flush()?;
        }
        Ok(())
    }
}
