//! The analysis population and the affected-agent list file.
//!
//! # File format
//!
//! Plain text, one agent id per line, no header.  Surrounding whitespace is
//! trimmed and blank lines are ignored:
//!
//! ```text
//! 1001
//! 1002
//!
//! freight_17
//! ```

use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use impact_core::AgentId;

use crate::AnalysisResult;

/// The fixed set of agents whose before and after metrics are compared.
///
/// Held in a sorted set so every report lists agents in the same order no
/// matter how the set was built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Population {
    agents: BTreeSet<AgentId>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, agent: AgentId) -> bool {
        self.agents.insert(agent)
    }

    #[inline]
    pub fn contains(&self, agent: &str) -> bool {
        self.agents.contains(agent)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agents in ascending id order.
    pub fn iter(&self) -> btree_set::Iter<'_, AgentId> {
        self.agents.iter()
    }
}

impl FromIterator<AgentId> for Population {
    fn from_iter<I: IntoIterator<Item = AgentId>>(iter: I) -> Self {
        Self { agents: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a AgentId;
    type IntoIter = btree_set::Iter<'a, AgentId>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}

// ── File I/O ──────────────────────────────────────────────────────────────────

/// Load a population from an affected-agent list file.
pub fn load_population(path: &Path) -> AnalysisResult<Population> {
    let file = File::open(path)?;
    let population = load_population_reader(BufReader::new(file))?;
    info!(path = %path.display(), agents = population.len(), "loaded affected agents");
    Ok(population)
}

/// Like [`load_population`] but accepts any `BufRead` source.
pub fn load_population_reader<R: BufRead>(reader: R) -> AnalysisResult<Population> {
    let mut population = Population::new();
    for line in reader.lines() {
        let line = line?;
        let id = line.trim();
        if !id.is_empty() {
            population.insert(AgentId::from(id));
        }
    }
    Ok(population)
}

/// Write `population` in the list-file format, one id per line.
pub fn write_population(path: &Path, population: &Population) -> AnalysisResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for agent in population {
        writeln!(out, "{agent}")?;
    }
    out.flush()?;
    Ok(())
}
