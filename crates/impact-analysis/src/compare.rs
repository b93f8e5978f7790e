//! Before/after comparison.
//!
//! [`RunPair`] runs one kind of aggregator over both traces; the `compare_*`
//! functions line the two outputs up agent by agent over the population.

use std::fmt;

use tracing::info;

use impact_core::{AgentId, LinkId};
use impact_events::EventSource;

use crate::{AgentTotals, Aggregator, AnalysisResult, Population, RouteLog, run_pass};

// ── RunPair ───────────────────────────────────────────────────────────────────

/// The baseline and policy traces of one study.
#[derive(Clone, Copy)]
pub struct RunPair<'s> {
    pub before: &'s dyn EventSource,
    pub after:  &'s dyn EventSource,
}

impl<'s> RunPair<'s> {
    pub fn new(before: &'s dyn EventSource, after: &'s dyn EventSource) -> Self {
        Self { before, after }
    }

    /// Run a fresh aggregator from `make` over each trace.
    ///
    /// The two passes share nothing but what `make` captures by shared
    /// reference.  With the `parallel` feature they run concurrently.
    pub fn run<A, F>(&self, make: F) -> AnalysisResult<(A::Output, A::Output)>
    where
        A: Aggregator,
        F: Fn() -> A + Sync,
    {
        info!(before = %self.before.describe(), after = %self.after.describe(), "replaying traces");

        #[cfg(not(feature = "parallel"))]
        {
            let before = run_pass(self.before, make())?;
            let after = run_pass(self.after, make())?;
            Ok((before, after))
        }

        #[cfg(feature = "parallel")]
        {
            let (before, after) = rayon::join(
                || run_pass(self.before, make()),
                || run_pass(self.after, make()),
            );
            Ok((before?, after?))
        }
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// Sign of an after − before difference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Increase,
    Decrease,
    NoChange,
}

impl Direction {
    pub fn of(diff: f64) -> Self {
        if diff > 0.0 {
            Direction::Increase
        } else if diff < 0.0 {
            Direction::Decrease
        } else {
            Direction::NoChange
        }
    }

    pub fn marker(self) -> char {
        match self {
            Direction::Increase => '↑',
            Direction::Decrease => '↓',
            Direction::NoChange => '=',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}

// ── Metric ────────────────────────────────────────────────────────────────────

/// The scalar quantities the tool compares.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    Distance,
    TravelTime,
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Metric::Distance   => "distance",
            Metric::TravelTime => "travel_time",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::Distance   => "distance traveled",
            Metric::TravelTime => "travel time",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Distance   => "meters",
            Metric::TravelTime => "seconds",
        }
    }
}

// ── Route comparison ──────────────────────────────────────────────────────────

/// One agent's route in both runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDelta {
    pub agent:  AgentId,
    pub before: Vec<LinkId>,
    pub after:  Vec<LinkId>,
}

impl RouteDelta {
    /// Any difference in length, order or content.
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// Per-agent route comparison over a population, in population order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteComparison {
    pub rows: Vec<RouteDelta>,
}

impl RouteComparison {
    pub fn population_size(&self) -> usize {
        self.rows.len()
    }

    pub fn changed(&self) -> impl Iterator<Item = &RouteDelta> {
        self.rows.iter().filter(|r| r.changed())
    }

    pub fn changed_count(&self) -> usize {
        self.changed().count()
    }
}

/// Compare routes agent by agent.  Agents missing from a log have an empty
/// route in that run.
pub fn compare_routes(population: &Population, before: &RouteLog, after: &RouteLog) -> RouteComparison {
    let rows = population
        .iter()
        .map(|agent| RouteDelta {
            agent:  agent.clone(),
            before: before.route(agent.as_str()).to_vec(),
            after:  after.route(agent.as_str()).to_vec(),
        })
        .collect();
    RouteComparison { rows }
}

// ── Scalar comparison ─────────────────────────────────────────────────────────

/// One agent's total in both runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarDelta {
    pub agent:  AgentId,
    pub before: f64,
    pub after:  f64,
}

impl ScalarDelta {
    pub fn diff(&self) -> f64 {
        self.after - self.before
    }

    pub fn direction(&self) -> Direction {
        Direction::of(self.diff())
    }
}

/// Per-agent comparison of a scalar metric, in population order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarComparison {
    pub metric: Metric,
    pub rows:   Vec<ScalarDelta>,
}

impl ScalarComparison {
    pub fn population_size(&self) -> usize {
        self.rows.len()
    }

    pub fn count(&self, direction: Direction) -> usize {
        self.rows.iter().filter(|r| r.direction() == direction).count()
    }

    pub fn total_before(&self) -> f64 {
        self.rows.iter().map(|r| r.before).sum()
    }

    pub fn total_after(&self) -> f64 {
        self.rows.iter().map(|r| r.after).sum()
    }
}

/// Compare totals agent by agent.  Agents missing from a mapping read as 0.
pub fn compare_totals(
    metric:     Metric,
    population: &Population,
    before:     &AgentTotals,
    after:      &AgentTotals,
) -> ScalarComparison {
    let rows = population
        .iter()
        .map(|agent| ScalarDelta {
            agent:  agent.clone(),
            before: before.get(agent.as_str()),
            after:  after.get(agent.as_str()),
        })
        .collect();
    ScalarComparison { metric, rows }
}
