//! Single-pass, per-agent reducers.
//!
//! Each aggregator is an [`EventHandler`] plus a [`finish`](Aggregator::finish)
//! that turns the pass state into its output.  Create one per trace; do not
//! reuse a finished pass.

mod distance;
mod route;
mod travel_time;

use tracing::debug;

use impact_core::{AgentId, LinkId, VehicleId};
use impact_events::{EventHandler, EventSource};

use crate::{AnalysisError, AnalysisResult, Map, UnresolvedPolicy};

pub use distance::DistanceAggregator;
pub use route::RouteAggregator;
pub use travel_time::TravelTimeAggregator;

// ── Aggregator ────────────────────────────────────────────────────────────────

/// A one-pass consumer of a trace.
///
/// Callbacks cannot fail, so an aggregator that hits a fatal condition keeps
/// the first error and returns it from `finish`.
pub trait Aggregator: EventHandler {
    type Output: Send;

    /// Counters for the pass so far.
    fn stats(&self) -> PassStats;

    fn finish(self) -> AnalysisResult<Self::Output>;
}

/// Replay `source` through `aggregator` and finish it.
pub fn run_pass<A: Aggregator>(source: &dyn EventSource, mut aggregator: A) -> AnalysisResult<A::Output> {
    let delivered = source.replay(&mut aggregator)?;
    let stats = aggregator.stats();
    debug!(
        source        = %source.describe(),
        delivered,
        considered    = stats.events,
        matched       = stats.matched,
        unresolved    = stats.unresolved,
        unknown_links = stats.unknown_links,
        overwritten   = stats.overwritten_departures,
        stray         = stats.stray_arrivals,
        "pass complete"
    );
    aggregator.finish()
}

/// Counters kept by every pass.  Skipped events are only ever reported here,
/// as totals, never one by one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassStats {
    /// Events of the types this pass consumes.
    pub events:                 u64,
    /// Events that contributed to the output.
    pub matched:                u64,
    /// Link events whose vehicle could not be resolved to an agent.
    pub unresolved:             u64,
    /// Link events on links the network does not know.
    pub unknown_links:          u64,
    /// Open departures replaced by a later departure.
    pub overwritten_departures: u64,
    /// Arrivals with no open departure.
    pub stray_arrivals:         u64,
}

// ── Shared failure handling ──────────────────────────────────────────────────

/// First-error slot shared by the passes.
#[derive(Debug, Default)]
struct Failure {
    first: Option<AnalysisError>,
}

impl Failure {
    fn set(&mut self, e: AnalysisError) {
        // Keep only the first error.
        if self.first.is_none() {
            self.first = Some(e);
        }
    }

    fn unresolved(&mut self, policy: UnresolvedPolicy, stats: &mut PassStats, vehicle: &VehicleId) {
        stats.unresolved += 1;
        if policy == UnresolvedPolicy::Reject {
            self.set(AnalysisError::UnresolvedVehicle(vehicle.clone()));
        }
    }

    fn into_result<T>(self, output: T) -> AnalysisResult<T> {
        match self.first {
            Some(e) => Err(e),
            None => Ok(output),
        }
    }
}

// ── Outputs ───────────────────────────────────────────────────────────────────

/// Ordered links per agent, in traversal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteLog {
    routes: Map<AgentId, Vec<LinkId>>,
}

impl RouteLog {
    /// The agent's route; empty if the agent never appeared.
    pub fn route(&self, agent: &str) -> &[LinkId] {
        self.routes.get(agent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn agent_count(&self) -> usize {
        self.routes.len()
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentId> {
        self.routes.keys()
    }

    fn push(&mut self, agent: &str, link: &LinkId) {
        match self.routes.get_mut(agent) {
            Some(route) => route.push(link.clone()),
            None => {
                self.routes.insert(AgentId::from(agent), vec![link.clone()]);
            }
        }
    }
}

/// A non-negative running total per agent (metres, seconds).
///
/// An agent with no entry reads as `0.0`; callers never need to tell "absent"
/// from "zero".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentTotals {
    totals: Map<AgentId, f64>,
}

impl AgentTotals {
    pub fn get(&self, agent: &str) -> f64 {
        self.totals.get(agent).copied().unwrap_or(0.0)
    }

    pub fn agent_count(&self) -> usize {
        self.totals.len()
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentId> {
        self.totals.keys()
    }

    fn add(&mut self, agent: &str, amount: f64) {
        match self.totals.get_mut(agent) {
            Some(total) => *total += amount,
            None => {
                self.totals.insert(AgentId::from(agent), amount);
            }
        }
    }
}

impl FromIterator<(AgentId, f64)> for AgentTotals {
    fn from_iter<I: IntoIterator<Item = (AgentId, f64)>>(iter: I) -> Self {
        let mut out = AgentTotals::default();
        for (agent, amount) in iter {
            out.add(agent.as_str(), amount);
        }
        out
    }
}

impl FromIterator<(AgentId, Vec<LinkId>)> for RouteLog {
    fn from_iter<I: IntoIterator<Item = (AgentId, Vec<LinkId>)>>(iter: I) -> Self {
        Self { routes: iter.into_iter().collect() }
    }
}
