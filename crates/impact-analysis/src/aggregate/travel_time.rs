//! Travel time from departure/arrival pairs.
//!
//! Per agent the pass is a two-state machine:
//!
//! ```text
//!            departure(t0)
//!   idle ───────────────────▶ travelling(t0)
//!    ▲                             │
//!    └──────── arrival(t1) ────────┘   total += t1 − t0
//! ```
//!
//! A departure while travelling replaces `t0` under
//! [`DeparturePolicy::LastDepartureWins`]; the abandoned trip never counts.
//! An arrival while idle is ignored.

use impact_core::{AgentId, SimTime};
use impact_events::EventHandler;

use super::{AgentTotals, Aggregator, Failure, PassStats};
use crate::{AnalysisError, AnalysisResult, DeparturePolicy, Map, Population};

/// Sums `arrival − departure` over the trips of each population agent.
///
/// Person ids come straight from the events; no vehicle correlation is
/// involved.
pub struct TravelTimeAggregator<'p> {
    population: &'p Population,
    policy:     DeparturePolicy,
    pending:    Map<AgentId, SimTime>,
    totals:     AgentTotals,
    stats:      PassStats,
    failure:    Failure,
}

impl<'p> TravelTimeAggregator<'p> {
    pub fn new(population: &'p Population) -> Self {
        Self {
            population,
            policy:  DeparturePolicy::default(),
            pending: Map::default(),
            totals:  AgentTotals::default(),
            stats:   PassStats::default(),
            failure: Failure::default(),
        }
    }

    pub fn departure_policy(mut self, policy: DeparturePolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl EventHandler for TravelTimeAggregator<'_> {
    fn on_person_departure(&mut self, time: SimTime, person: &AgentId) {
        self.stats.events += 1;
        if !self.population.contains(person.as_str()) {
            return;
        }
        let Some(first) = self.pending.insert(person.clone(), time) else {
            return;
        };
        match self.policy {
            DeparturePolicy::LastDepartureWins => self.stats.overwritten_departures += 1,
            DeparturePolicy::Reject => self.failure.set(AnalysisError::OverlappingDeparture {
                agent:  person.clone(),
                first,
                second: time,
            }),
        }
    }

    fn on_person_arrival(&mut self, time: SimTime, person: &AgentId) {
        self.stats.events += 1;
        if !self.population.contains(person.as_str()) {
            return;
        }
        match self.pending.remove(person.as_str()) {
            Some(departed) => {
                self.totals.add(person.as_str(), time - departed);
                self.stats.matched += 1;
            }
            None => self.stats.stray_arrivals += 1,
        }
    }
}

impl Aggregator for TravelTimeAggregator<'_> {
    type Output = AgentTotals;

    fn stats(&self) -> PassStats {
        self.stats
    }

    fn finish(self) -> AnalysisResult<AgentTotals> {
        if !self.pending.is_empty() {
            tracing::debug!(open_trips = self.pending.len(), "trips still open at end of trace");
        }
        self.failure.into_result(self.totals)
    }
}
