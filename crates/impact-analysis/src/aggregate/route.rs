//! Route reconstruction.

use impact_core::{AgentId, LinkId, SimTime, VehicleId};
use impact_events::EventHandler;

use super::{Aggregator, Failure, PassStats, RouteLog};
use crate::{
    AnalysisResult, IdentityResolver, IdentityStrategy, Population, RouteEventKind,
    UnresolvedPolicy,
};

/// Rebuilds the ordered list of links each population agent drove.
///
/// Defaults to the naming-convention strategy (`veh_<agent>`) and to
/// link-leave events; both are configurable.  Appends happen in event order,
/// so replaying the same trace always yields the same routes.
pub struct RouteAggregator<'p> {
    population: &'p Population,
    resolver:   IdentityResolver,
    kind:       RouteEventKind,
    policy:     UnresolvedPolicy,
    routes:     RouteLog,
    stats:      PassStats,
    failure:    Failure,
}

impl<'p> RouteAggregator<'p> {
    pub fn new(population: &'p Population) -> Self {
        Self {
            population,
            resolver: IdentityResolver::new(IdentityStrategy::default_prefix()),
            kind:     RouteEventKind::default(),
            policy:   UnresolvedPolicy::default(),
            routes:   RouteLog::default(),
            stats:    PassStats::default(),
            failure:  Failure::default(),
        }
    }

    pub fn strategy(mut self, strategy: IdentityStrategy) -> Self {
        self.resolver = IdentityResolver::new(strategy);
        self
    }

    pub fn event_kind(mut self, kind: RouteEventKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn unresolved_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn record(&mut self, vehicle: &VehicleId, link: &LinkId) {
        self.stats.events += 1;
        let Some(agent) = self.resolver.resolve(vehicle) else {
            self.failure.unresolved(self.policy, &mut self.stats, vehicle);
            return;
        };
        if self.population.contains(agent) {
            self.routes.push(agent, link);
            self.stats.matched += 1;
        }
    }
}

impl EventHandler for RouteAggregator<'_> {
    fn on_vehicle_enters_traffic(&mut self, _time: SimTime, vehicle: &VehicleId, person: &AgentId) {
        self.resolver.observe_entry(vehicle, person);
    }

    fn on_link_enter(&mut self, _time: SimTime, vehicle: &VehicleId, link: &LinkId) {
        if self.kind == RouteEventKind::LinkEnter {
            self.record(vehicle, link);
        }
    }

    fn on_link_leave(&mut self, _time: SimTime, vehicle: &VehicleId, link: &LinkId) {
        if self.kind == RouteEventKind::LinkLeave {
            self.record(vehicle, link);
        }
    }
}

impl Aggregator for RouteAggregator<'_> {
    type Output = RouteLog;

    fn stats(&self) -> PassStats {
        self.stats
    }

    fn finish(self) -> AnalysisResult<RouteLog> {
        self.failure.into_result(self.routes)
    }
}
