//! Travelled distance.

use impact_core::{AgentId, LinkId, SimTime, VehicleId};
use impact_events::EventHandler;
use impact_network::Network;

use super::{AgentTotals, Aggregator, Failure, PassStats};
use crate::{AnalysisResult, IdentityResolver, IdentityStrategy, Population, UnresolvedPolicy};

/// Sums the length of every link a population agent leaves.
///
/// Defaults to binding-based resolution: link events of a vehicle count only
/// after the vehicle has entered traffic in the same pass.  Links missing
/// from the network add nothing.
pub struct DistanceAggregator<'a, N: Network + ?Sized> {
    population: &'a Population,
    network:    &'a N,
    resolver:   IdentityResolver,
    policy:     UnresolvedPolicy,
    totals:     AgentTotals,
    stats:      PassStats,
    failure:    Failure,
}

impl<'a, N: Network + ?Sized> DistanceAggregator<'a, N> {
    pub fn new(population: &'a Population, network: &'a N) -> Self {
        Self {
            population,
            network,
            resolver: IdentityResolver::new(IdentityStrategy::Binding),
            policy:   UnresolvedPolicy::default(),
            totals:   AgentTotals::default(),
            stats:    PassStats::default(),
            failure:  Failure::default(),
        }
    }

    pub fn strategy(mut self, strategy: IdentityStrategy) -> Self {
        self.resolver = IdentityResolver::new(strategy);
        self
    }

    pub fn unresolved_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl<N: Network + ?Sized> EventHandler for DistanceAggregator<'_, N> {
    fn on_vehicle_enters_traffic(&mut self, _time: SimTime, vehicle: &VehicleId, person: &AgentId) {
        self.resolver.observe_entry(vehicle, person);
    }

    fn on_link_leave(&mut self, _time: SimTime, vehicle: &VehicleId, link: &LinkId) {
        self.stats.events += 1;
        let Some(agent) = self.resolver.resolve(vehicle) else {
            self.failure.unresolved(self.policy, &mut self.stats, vehicle);
            return;
        };
        if !self.population.contains(agent) {
            return;
        }
        match self.network.link_length(link) {
            Some(length_m) => {
                self.totals.add(agent, length_m);
                self.stats.matched += 1;
            }
            None => self.stats.unknown_links += 1,
        }
    }
}

impl<N: Network + ?Sized> Aggregator for DistanceAggregator<'_, N> {
    type Output = AgentTotals;

    fn stats(&self) -> PassStats {
        self.stats
    }

    fn finish(self) -> AnalysisResult<AgentTotals> {
        self.failure.into_result(self.totals)
    }
}
