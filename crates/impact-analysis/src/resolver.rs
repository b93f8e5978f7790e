//! Vehicle → agent identity resolution.

use impact_core::{AgentId, VehicleId};

use crate::{IdentityStrategy, Map};

/// Resolves the agent behind a vehicle id, using one [`IdentityStrategy`].
///
/// A resolver belongs to exactly one pass over one trace.  Under
/// [`IdentityStrategy::Binding`] it records every traffic entry it is shown;
/// a binding is never removed during the pass, and a re-entry with another
/// driver replaces it.  Under [`IdentityStrategy::Prefix`] nothing is
/// recorded.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    strategy: IdentityStrategy,
    bindings: Map<VehicleId, AgentId>,
}

impl IdentityResolver {
    pub fn new(strategy: IdentityStrategy) -> Self {
        Self { strategy, bindings: Map::default() }
    }

    /// Record that `person` is driving `vehicle` from now on.
    pub fn observe_entry(&mut self, vehicle: &VehicleId, person: &AgentId) {
        if self.strategy != IdentityStrategy::Binding {
            return;
        }
        match self.bindings.get_mut(vehicle.as_str()) {
            Some(bound) if bound == person => {}
            Some(bound) => *bound = person.clone(),
            None => {
                self.bindings.insert(vehicle.clone(), person.clone());
            }
        }
    }

    /// The agent id for `vehicle`, or `None` if the vehicle has not entered
    /// traffic yet in this pass (binding strategy only).
    #[inline]
    pub fn resolve<'a>(&'a self, vehicle: &'a VehicleId) -> Option<&'a str> {
        match &self.strategy {
            IdentityStrategy::Binding => self.bindings.get(vehicle.as_str()).map(AgentId::as_str),
            IdentityStrategy::Prefix(prefix) => {
                let raw = vehicle.as_str();
                Some(raw.strip_prefix(prefix.as_str()).unwrap_or(raw))
            }
        }
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}
