//! Affected-population selection.
//!
//! One pass over the baseline trace collects every vehicle that left one of
//! the policy's links.  The result is a set: leaving a sensitive link ten
//! times, or leaving three different ones, counts once.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use impact_core::{AgentId, LinkId, SimTime, VehicleId};
use impact_events::EventHandler;

use crate::aggregate::{Aggregator, PassStats};
use crate::{AnalysisResult, IdentityResolver, IdentityStrategy, Population, Set};

// ── AffectedLinks ─────────────────────────────────────────────────────────────

/// The links a policy touches.  Supplied by configuration, never derived.
#[derive(Debug, Clone, Default)]
pub struct AffectedLinks {
    links: Set<LinkId>,
}

impl AffectedLinks {
    #[inline]
    pub fn contains(&self, link: &LinkId) -> bool {
        self.links.contains(link)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn extend<I: IntoIterator<Item = LinkId>>(&mut self, links: I) {
        self.links.extend(links);
    }
}

impl FromIterator<LinkId> for AffectedLinks {
    fn from_iter<I: IntoIterator<Item = LinkId>>(iter: I) -> Self {
        Self { links: iter.into_iter().collect() }
    }
}

/// Load affected links from a text file, one link id per line.
///
/// Same format as the affected-agent list.  Link ids may contain `#`, so
/// there is no comment syntax.
pub fn load_links(path: &Path) -> AnalysisResult<AffectedLinks> {
    let links = load_links_reader(BufReader::new(File::open(path)?))?;
    info!(path = %path.display(), links = links.len(), "loaded affected links");
    Ok(links)
}

pub fn load_links_reader<R: BufRead>(reader: R) -> AnalysisResult<AffectedLinks> {
    let mut links = AffectedLinks::default();
    for line in reader.lines() {
        let line = line?;
        let id = line.trim();
        if !id.is_empty() {
            links.links.insert(LinkId::from(id));
        }
    }
    Ok(links)
}

// ── AffectedSelector ──────────────────────────────────────────────────────────

/// What the selector found.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Every vehicle seen leaving an affected link.
    pub vehicles:   BTreeSet<VehicleId>,
    /// Those vehicles resolved to agents with the selector's strategy.
    pub population: Population,
    /// Affected vehicles none of whose traversals could be resolved.
    pub unresolved: BTreeSet<VehicleId>,
}

/// Collects vehicles leaving any of a fixed set of links.
///
/// Each traversal is resolved to an agent immediately, with the binding in
/// force at that moment, so a vehicle shared by several drivers contributes
/// every driver that actually used an affected link.
pub struct AffectedSelector<'l> {
    links:    &'l AffectedLinks,
    resolver: IdentityResolver,
    vehicles: BTreeSet<VehicleId>,
    resolved: Set<VehicleId>,
    agents:   Population,
    stats:    PassStats,
}

impl<'l> AffectedSelector<'l> {
    pub fn new(links: &'l AffectedLinks, strategy: IdentityStrategy) -> Self {
        Self {
            links,
            resolver: IdentityResolver::new(strategy),
            vehicles: BTreeSet::new(),
            resolved: Set::default(),
            agents:   Population::new(),
            stats:    PassStats::default(),
        }
    }
}

impl EventHandler for AffectedSelector<'_> {
    fn on_vehicle_enters_traffic(&mut self, _time: SimTime, vehicle: &VehicleId, person: &AgentId) {
        self.resolver.observe_entry(vehicle, person);
    }

    fn on_link_leave(&mut self, _time: SimTime, vehicle: &VehicleId, link: &LinkId) {
        self.stats.events += 1;
        if !self.links.contains(link) {
            return;
        }
        self.stats.matched += 1;

        if !self.vehicles.contains(vehicle) {
            self.vehicles.insert(vehicle.clone());
        }
        match self.resolver.resolve(vehicle) {
            Some(agent) => {
                if !self.agents.contains(agent) {
                    self.agents.insert(AgentId::from(agent));
                }
                if !self.resolved.contains(vehicle) {
                    self.resolved.insert(vehicle.clone());
                }
            }
            None => self.stats.unresolved += 1,
        }
    }
}

impl Aggregator for AffectedSelector<'_> {
    type Output = Selection;

    fn stats(&self) -> PassStats {
        self.stats
    }

    fn finish(self) -> AnalysisResult<Selection> {
        let unresolved: BTreeSet<VehicleId> = self
            .vehicles
            .iter()
            .filter(|v| !self.resolved.contains(*v))
            .cloned()
            .collect();
        debug!(
            vehicles   = self.vehicles.len(),
            agents     = self.agents.len(),
            unresolved = unresolved.len(),
            "affected selection complete"
        );
        Ok(Selection {
            vehicles:   self.vehicles,
            population: self.agents,
            unresolved,
        })
    }
}
