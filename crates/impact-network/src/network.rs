//! Link-length lookup and builder.

#[cfg(not(feature = "fx-hash"))]
use std::collections::HashMap;

#[cfg(feature = "fx-hash")]
use rustc_hash::FxHashMap as HashMap;

use impact_core::LinkId;

// ── Network trait ─────────────────────────────────────────────────────────────

/// The one query the distance analysis needs from a road network.
///
/// `None` means the link is outside the loaded network's coverage; it is a
/// valid answer, not an error.  `Sync` so a single network can serve both
/// the before and after passes at once.
pub trait Network: Sync {
    fn link_length(&self, link: &LinkId) -> Option<f64>;
}

// ── LinkNetwork ───────────────────────────────────────────────────────────────

/// A network reduced to a `LinkId → length (metres)` table.
///
/// Construct via [`LinkNetworkBuilder`] or one of the loaders.
#[derive(Debug, Clone, Default)]
pub struct LinkNetwork {
    lengths: HashMap<LinkId, f64>,
}

impl LinkNetwork {
    pub fn link_count(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn contains(&self, link: &str) -> bool {
        self.lengths.contains_key(link)
    }

    /// Total length of all links in metres.
    pub fn total_length_m(&self) -> f64 {
        self.lengths.values().sum()
    }
}

impl Network for LinkNetwork {
    #[inline]
    fn link_length(&self, link: &LinkId) -> Option<f64> {
        self.lengths.get(link).copied()
    }
}

// ── LinkNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`LinkNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use impact_core::LinkId;
/// use impact_network::{LinkNetworkBuilder, Network};
///
/// let mut b = LinkNetworkBuilder::new();
/// b.add_link("L1", 100.0);
/// b.add_link("L2", 250.5);
/// let net = b.build();
/// assert_eq!(net.link_length(&LinkId::from("L2")), Some(250.5));
/// assert_eq!(net.link_length(&LinkId::from("L3")), None);
/// ```
#[derive(Debug, Default)]
pub struct LinkNetworkBuilder {
    lengths: HashMap<LinkId, f64>,
}

impl LinkNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of links.
    pub fn with_capacity(links: usize) -> Self {
        let mut lengths = HashMap::default();
        lengths.reserve(links);
        Self { lengths }
    }

    /// Add a link, replacing any earlier definition.  Returns the replaced
    /// length, if there was one.
    pub fn add_link(&mut self, id: impl Into<LinkId>, length_m: f64) -> Option<f64> {
        self.lengths.insert(id.into(), length_m)
    }

    pub fn contains(&self, link: &str) -> bool {
        self.lengths.contains_key(link)
    }

    pub fn link_count(&self) -> usize {
        self.lengths.len()
    }

    pub fn build(self) -> LinkNetwork {
        LinkNetwork { lengths: self.lengths }
    }
}
