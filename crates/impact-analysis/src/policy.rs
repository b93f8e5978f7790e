//! Per-pass policies, chosen by configuration.
//!
//! The defaults reproduce the behaviour analysts have been relying on:
//! drop unattributable link events, and let a second departure replace an
//! open one.  The `Reject` variants turn those situations into errors for
//! traces that are expected to be clean.

use serde::{Deserialize, Serialize};

/// How a vehicle id on a link event is turned into an agent id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityStrategy {
    /// Look the vehicle up in the bindings recorded from earlier
    /// "vehicle enters traffic" events of the same pass.
    Binding,
    /// Strip this literal prefix from the vehicle id.  A vehicle id without
    /// the prefix is taken as the agent id unchanged.
    Prefix(String),
}

impl IdentityStrategy {
    /// The prefix the simulation gives private cars: `veh_<person>`.
    pub const DEFAULT_VEHICLE_PREFIX: &'static str = "veh_";

    pub fn default_prefix() -> Self {
        IdentityStrategy::Prefix(Self::DEFAULT_VEHICLE_PREFIX.to_owned())
    }
}

/// What to do with a link event whose vehicle cannot be resolved.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedPolicy {
    /// Skip the event.  It is counted in the pass statistics.
    #[default]
    Drop,
    /// Fail the pass.
    Reject,
}

/// What to do when an agent departs while a trip is still open.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeparturePolicy {
    /// The later departure replaces the open one; the earlier trip never
    /// contributes to the total.
    #[default]
    LastDepartureWins,
    /// Fail the pass.
    Reject,
}

/// Which link event extends a reconstructed route.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteEventKind {
    /// Routes are the links a vehicle left, in order.
    #[default]
    LinkLeave,
    /// Routes are the links a vehicle entered, in order.
    LinkEnter,
}
