//! `impact-analysis` — the event-stream reconstruction engine.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`policy`]      | `IdentityStrategy`, `UnresolvedPolicy`, `DeparturePolicy`, `RouteEventKind` |
//! | [`resolver`]    | `IdentityResolver`: vehicle → agent, per pass             |
//! | [`population`]  | `Population`, affected-agent list file I/O                |
//! | [`selector`]    | `AffectedLinks`, `AffectedSelector`, `Selection`          |
//! | [`aggregate`]   | `Aggregator` trait, route / distance / travel-time passes |
//! | [`compare`]     | `RunPair`, route and scalar comparisons, `Direction`      |
//! | [`error`]       | `AnalysisError`, `AnalysisResult<T>`                      |
//!
//! # Pass model
//!
//! ```text
//! before trace ──▶ AffectedSelector ──▶ Population  (once)
//!
//! before trace ──▶ Aggregator(population) ──▶ metric ─┐
//!                                                      ├─▶ compare ──▶ report
//! after trace  ──▶ Aggregator(population) ──▶ metric ─┘
//! ```
//!
//! Every aggregator value is one pass: it owns its vehicle bindings and
//! pending departures, is fed one trace start to end, and is consumed by
//! [`Aggregator::finish`].  Nothing is shared between the before and after
//! passes except the read-only population and network, which is what lets
//! the `parallel` feature run them side by side.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Before/after passes run concurrently via `rayon::join`.|
//! | `fx-hash`  | FxHash for per-pass maps.                              |

pub mod aggregate;
pub mod compare;
pub mod error;
pub mod policy;
pub mod population;
pub mod resolver;
pub mod selector;

#[cfg(test)]
mod tests;

pub use aggregate::{
    AgentTotals, Aggregator, DistanceAggregator, PassStats, RouteAggregator, RouteLog,
    TravelTimeAggregator, run_pass,
};
pub use compare::{
    Direction, Metric, RouteComparison, RouteDelta, RunPair, ScalarComparison, ScalarDelta,
    compare_routes, compare_totals,
};
pub use error::{AnalysisError, AnalysisResult};
pub use policy::{DeparturePolicy, IdentityStrategy, RouteEventKind, UnresolvedPolicy};
pub use population::{Population, load_population, load_population_reader, write_population};
pub use resolver::IdentityResolver;
pub use selector::{AffectedLinks, AffectedSelector, Selection, load_links, load_links_reader};

// ── Hash maps ─────────────────────────────────────────────────────────────────

#[cfg(not(feature = "fx-hash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

#[cfg(feature = "fx-hash")]
pub(crate) type Map<K, V> = rustc_hash::FxHashMap<K, V>;

#[cfg(not(feature = "fx-hash"))]
pub(crate) type Set<T> = std::collections::HashSet<T>;

#[cfg(feature = "fx-hash")]
pub(crate) type Set<T> = rustc_hash::FxHashSet<T>;
