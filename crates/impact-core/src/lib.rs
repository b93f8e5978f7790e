//! `impact-core` — foundational types for the policy-impact trace analysis
//! workspace.
//!
//! Every other `impact-*` crate depends on this one.  It has no `impact-*`
//! dependencies and only `thiserror` (plus optional `serde`) externally.
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `VehicleId`, `LinkId`                          |
//! | [`time`]    | `SimTime` (seconds since simulation midnight)             |
//! | [`event`]   | `Event`, `EventKind`                                      |
//! | [`error`]   | `CoreError`                                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod event;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::CoreError;
pub use event::{Event, EventKind};
pub use ids::{AgentId, LinkId, VehicleId};
pub use time::SimTime;
