//! `impact-network` — the road-network collaborator.
//!
//! The analysis only ever asks one question of the network: "how long is
//! this link?", and "not found" must be a distinguishable answer because the
//! loaded network may not cover every link the event log mentions.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `Network` trait, `LinkNetwork`, `LinkNetworkBuilder`        |
//! | [`loader`]  | `load_network_csv`, `load_network_reader`                   |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                    |
//! |-----------|-----------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the link table.             |

pub mod error;
pub mod loader;
pub mod network;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use loader::{load_network_csv, load_network_reader};
pub use network::{LinkNetwork, LinkNetworkBuilder, Network};
