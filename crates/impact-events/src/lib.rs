//! `impact-events` — the event-source seam of the analysis.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`handler`] | `EventHandler` trait (per-type callbacks), `EventCounter`   |
//! | [`source`]  | `EventSource` trait, `MemorySource`                         |
//! | [`csv`]     | `CsvEventSource`, `read_events_reader`                      |
//! | [`error`]   | `EventError`, `EventResult<T>`                              |
//!
//! # Contract
//!
//! An [`EventSource`] replays one trace start to end, calling the matching
//! [`EventHandler`] callback exactly once per event in log order.  Sources
//! hold no handler state, so the same source can be replayed any number of
//! times with fresh handlers.

pub mod csv;
pub mod error;
pub mod handler;
pub mod source;


pub use csv::{CsvEventSource, read_events_reader};
pub use error::{EventError, EventResult};
pub use handler::{EventCounter, EventHandler};
pub use source::{EventSource, MemorySource};
