//! The `EventSource` trait and an in-memory implementation.

use impact_core::Event;

use crate::{EventHandler, EventResult};

/// A replayable, time-ordered trace.
///
/// `replay` reads the whole trace and calls `handler` once per event, in log
/// order, until end of trace.  It takes `&self`: a source never owns handler
/// state, so replaying twice with two fresh handlers yields two independent
/// passes.  Returns the number of events delivered.
///
/// `Sync` is required so the before and after passes can be replayed on
/// separate threads.
pub trait EventSource: Sync {
    fn replay(&self, handler: &mut dyn EventHandler) -> EventResult<u64>;

    /// Human-readable name for log lines (usually the file path).
    fn describe(&self) -> String;
}

/// A trace held in memory.  Used by tests and the demo binary.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name:   String,
    events: Vec<Event>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, events: Vec<Event>) -> Self {
        Self { name: name.into(), events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSource for MemorySource {
    fn replay(&self, handler: &mut dyn EventHandler) -> EventResult<u64> {
        for event in &self.events {
            handler.handle(event);
        }
        Ok(self.events.len() as u64)
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
