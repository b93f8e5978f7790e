//! Per-event-type callbacks.

use impact_core::{AgentId, Event, LinkId, SimTime, VehicleId};

/// Callbacks invoked by an [`EventSource`][crate::EventSource] for each event
/// of a trace, in log order.
///
/// All methods have default no-op implementations so implementors only
/// override the event types they consume.  Errors cannot be returned from a
/// callback; handlers that can fail keep the first error and surface it when
/// they are finished.
///
/// # Example: counting departures
///
/// ```rust,ignore
/// struct Departures(usize);
///
/// impl EventHandler for Departures {
///     fn on_person_departure(&mut self, _time: SimTime, _person: &AgentId) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait EventHandler {
    fn on_vehicle_enters_traffic(
        &mut self,
        _time:    SimTime,
        _vehicle: &VehicleId,
        _person:  &AgentId,
    ) {}

    fn on_link_enter(&mut self, _time: SimTime, _vehicle: &VehicleId, _link: &LinkId) {}

    fn on_link_leave(&mut self, _time: SimTime, _vehicle: &VehicleId, _link: &LinkId) {}

    fn on_person_departure(&mut self, _time: SimTime, _person: &AgentId) {}

    fn on_person_arrival(&mut self, _time: SimTime, _person: &AgentId) {}

    /// Dispatch `event` to the matching callback.
    fn handle(&mut self, event: &Event) {
        match event {
            Event::VehicleEntersTraffic { time, vehicle, person } => {
                self.on_vehicle_enters_traffic(*time, vehicle, person)
            }
            Event::LinkEnter { time, vehicle, link } => self.on_link_enter(*time, vehicle, link),
            Event::LinkLeave { time, vehicle, link } => self.on_link_leave(*time, vehicle, link),
            Event::PersonDeparture { time, person } => self.on_person_departure(*time, person),
            Event::PersonArrival { time, person } => self.on_person_arrival(*time, person),
        }
    }
}

/// An [`EventHandler`] that only counts events by type.  Handy as a smoke
/// test of a trace file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EventCounter {
    pub vehicle_enters_traffic: u64,
    pub link_enter:             u64,
    pub link_leave:             u64,
    pub person_departure:       u64,
    pub person_arrival:         u64,
}

impl EventCounter {
    pub fn total(&self) -> u64 {
        self.vehicle_enters_traffic
            + self.link_enter
            + self.link_leave
            + self.person_departure
            + self.person_arrival
    }
}

impl EventHandler for EventCounter {
    fn on_vehicle_enters_traffic(&mut self, _: SimTime, _: &VehicleId, _: &AgentId) {
        self.vehicle_enters_traffic += 1;
    }

    fn on_link_enter(&mut self, _: SimTime, _: &VehicleId, _: &LinkId) {
        self.link_enter += 1;
    }

    fn on_link_leave(&mut self, _: SimTime, _: &VehicleId, _: &LinkId) {
        self.link_leave += 1;
    }

    fn on_person_departure(&mut self, _: SimTime, _: &AgentId) {
        self.person_departure += 1;
    }

    fn on_person_arrival(&mut self, _: SimTime, _: &AgentId) {
        self.person_arrival += 1;
    }
}
