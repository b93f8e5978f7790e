//! The five event variants the analysis consumes.
//!
//! Events carry only local information: a timestamp plus whichever of
//! vehicle, person and link the simulation attached.  Agent identity on
//! link events has to be recovered by the consumer.

use std::fmt;
use std::str::FromStr;

use crate::{AgentId, CoreError, LinkId, SimTime, VehicleId};

// ── EventKind ─────────────────────────────────────────────────────────────────

/// Type tag of an [`Event`].
///
/// The string forms are the tags the simulation writes into its event log.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    VehicleEntersTraffic,
    LinkEnter,
    LinkLeave,
    PersonDeparture,
    PersonArrival,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::VehicleEntersTraffic,
        EventKind::LinkEnter,
        EventKind::LinkLeave,
        EventKind::PersonDeparture,
        EventKind::PersonArrival,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            EventKind::VehicleEntersTraffic => "vehicle enters traffic",
            EventKind::LinkEnter            => "entered link",
            EventKind::LinkLeave            => "left link",
            EventKind::PersonDeparture      => "departure",
            EventKind::PersonArrival        => "arrival",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for EventKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        EventKind::ALL
            .into_iter()
            .find(|k| k.tag() == s)
            .ok_or_else(|| CoreError::Parse(format!("unknown event type {s:?}")))
    }
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// One immutable entry of a simulation trace.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// A vehicle starts driving with `person` at the wheel.  The only event
    /// that links a vehicle to a person.
    VehicleEntersTraffic { time: SimTime, vehicle: VehicleId, person: AgentId },

    LinkEnter { time: SimTime, vehicle: VehicleId, link: LinkId },

    LinkLeave { time: SimTime, vehicle: VehicleId, link: LinkId },

    PersonDeparture { time: SimTime, person: AgentId },

    PersonArrival { time: SimTime, person: AgentId },
}

impl Event {
    pub fn time(&self) -> SimTime {
        match self {
            Event::VehicleEntersTraffic { time, .. }
            | Event::LinkEnter { time, .. }
            | Event::LinkLeave { time, .. }
            | Event::PersonDeparture { time, .. }
            | Event::PersonArrival { time, .. } => *time,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::VehicleEntersTraffic { .. } => EventKind::VehicleEntersTraffic,
            Event::LinkEnter { .. }            => EventKind::LinkEnter,
            Event::LinkLeave { .. }            => EventKind::LinkLeave,
            Event::PersonDeparture { .. }      => EventKind::PersonDeparture,
            Event::PersonArrival { .. }        => EventKind::PersonArrival,
        }
    }

    /// The vehicle referenced by this event, if any.
    pub fn vehicle(&self) -> Option<&VehicleId> {
        match self {
            Event::VehicleEntersTraffic { vehicle, .. }
            | Event::LinkEnter { vehicle, .. }
            | Event::LinkLeave { vehicle, .. } => Some(vehicle),
            _ => None,
        }
    }

    // ── Constructors (mostly for fixtures) ────────────────────────────────

    pub fn enters_traffic(time: f64, vehicle: &str, person: &str) -> Self {
        Event::VehicleEntersTraffic {
            time:    SimTime(time),
            vehicle: VehicleId::from(vehicle),
            person:  AgentId::from(person),
        }
    }

    pub fn link_enter(time: f64, vehicle: &str, link: &str) -> Self {
        Event::LinkEnter { time: SimTime(time), vehicle: vehicle.into(), link: link.into() }
    }

    pub fn link_leave(time: f64, vehicle: &str, link: &str) -> Self {
        Event::LinkLeave { time: SimTime(time), vehicle: vehicle.into(), link: link.into() }
    }

    pub fn departure(time: f64, person: &str) -> Self {
        Event::PersonDeparture { time: SimTime(time), person: person.into() }
    }

    pub fn arrival(time: f64, person: &str) -> Self {
        Event::PersonArrival { time: SimTime(time), person: person.into() }
    }
}
