use thiserror::Error;

use impact_core::{AgentId, SimTime, VehicleId};
use impact_events::EventError;
use impact_network::NetworkError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Events(#[from] EventError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Raised only under [`UnresolvedPolicy::Reject`][crate::UnresolvedPolicy].
    #[error("vehicle {0} has no known driver at the time of its link event")]
    UnresolvedVehicle(VehicleId),

    /// Raised only under [`DeparturePolicy::Reject`][crate::DeparturePolicy].
    #[error("agent {agent} departed at {second} while still travelling since {first}")]
    OverlappingDeparture {
        agent:  AgentId,
        first:  SimTime,
        second: SimTime,
    },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
