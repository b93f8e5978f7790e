//! Strongly typed string identifiers.
//!
//! Simulation ids are opaque strings ("1234", "veh_1234", "27392395#1") and
//! compare by exact match.  Each kind gets its own newtype so a vehicle id can
//! never be looked up in an agent map by accident.
//!
//! All ids implement `Borrow<str>`, so maps and sets keyed by an id can be
//! probed with a plain `&str` without allocating.

use std::borrow::Borrow;
use std::fmt;

/// Generate a typed id wrapper around an owned `String`.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            #[inline]
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id! {
    /// A simulated person.  Unique within a run; the before and after runs
    /// share the same id space.
    pub struct AgentId;
}

string_id! {
    /// A vehicle.  Related to an agent only through a traffic-entry event or
    /// a naming convention, never by equality.
    pub struct VehicleId;
}

string_id! {
    /// A directed road-network link.
    pub struct LinkId;
}
