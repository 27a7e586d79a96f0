//! Strongly typed identifier wrappers.
//!
//! Every name the simulator hands out (vehicles, routes, edges, lanes, types)
//! is a string on the wire.  Wrapping each kind in its own newtype keeps a
//! lane id from being passed where an edge id is expected.  All ids are
//! `Clone + Ord + Hash` so they can be used as map keys and sorted without
//! ceremony.

use std::borrow::Borrow;
use std::fmt;

/// Generate a typed id wrapper around an owned `String`.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub String);

        impl $name {
            #[inline]
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

        impl From<&str> for $name {
            #[inline]
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $name {
            #[inline]
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// A vehicle or person present in the simulation.
    pub struct EntityId;
}

string_id! {
    /// A named route (ordered edge list) registered with the simulator.
    pub struct RouteId;
}

string_id! {
    /// A directed road-network edge.
    pub struct EdgeId;
}

string_id! {
    /// A single lane of an edge.  Lanes of one edge are ordered rightmost
    /// first by the simulator's `<edge>_<index>` naming.
    pub struct LaneId;
}

string_id! {
    /// A vehicle or pedestrian type (`passenger`, `bus`, `ped_pedestrian`, …).
    pub struct VTypeId;
}

string_id! {
    /// An abstract vehicle class used by lane permissions.
    pub struct VClass;
}

string_id! {
    /// A labeled polygonal zone.
    pub struct ZoneId;
}

impl VClass {
    /// The class name the simulator assigns to walking persons.
    pub const PEDESTRIAN: &'static str = "pedestrian";

    #[inline]
    pub fn is_pedestrian(&self) -> bool {
        self.0 == Self::PEDESTRIAN
    }
}
