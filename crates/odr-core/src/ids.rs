//! Strongly typed, zero-cost identifier wrappers.
//!
//! Every registry in the workspace is an arena: entities live in one owning
//! `Vec` and everything else refers to them by one of these ids.  All IDs are
//! `Copy + Ord + Hash` so they can be used as map keys and sorted collection
//! elements without ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Build an id from an arena position.
            ///
            /// # Panics
            /// Panics if `index` does not fit the inner integer.  Arenas are
            /// bounded well below that.
            #[inline(always)]
            pub fn from_index(index: usize) -> Self {
                match <$inner>::try_from(index) {
                    Ok(raw) => $name(raw),
                    Err(_) => panic!("{} index {index} overflows", stringify!($name)),
                }
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a road-network node.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed road-network edge.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Index of a detector in the `DetectorRegistry`.
    pub struct DetectorId(u32);
}

typed_id! {
    /// Index of a district (traffic analysis zone).
    pub struct DistrictId(u32);
}

typed_id! {
    /// Index of a district group.
    pub struct GroupId(u32);
}

typed_id! {
    /// Index of a candidate route in the `RouteCatalog`.
    pub struct RouteId(u32);
}

typed_id! {
    /// Index of an edge-level origin/destination trip.
    pub struct TripId(u32);
}
