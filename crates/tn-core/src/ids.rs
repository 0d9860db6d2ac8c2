//! Strongly typed, zero-cost identifier wrappers.
//!
//! Each id is a position in one of the graph's or catalog's parallel `Vec`s.
//! The inner `u32` is public so tests and tables can build ids directly.

use std::fmt;

/// Generate a `u32` index newtype.  The tag is the short prefix used by
/// `Display`, so log lines read `v12`, `p340`, `e7`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident = $tag:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel for "unset"; also the `Default`.
            pub const INVALID: $name = $name(u32::MAX);

            /// Position in the `Vec` this id indexes.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Id of the element at `index`.  Table sizes are bounded by the
            /// source data, which never approaches `u32::MAX` elements.
            #[inline(always)]
            pub fn from_index(index: usize) -> Self {
                debug_assert!(index < u32::MAX as usize, "{} overflow", stringify!($name));
                $name(index as u32)
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}{}", $tag, self.0)
                } else {
                    write!(f, "{}-", $tag)
                }
            }
        }
    };
}

typed_id! {
    /// Index of a deduplicated source coordinate.  Every vertex is a point,
    /// but interior points of compacted chains are not vertices.
    pub struct PointId = "p";
}

typed_id! {
    /// Index of a trail-graph vertex (junction or line endpoint).
    pub struct VertexId = "v";
}

typed_id! {
    /// Index of a directed trail-graph edge.
    pub struct EdgeId = "e";
}

typed_id! {
    /// Position of a feature in the source collection.
    pub struct FeatureId = "f";
}

typed_id! {
    /// Connected-component label of a vertex.
    pub struct IslandId = "i";
}
