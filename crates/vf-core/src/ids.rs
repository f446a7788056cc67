//! Strongly typed identifier wrappers.
//!
//! Every id is a dense index into a `Vec` owned by the simulation context:
//! entities are numbered `0..population` in generation order, paths and
//! lanes in configuration order.  Use `.index()` rather than `.0 as usize`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
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
    /// One simulated individual.
    pub struct EntityId(u32);
}

typed_id! {
    /// A group of entities sharing an arrival instant and a path.
    pub struct GroupId(u32);
}

typed_id! {
    /// A named walking path, in configuration order.
    pub struct PathId(u16);
}

typed_id! {
    /// A single-capacity security lane.  Lanes are numbered across all
    /// checkpoint groups: group 0 owns the first block, group 1 the next, …
    pub struct LaneId(u16);
}

typed_id! {
    /// A checkpoint group (tent).  Group 0 is the tie-break default.
    pub struct CheckpointId(u16);
}
