//! Typed handles for map elements.
//!
//! Every element gets a 1-based build index when it is created. Zero is
//! reserved for "no element", so the handles wrap a `NonZeroU32` and an absent
//! reference is simply `None`. The same handle addresses the editable record
//! and, after hardening, the runtime record at the same position.

use std::fmt;
use std::num::NonZeroU32;

macro_rules! map_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Make a handle from a 1-based build index. `0` gives `None`.
            #[inline]
            pub const fn new(build_index: u32) -> Option<Self> {
                match NonZeroU32::new(build_index) {
                    Some(n) => Some(Self(n)),
                    None => None,
                }
            }

            /// Handle for the element at 0-based array position `index`
            #[inline]
            pub(crate) fn from_index(index: usize) -> Self {
                Self(NonZeroU32::MIN.saturating_add(index as u32))
            }

            /// The 1-based build index
            #[inline]
            pub const fn get(self) -> u32 {
                self.0.get()
            }

            /// The 0-based array position
            #[inline]
            pub const fn index(self) -> usize {
                self.0.get() as usize - 1
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.index())
            }
        }
    };
}

map_handle!(VertexId);
map_handle!(LineId);
map_handle!(SideId);
map_handle!(SectorId);
map_handle!(PolyobjId);
map_handle!(
    /// Index of a plane within its owning sector
    PlaneId
);
map_handle!(
    /// A node in the vertex line owner arena
    OwnerId
);

#[cfg(test)]
mod tests {
    use super::{LineId, VertexId};

    #[test]
    fn zero_is_none() {
        assert!(VertexId::new(0).is_none());
        let v = VertexId::new(3).unwrap();
        assert_eq!(v.get(), 3);
        assert_eq!(v.index(), 2);
        assert_eq!(VertexId::from_index(2), v);
    }

    #[test]
    fn display_is_zero_based() {
        assert_eq!(LineId::new(1).unwrap().to_string(), "#0");
    }
}
