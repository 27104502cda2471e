use std::fmt::Debug;

/// Typed `u32` index into one of the `LayoutDB` arenas.
macro_rules! define_index {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[inline(always)]
            pub fn new(id: usize) -> Self {
                Self(id as u32)
            }

            #[inline(always)]
            pub fn index(&self) -> usize {
                self.0 as usize
            }

            /// All ids of an arena holding `count` entries.
            pub fn range(count: usize) -> impl Iterator<Item = Self> {
                (0..count).map(Self::new)
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_index!(BlockId);
define_index!(NetId);
define_index!(SegmentId);
define_index!(TsvId);
