// This macro generates newtype structs wrapping a `usize` index so that rule
// and production indices cannot be accidentally swapped for one another.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! IdxNewtype {
    ($(#[$attr:meta])* $n: ident) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $n(pub usize);

        impl From<$n> for usize {
            fn from(idx: $n) -> Self {
                idx.0
            }
        }

        impl From<usize> for $n {
            fn from(v: usize) -> Self {
                $n(v)
            }
        }
    }
}

IdxNewtype!(
    /// A type specifically for rule indices. A grammar with `n` rules has
    /// rule indices `0..n` in first-encounter order.
    RIdx
);
IdxNewtype!(
    /// A type specifically for production indices (e.g. the rule `S -> AB | BA`
    /// has two productions for the single rule `S`).
    PIdx
);
