//! Strongly typed, zero-cost identifier wrappers.
//!
//! Entities live in plain `Vec` arenas owned by the fleet context; an ID is
//! the index into its arena.  Queues and AGVs hold IDs, never references, so
//! moving a battery between owners is a matter of moving a `Copy` value.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
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
    /// Index of a vehicle in the fleet arena.
    pub struct AgvId(u32);
}

typed_id! {
    /// Index of a battery pack in the battery arena.
    pub struct BatteryId(u32);
}

typed_id! {
    /// Sequence number of a container, unique for the whole run.
    pub struct ContainerId(u64);
}

typed_id! {
    /// Sequence number of a shipment (vessel call).
    pub struct ShipmentId(u32);
}

typed_id! {
    /// Handle of a process registered with the scheduler.
    pub struct ProcessId(u32);
}
