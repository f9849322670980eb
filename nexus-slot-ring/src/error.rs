//! Error types for slot ring operations.
//!
//! Every error leaves the ring untouched. Each type maps onto one of three
//! [`ErrorKind`]s for callers that only care about the broad category.

use core::fmt;

use crate::{MAX_CAPACITY, MIN_CAPACITY, SlotState};

/// Broad error category shared by all slot ring operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-fixable misuse: invalid capacity, index out of range, or
    /// releasing a slot that is not reserved.
    BadArgument,
    /// Reservation attempted while no slot holds live output.
    NoUsedSlots,
    /// Every occupied slot is held by the consumer.
    AllSlotsReserved,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadArgument => f.write_str("bad argument"),
            Self::NoUsedSlots => f.write_str("no used slots"),
            Self::AllSlotsReserved => f.write_str("all slots reserved"),
        }
    }
}

/// Backing storage length is outside `MIN_CAPACITY..=MAX_CAPACITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    /// The rejected capacity.
    pub capacity: usize,
}

impl CapacityError {
    /// Always [`ErrorKind::BadArgument`].
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::BadArgument
    }
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "capacity {} outside {}..={}",
            self.capacity, MIN_CAPACITY, MAX_CAPACITY
        )
    }
}

impl core::error::Error for CapacityError {}

/// Production refused: every slot is reserved, nothing can be overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllReserved;

impl AllReserved {
    /// Always [`ErrorKind::AllSlotsReserved`].
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::AllSlotsReserved
    }
}

impl fmt::Display for AllReserved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("all slots reserved")
    }
}

impl core::error::Error for AllReserved {}

/// Error returned by [`SlotRing::reserve_tail`](crate::SlotRing::reserve_tail).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveError {
    /// No slot holds live output. Back off and retry later.
    Empty,
    /// The oldest slot is already reserved.
    AllReserved,
}

impl ReserveError {
    /// Maps to [`ErrorKind::NoUsedSlots`] or [`ErrorKind::AllSlotsReserved`].
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Empty => ErrorKind::NoUsedSlots,
            Self::AllReserved => ErrorKind::AllSlotsReserved,
        }
    }
}

impl fmt::Display for ReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("no used slots"),
            Self::AllReserved => f.write_str("all slots reserved"),
        }
    }
}

impl core::error::Error for ReserveError {}

impl From<AllReserved> for ReserveError {
    fn from(_: AllReserved) -> Self {
        Self::AllReserved
    }
}

/// Error returned by [`SlotRing::release`](crate::SlotRing::release).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseError {
    /// `index` is not below the ring's capacity.
    OutOfBounds {
        /// The rejected index.
        index: usize,
        /// Capacity of the ring.
        capacity: usize,
    },
    /// The slot at `index` is not reserved (double release, or never reserved).
    NotReserved {
        /// The rejected index.
        index: usize,
        /// State the slot was found in.
        state: SlotState,
    },
}

impl ReleaseError {
    /// Always [`ErrorKind::BadArgument`].
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::BadArgument
    }
}

impl fmt::Display for ReleaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { index, capacity } => {
                write!(f, "index {index} out of bounds for capacity {capacity}")
            }
            Self::NotReserved { index, state } => {
                write!(f, "slot {index} is {state}, not reserved")
            }
        }
    }
}

impl core::error::Error for ReleaseError {}
