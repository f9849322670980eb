//! Allocation-free circular slot index manager.
//!
//! A [`SlotRing`] hands out indices into a small, caller-owned pool of
//! buffers (frames, packets, ...). The producer always gets a slot: when the
//! pool is saturated the oldest unconsumed slot is sacrificed. The consumer
//! reserves the oldest slot, works on it for as long as it likes, and
//! releases it in any order. Reserved slots are never overwritten.
//!
//! State is one byte per slot plus four byte-sized cursors. Nothing is
//! allocated and every operation is a bounded scan over at most
//! `capacity` slots.
//!
//! # Slot lifecycle
//!
//! ```text
//! Empty --allocate_head--> Occupied(age) --reserve_tail--> Reserved --release--> Empty
//!                              |    ^
//!                              +----+  allocate_head (overwrite when saturated)
//! ```
//!
//! # Example
//!
//! ```
//! use nexus_slot_ring::{ReserveError, Slot, SlotRing};
//!
//! let mut frames = [[0u8; 64]; 3];
//! let mut slots = [Slot::EMPTY; 3];
//! let mut ring = SlotRing::new(&mut slots[..]).unwrap();
//!
//! // Produce three frames, then a fourth which evicts the oldest
//! for seq in 0..4u8 {
//!     let allocated = ring.allocate_head().unwrap();
//!     frames[allocated.index][0] = seq;
//!     assert_eq!(allocated.overwritten, seq == 3);
//! }
//!
//! // Frames come back in production order: 1, 2, 3 (0 was overwritten)
//! let first = ring.reserve_tail().unwrap();
//! let second = ring.reserve_tail().unwrap();
//! assert_eq!(frames[first][0], 1);
//! assert_eq!(frames[second][0], 2);
//!
//! // Release out of order
//! ring.release(second).unwrap();
//! ring.release(first).unwrap();
//!
//! let third = ring.reserve_tail().unwrap();
//! assert_eq!(frames[third][0], 3);
//! assert_eq!(ring.reserve_tail(), Err(ReserveError::Empty));
//! ```
//!
//! # Concurrency
//!
//! The ring is a plain `&mut self` state machine. Sharing it between a
//! producer and a consumer thread requires external serialization.

#![no_std]
#![warn(missing_docs)]

#[cfg(test)]
extern crate std;

mod error;
mod ring;
mod slot;

pub use error::{AllReserved, CapacityError, ErrorKind, ReleaseError, ReserveError};
pub use ring::{Allocated, SlotRing};
pub use slot::{Age, Slot, SlotState};

/// Smallest supported capacity.
pub const MIN_CAPACITY: usize = 2;

/// Largest supported capacity.
///
/// Ages occupy raw byte values `1..=254`; keeping capacity below the age
/// period guarantees live slots never share an age.
pub const MAX_CAPACITY: usize = 253;

/// Ring over a caller-owned slot array.
pub type BorrowedSlotRing<'a> = SlotRing<&'a mut [Slot]>;

/// Ring with inline storage for `N` slots.
pub type InlineSlotRing<const N: usize> = SlotRing<[Slot; N]>;
