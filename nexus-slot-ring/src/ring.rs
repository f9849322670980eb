//! Circular slot index manager with out-of-order reservation.
//!
//! The producer claims slots with [`SlotRing::allocate_head`]. The consumer
//! takes the oldest live slot with [`SlotRing::reserve_tail`] and hands it
//! back with [`SlotRing::release`], in any order.
//!
//! # Cursors
//!
//! - `head`: where the next production sweep starts.
//! - `tail`: the oldest live (occupied, unreserved) slot whenever `len > 0`.
//! - `age`: the stamp the next produced slot receives.
//!
//! Live slots always carry a contiguous run of ages on the 254-value wheel:
//! production appends the newest age, and both reservation and overwrite
//! only ever remove the oldest. The tail therefore advances by searching
//! for `age + 1` rather than for the next array position, which is what
//! keeps consumption chronological after releases punch holes into the array.

use core::fmt;

use crate::error::{AllReserved, CapacityError, ReleaseError, ReserveError};
use crate::slot::{Age, Slot, SlotState};
use crate::{MAX_CAPACITY, MIN_CAPACITY};

/// Result of a successful [`SlotRing::allocate_head`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocated {
    /// The slot the producer may now write.
    pub index: usize,
    /// `true` if the slot still held unconsumed output that is now lost.
    pub overwritten: bool,
}

impl Allocated {
    /// Returns the index, discarding the overwrite flag.
    #[inline]
    pub fn into_index(self) -> usize {
        self.index
    }
}

/// Fixed-capacity slot index manager.
///
/// `S` is the backing array of slot states: a borrowed `&mut [Slot]` for
/// caller-owned memory, or an inline `[Slot; N]`. Capacity is the array
/// length and must be within [`MIN_CAPACITY`]`..=`[`MAX_CAPACITY`].
///
/// There is no internal synchronization. Producer and consumer on different
/// threads must serialize access themselves (e.g. a `Mutex<SlotRing<_>>`).
///
/// # Example
///
/// ```
/// use nexus_slot_ring::{Slot, SlotRing};
///
/// let mut slots = [Slot::EMPTY; 3];
/// let mut ring = SlotRing::new(&mut slots[..]).unwrap();
///
/// let a = ring.allocate_head().unwrap().index;
/// let b = ring.allocate_head().unwrap().index;
///
/// // Consumer takes the oldest first
/// assert_eq!(ring.reserve_tail(), Ok(a));
/// assert_eq!(ring.reserve_tail(), Ok(b));
///
/// ring.release(b).unwrap();
/// ring.release(a).unwrap();
/// ```
pub struct SlotRing<S> {
    slots: S,
    /// Number of occupied slots.
    len: u8,
    head: u8,
    tail: u8,
    age: Age,
}

impl<S: AsRef<[Slot]> + AsMut<[Slot]>> SlotRing<S> {
    /// Creates a ring over `slots`, clearing every slot to empty.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `slots.len()` is outside
    /// `MIN_CAPACITY..=MAX_CAPACITY`. The slots are left untouched.
    pub fn new(mut slots: S) -> Result<Self, CapacityError> {
        let capacity = slots.as_ref().len();
        if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
            return Err(CapacityError { capacity });
        }

        slots.as_mut().fill(Slot::EMPTY);

        Ok(Self {
            slots,
            len: 0,
            head: 0,
            tail: 0,
            age: Age::FIRST,
        })
    }

    /// Returns every slot to empty and rewinds all cursors.
    ///
    /// Outstanding reservations are forgotten.
    pub fn reset(&mut self) {
        self.slots.as_mut().fill(Slot::EMPTY);
        self.len = 0;
        self.head = 0;
        self.tail = 0;
        self.age = Age::FIRST;
    }

    /// Consumes the ring, returning the backing storage.
    #[inline]
    pub fn into_inner(self) -> S {
        self.slots
    }

    /// Claims a slot for the producer.
    ///
    /// Sweeps forward from the head for an empty slot. If every slot is in
    /// use, the oldest live slot is overwritten and the result is flagged
    /// with [`Allocated::overwritten`]. Reserved slots are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`AllReserved`] if every slot is reserved.
    pub fn allocate_head(&mut self) -> Result<Allocated, AllReserved> {
        let mut index = self.head as usize;

        for _ in 0..self.capacity() {
            let next = self.next_index(index);

            if self.slots()[index].state().is_empty() {
                if self.len == 0 {
                    // Nothing older is live, so this slot becomes the tail.
                    self.tail = index as u8;
                }
                self.stamp(index);
                self.len += 1;
                self.head = next as u8;

                log::trace!("allocated slot {index}");
                return Ok(Allocated {
                    index,
                    overwritten: false,
                });
            }

            index = next;
        }

        self.overwrite_tail()
    }

    #[cold]
    fn overwrite_tail(&mut self) -> Result<Allocated, AllReserved> {
        debug_assert_eq!(self.free(), 0, "overwrite with empty slots available");
        debug_assert_eq!(
            self.len as usize + self.reserved(),
            self.capacity(),
            "live count out of sync with slot states"
        );

        let tail = self.tail as usize;

        match self.slots()[tail].state() {
            SlotState::Occupied(_) => {
                self.resync_tail();
                self.stamp(tail);
                self.head = tail as u8;

                log::trace!("overwrote unconsumed slot {tail}");
                Ok(Allocated {
                    index: tail,
                    overwritten: true,
                })
            }
            SlotState::Reserved => {
                log::debug!(
                    "all {} slots reserved, refusing production",
                    self.capacity()
                );
                Err(AllReserved)
            }
            SlotState::Empty => unreachable!("tail slot {tail} empty after a full sweep"),
        }
    }

    /// Reserves the oldest live slot for the consumer.
    ///
    /// The returned slot is excluded from production and from later
    /// reservations until passed to [`release`](Self::release).
    ///
    /// # Errors
    ///
    /// - [`ReserveError::Empty`] if no slot holds live output.
    /// - [`ReserveError::AllReserved`] if the tail slot is already reserved.
    pub fn reserve_tail(&mut self) -> Result<usize, ReserveError> {
        if self.len == 0 {
            return Err(ReserveError::Empty);
        }

        let tail = self.tail as usize;

        match self.slots()[tail].state() {
            SlotState::Occupied(_) => {
                self.resync_tail();
                self.slots_mut()[tail] = Slot::RESERVED;
                self.len -= 1;

                log::trace!("reserved slot {tail}");
                Ok(tail)
            }
            SlotState::Reserved => Err(ReserveError::AllReserved),
            SlotState::Empty => {
                debug_assert!(false, "tail slot {tail} empty with {} live", self.len);
                Err(ReserveError::Empty)
            }
        }
    }

    /// Returns a reserved slot to the free pool.
    ///
    /// Reservations may be released in any order.
    ///
    /// # Errors
    ///
    /// - [`ReleaseError::OutOfBounds`] if `index >= capacity`.
    /// - [`ReleaseError::NotReserved`] if the slot is not reserved, which
    ///   includes releasing the same slot twice.
    pub fn release(&mut self, index: usize) -> Result<(), ReleaseError> {
        let capacity = self.capacity();

        let Some(slot) = self.slots_mut().get_mut(index) else {
            log::debug!("rejected release of slot {index}: capacity is {capacity}");
            return Err(ReleaseError::OutOfBounds { index, capacity });
        };

        match slot.state() {
            SlotState::Reserved => {
                *slot = Slot::EMPTY;
                log::trace!("released slot {index}");
                Ok(())
            }
            state => {
                log::debug!("rejected release of slot {index}: {state}");
                Err(ReleaseError::NotReserved { index, state })
            }
        }
    }

    /// Moves the tail to the slot stamped with the age after the tail's own.
    ///
    /// Leaves the tail in place when no such slot exists, which only happens
    /// when the tail is the last live slot.
    fn resync_tail(&mut self) {
        let tail = self.tail as usize;

        let SlotState::Occupied(age) = self.slots()[tail].state() else {
            debug_assert!(false, "tail slot {tail} is not live");
            return;
        };

        let successor = SlotState::Occupied(age.next());
        let mut index = tail;

        for _ in 0..self.capacity() {
            index = self.next_index(index);
            if self.slots()[index].state() == successor {
                self.tail = index as u8;
                return;
            }
        }

        debug_assert_eq!(self.len, 1, "live ages are not contiguous");
        debug_assert_eq!(self.oldest(), Some(tail), "tail is not the oldest slot");
    }

    #[inline]
    fn stamp(&mut self, index: usize) {
        self.slots_mut()[index] = Slot::occupied(self.age);
        self.age = self.age.next();
    }

    #[inline]
    fn slots_mut(&mut self) -> &mut [Slot] {
        self.slots.as_mut()
    }
}

impl<S: AsRef<[Slot]>> SlotRing<S> {
    /// Number of slots managed.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots().len()
    }

    /// Number of slots holding live, unreserved output.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns `true` if no slot holds live output.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots held by the consumer. Scans every slot.
    pub fn reserved(&self) -> usize {
        self.states().filter(|s| s.is_reserved()).count()
    }

    /// Number of empty slots. Scans every slot.
    pub fn free(&self) -> usize {
        self.states().filter(|s| s.is_empty()).count()
    }

    /// State of the slot at `index`, or `None` if out of bounds.
    #[inline]
    pub fn state(&self, index: usize) -> Option<SlotState> {
        self.slots().get(index).map(|slot| slot.state())
    }

    /// States of all slots in index order.
    pub fn states(&self) -> impl ExactSizeIterator<Item = SlotState> {
        self.slots().iter().map(|slot| slot.state())
    }

    /// The slot the next [`reserve_tail`](SlotRing::reserve_tail) would
    /// return, without reserving it.
    pub fn peek_tail(&self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let tail = self.tail as usize;
        self.slots()[tail].state().is_occupied().then_some(tail)
    }

    /// Finds the oldest live slot by comparing ages, ignoring the tail cursor.
    ///
    /// Ages are ordered by their distance back from the ring's age counter,
    /// so the result is correct across wraparound. Agrees with
    /// [`peek_tail`](SlotRing::peek_tail) whenever the ring is consistent.
    pub fn oldest(&self) -> Option<usize> {
        let mut oldest: Option<(usize, u8)> = None;

        for (index, state) in self.states().enumerate() {
            let Some(age) = state.age() else { continue };
            let distance = age.distance_to(self.age);
            match oldest {
                Some((_, best)) if best >= distance => {}
                _ => oldest = Some((index, distance)),
            }
        }

        oldest.map(|(index, _)| index)
    }

    #[inline]
    fn slots(&self) -> &[Slot] {
        self.slots.as_ref()
    }

    #[inline]
    fn next_index(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.capacity() { 0 } else { next }
    }
}

impl<const N: usize> SlotRing<[Slot; N]> {
    /// Compile-time assertion that `N` is a valid capacity.
    const _ASSERT_CAPACITY: () = assert!(
        N >= MIN_CAPACITY && N <= MAX_CAPACITY,
        "N must be within MIN_CAPACITY..=MAX_CAPACITY"
    );

    /// Creates a ring with inline storage.
    ///
    /// Invalid `N` fails to compile:
    ///
    /// ```compile_fail
    /// use nexus_slot_ring::InlineSlotRing;
    /// let ring = InlineSlotRing::<254>::inline(); // ERROR: 254 is a sentinel
    /// ```
    pub fn inline() -> Self {
        // Force the compile-time assertion to be evaluated
        let () = Self::_ASSERT_CAPACITY;

        Self {
            slots: [Slot::EMPTY; N],
            len: 0,
            head: 0,
            tail: 0,
            age: Age::FIRST,
        }
    }
}

impl<const N: usize> Default for SlotRing<[Slot; N]> {
    fn default() -> Self {
        Self::inline()
    }
}

impl<S: AsRef<[Slot]>> fmt::Debug for SlotRing<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotRing")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("age", &self.age)
            .field("slots", &self.slots())
            .finish()
    }
}
