//! Per-slot state cell.
//!
//! Each slot of a ring is tracked by exactly one byte. The byte is never
//! inspected directly by the ring: it is decoded into [`SlotState`] and every
//! transition is a `match` on that enum.
//!
//! | Raw byte | State |
//! |----------|-------|
//! | `0` | [`SlotState::Empty`] |
//! | `1..=254` | [`SlotState::Occupied`] with that [`Age`] |
//! | `255` | [`SlotState::Reserved`] |

use core::fmt;

const RAW_EMPTY: u8 = 0x00;
const RAW_RESERVED: u8 = 0xFF;

/// Production-order stamp carried by an occupied slot.
///
/// Ages cycle through `1..=254` and wrap back to 1. They are a relative
/// sequence number, not a timestamp: two ages can only be ordered relative
/// to the ring's current age counter (see [`Age::distance_to`]).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Age(u8);

impl Age {
    /// First age stamped after initialization.
    pub const FIRST: Self = Self(1);

    /// Last age before the counter wraps back to [`Age::FIRST`].
    pub const LAST: Self = Self(0xFE);

    /// Number of distinct ages on the wheel.
    pub const PERIOD: u8 = Self::LAST.0;

    /// Creates an age, returning `None` for the sentinel values 0 and 255.
    #[inline]
    pub const fn new(value: u8) -> Option<Self> {
        match value {
            RAW_EMPTY | RAW_RESERVED => None,
            v => Some(Self(v)),
        }
    }

    /// Returns the raw value (`1..=254`).
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the age stamped after this one, wrapping 254 to 1.
    #[inline]
    pub const fn next(self) -> Self {
        if self.0 == Self::LAST.0 {
            Self::FIRST
        } else {
            Self(self.0 + 1)
        }
    }

    /// Number of production steps from `self` forward to `later`.
    ///
    /// `a.distance_to(a) == 0`, `a.distance_to(a.next()) == 1`, and the
    /// distance wraps around the 254-value wheel.
    #[inline]
    pub const fn distance_to(self, later: Self) -> u8 {
        if later.0 >= self.0 {
            later.0 - self.0
        } else {
            Self::PERIOD - (self.0 - later.0)
        }
    }
}

impl fmt::Debug for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Age({})", self.0)
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Decoded state of a single slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// Holds no data. Free for production.
    Empty,
    /// Holds live producer output stamped with its production age.
    Occupied(Age),
    /// Claimed by the consumer. Immune to overwrite until released.
    Reserved,
}

impl SlotState {
    /// Returns `true` for [`SlotState::Empty`].
    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` for [`SlotState::Occupied`].
    #[inline]
    pub const fn is_occupied(self) -> bool {
        matches!(self, Self::Occupied(_))
    }

    /// Returns `true` for [`SlotState::Reserved`].
    #[inline]
    pub const fn is_reserved(self) -> bool {
        matches!(self, Self::Reserved)
    }

    /// Returns the production age if the slot is occupied.
    #[inline]
    pub const fn age(self) -> Option<Age> {
        match self {
            Self::Occupied(age) => Some(age),
            Self::Empty | Self::Reserved => None,
        }
    }
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::Occupied(age) => write!(f, "occupied (age {age})"),
            Self::Reserved => f.write_str("reserved"),
        }
    }
}

/// One byte of slot state.
///
/// This is the element type of the array a [`SlotRing`](crate::SlotRing)
/// manages. Its contents before initialization do not matter; the ring
/// clears every slot when it is created.
///
/// # Example
///
/// ```
/// use nexus_slot_ring::{Slot, SlotState};
///
/// let slots = [Slot::EMPTY; 4];
/// assert_eq!(slots[0].state(), SlotState::Empty);
/// assert_eq!(Slot::from_raw(0xFF).state(), SlotState::Reserved);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Slot(u8);

impl Slot {
    /// An empty slot.
    pub const EMPTY: Self = Self(RAW_EMPTY);

    /// A slot held by the consumer.
    pub const RESERVED: Self = Self(RAW_RESERVED);

    /// An occupied slot stamped with `age`.
    #[inline]
    pub const fn occupied(age: Age) -> Self {
        Self(age.0)
    }

    /// Reinterprets a raw state byte. Every byte value is a valid state.
    #[inline]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Returns the raw state byte.
    #[inline]
    pub const fn into_raw(self) -> u8 {
        self.0
    }

    /// Decodes the slot state.
    #[inline]
    pub const fn state(self) -> SlotState {
        match self.0 {
            RAW_EMPTY => SlotState::Empty,
            RAW_RESERVED => SlotState::Reserved,
            age => SlotState::Occupied(Age(age)),
        }
    }
}

impl Default for Slot {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<SlotState> for Slot {
    #[inline]
    fn from(state: SlotState) -> Self {
        match state {
            SlotState::Empty => Self::EMPTY,
            SlotState::Occupied(age) => Self::occupied(age),
            SlotState::Reserved => Self::RESERVED,
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state() {
            SlotState::Empty => f.write_str("Empty"),
            SlotState::Occupied(age) => write!(f, "Occupied({})", age.get()),
            SlotState::Reserved => f.write_str("Reserved"),
        }
    }
}
