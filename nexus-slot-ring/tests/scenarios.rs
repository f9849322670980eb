use nexus_slot_ring::{
    AllReserved, BorrowedSlotRing, ErrorKind, InlineSlotRing, MAX_CAPACITY, MIN_CAPACITY,
    ReleaseError, ReserveError, Slot, SlotRing, SlotState,
};

fn fill<S>(ring: &mut SlotRing<S>) -> Vec<usize>
where
    S: AsRef<[Slot]> + AsMut<[Slot]>,
{
    (0..ring.capacity())
        .map(|_| {
            let allocated = ring.allocate_head().unwrap();
            assert!(!allocated.overwritten);
            allocated.index
        })
        .collect()
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn capacity_bounds() {
    for capacity in [0, 1, 254, 255, 300] {
        let mut slots = vec![Slot::EMPTY; capacity];
        let err = SlotRing::new(&mut slots[..]).unwrap_err();
        assert_eq!(err.capacity, capacity);
        assert_eq!(err.kind(), ErrorKind::BadArgument);
    }

    for capacity in [MIN_CAPACITY, 3, 64, MAX_CAPACITY] {
        let mut slots = vec![Slot::EMPTY; capacity];
        let ring: BorrowedSlotRing<'_> = SlotRing::new(&mut slots[..]).unwrap();
        assert_eq!(ring.capacity(), capacity);
        assert!(ring.is_empty());
    }
}

// ============================================================================
// Double Buffer
// ============================================================================

#[test]
fn double_buffer() {
    let mut slots = [Slot::EMPTY; 2];
    let mut ring = SlotRing::new(&mut slots[..]).unwrap();

    let first = ring.allocate_head().unwrap();
    let second = ring.allocate_head().unwrap();
    assert!(!first.overwritten && !second.overwritten);
    assert_ne!(first.index, second.index);
    assert!(first.index < 2 && second.index < 2);

    // Overwrite returns to the first index, then the second
    let third = ring.allocate_head().unwrap();
    assert!(third.overwritten);
    assert_eq!(third.index, first.index);

    let fourth = ring.allocate_head().unwrap();
    assert!(fourth.overwritten);
    assert_eq!(fourth.index, second.index);
}

#[test]
fn double_buffer_push_pop() {
    let mut slots = [Slot::EMPTY; 2];
    let mut ring = SlotRing::new(&mut slots[..]).unwrap();

    let a = ring.allocate_head().unwrap().index;
    let b = ring.allocate_head().unwrap().index;
    assert_ne!(a, b);

    assert_eq!(ring.reserve_tail(), Ok(a));
    assert_eq!(ring.reserve_tail(), Ok(b));

    let err = ring.reserve_tail().unwrap_err();
    assert_eq!(err, ReserveError::Empty);
    assert_eq!(err.kind(), ErrorKind::NoUsedSlots);
}

// ============================================================================
// Triple Buffer
// ============================================================================

#[test]
fn triple_buffer_out_of_order_release() {
    let mut slots = [Slot::EMPTY; 3];
    let mut ring = SlotRing::new(&mut slots[..]).unwrap();

    let heads = fill(&mut ring);
    let (h1, h2, h3) = (heads[0], heads[1], heads[2]);
    assert_ne!(h1, h2);
    assert_ne!(h1, h3);
    assert_ne!(h2, h3);

    // Saturated: overwrite the oldest
    let h4 = ring.allocate_head().unwrap();
    assert!(h4.overwritten);
    assert_eq!(h4.index, h1);

    // Consumer takes the two oldest survivors, in production order
    let t1 = ring.reserve_tail().unwrap();
    assert_eq!(t1, h2);
    let t2 = ring.reserve_tail().unwrap();
    assert_eq!(t2, h3);

    // Only h1 is unreserved, so it keeps getting overwritten
    let h5 = ring.allocate_head().unwrap();
    assert!(h5.overwritten);
    assert_eq!(h5.index, h1);

    // Release the second reservation first
    assert_eq!(ring.release(t2), Ok(()));

    let h6 = ring.allocate_head().unwrap();
    assert!(!h6.overwritten);
    assert_eq!(h6.index, t2);

    // Already released
    let err = ring.release(t2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadArgument);

    assert_eq!(ring.release(t1), Ok(()));

    let h7 = ring.allocate_head().unwrap();
    assert!(!h7.overwritten);
    assert_eq!(h7.index, t1);

    // Consumption order is h5 (h1's slot), h6, h7
    assert_eq!(ring.reserve_tail(), Ok(h1));
    assert_eq!(ring.reserve_tail(), Ok(t2));
    assert_eq!(ring.reserve_tail(), Ok(t1));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn fill_yields_distinct_indices_for_every_capacity() {
    for capacity in MIN_CAPACITY..=MAX_CAPACITY {
        let mut slots = vec![Slot::EMPTY; capacity];
        let mut ring = SlotRing::new(&mut slots[..]).unwrap();

        let mut indices = fill(&mut ring);
        let first = indices[0];
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), capacity);
        assert!(indices.iter().all(|&i| i < capacity));

        let evicted = ring.allocate_head().unwrap();
        assert!(evicted.overwritten);
        assert_eq!(evicted.index, first);
    }
}

#[test]
fn double_release_leaves_state_unchanged() {
    let mut ring = InlineSlotRing::<4>::inline();
    fill(&mut ring);
    let index = ring.reserve_tail().unwrap();
    ring.release(index).unwrap();

    let before: Vec<SlotState> = ring.states().collect();
    let len = ring.len();

    assert!(matches!(
        ring.release(index),
        Err(ReleaseError::NotReserved { state: SlotState::Empty, .. })
    ));
    assert_eq!(ring.states().collect::<Vec<_>>(), before);
    assert_eq!(ring.len(), len);

    // The ring still behaves: the freed slot is reused first
    assert_eq!(ring.allocate_head().unwrap().index, index);
}

#[test]
fn release_of_unreserved_slot() {
    let mut ring = InlineSlotRing::<3>::inline();
    let live = ring.allocate_head().unwrap().index;
    let empty = 2;

    let err = ring.release(live).unwrap_err();
    assert!(matches!(err, ReleaseError::NotReserved { .. }));

    let err = ring.release(empty).unwrap_err();
    assert_eq!(
        err,
        ReleaseError::NotReserved {
            index: empty,
            state: SlotState::Empty
        }
    );

    let err = ring.release(usize::MAX).unwrap_err();
    assert!(matches!(err, ReleaseError::OutOfBounds { capacity: 3, .. }));
}

#[test]
fn production_refused_only_when_everything_reserved() {
    let mut ring = InlineSlotRing::<3>::inline();
    fill(&mut ring);

    for _ in 0..2 {
        ring.reserve_tail().unwrap();
        // At least one slot is not reserved: production never fails
        assert!(ring.allocate_head().is_ok());
    }

    ring.reserve_tail().unwrap();
    assert_eq!(ring.reserved(), 3);

    let err = ring.allocate_head().unwrap_err();
    assert_eq!(err, AllReserved);
    assert_eq!(err.kind(), ErrorKind::AllSlotsReserved);
    assert_eq!(ring.reserve_tail(), Err(ReserveError::Empty));
}

#[test]
fn reserve_after_drain_picks_new_output() {
    let mut ring = InlineSlotRing::<2>::inline();
    fill(&mut ring);
    let a = ring.reserve_tail().unwrap();
    let b = ring.reserve_tail().unwrap();

    // Release the older reservation and produce into it
    ring.release(a).unwrap();
    let fresh = ring.allocate_head().unwrap();
    assert_eq!(fresh.index, a);

    assert_eq!(ring.reserve_tail(), Ok(a));
    ring.release(b).unwrap();
    ring.release(a).unwrap();
    assert_eq!(ring.free(), 2);
}
