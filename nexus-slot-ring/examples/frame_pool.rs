//! Camera-style frame pool.
//!
//! A producer captures frames into a fixed pool of buffers and never waits.
//! A slow consumer reserves the oldest frame, keeps up to two frames in
//! flight, and finishes them out of order. Overwritten frames are reported
//! as drops.
//!
//! Run: RUST_LOG=nexus_slot_ring=trace cargo run --example frame_pool

use nexus_slot_ring::{BorrowedSlotRing, ReserveError, Slot, SlotRing};

const POOL: usize = 4;
const FRAME_BYTES: usize = 32;
const TICKS: u32 = 24;

struct Frame {
    seq: u32,
    pixels: [u8; FRAME_BYTES],
}

fn capture(ring: &mut BorrowedSlotRing<'_>, frames: &mut [Frame], seq: u32) -> bool {
    match ring.allocate_head() {
        Ok(allocated) => {
            let frame = &mut frames[allocated.index];
            if allocated.overwritten {
                log::warn!("dropped frame {} (slot {})", frame.seq, allocated.index);
            }
            frame.seq = seq;
            frame.pixels.fill(seq as u8);
            allocated.overwritten
        }
        Err(err) => {
            log::error!("capture of frame {seq} refused: {err}");
            true
        }
    }
}

fn main() {
    env_logger::init();

    let mut frames: Vec<Frame> = (0..POOL)
        .map(|_| Frame {
            seq: 0,
            pixels: [0; FRAME_BYTES],
        })
        .collect();
    let mut slots = [Slot::EMPTY; POOL];
    let mut ring = SlotRing::new(&mut slots[..]).expect("pool size is valid");

    let mut in_flight: Vec<usize> = Vec::new();
    let mut dropped = 0;
    let mut processed = 0;

    for tick in 1..=TICKS {
        if capture(&mut ring, &mut frames, tick) {
            dropped += 1;
        }

        // Consumer runs at a third of the capture rate
        if tick % 3 != 0 {
            continue;
        }

        match ring.reserve_tail() {
            Ok(index) => {
                let frame = &frames[index];
                log::info!("processing frame {} from slot {index}", frame.seq);
                in_flight.push(index);
            }
            Err(ReserveError::Empty) => log::info!("nothing to process"),
            Err(err) => log::error!("reserve failed: {err}"),
        }

        if in_flight.len() == 2 {
            // Finish the newer frame first
            while let Some(index) = in_flight.pop() {
                ring.release(index).expect("slot is reserved");
                processed += 1;
            }
        }
    }

    println!("captured:  {TICKS}");
    println!("processed: {processed}");
    println!("dropped:   {dropped}");
    println!("pool:      {ring:?}");
}
