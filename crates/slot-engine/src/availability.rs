//! Subtract buffered busy time from working-hour blocks.
//!
//! Busy intervals are padded by the configured buffer, sorted and merged. Each
//! working block is then swept independently with a cursor: gaps in front of
//! busy intervals and the tail after the last one become candidate slots, and
//! only candidates strictly longer than the minimum slot length are kept.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

use crate::config::Config;
use crate::interval::{merge_intervals, sort_intervals, Interval};

/// Compute the available slots inside `blocks`, given raw (unsorted) busy time.
///
/// `blocks` must be ascending and non-overlapping (one per day, as produced by
/// [`crate::workdays::working_blocks`]). The result is chronological, and each
/// slot is expressed in its block's zone.
///
/// Boundary rules:
/// - a slot exactly `min_slot_minutes` long is dropped (strict `>`);
/// - busy time that only touches a block edge does not consume the block;
/// - padding happens before merging, so nearby busy intervals can fuse.
pub fn compute_available_slots(
    blocks: &[Interval],
    busy: &[Interval],
    config: &Config,
) -> Vec<Interval> {
    if blocks.is_empty() {
        return Vec::new();
    }

    let buffer = config.buffer();
    let mut padded: Vec<Interval> = busy
        .iter()
        .map(|interval| interval.padded(buffer))
        .collect();
    sort_intervals(&mut padded);
    let merged_busy = merge_intervals(&padded);

    let min_slot = config.min_slot();

    if merged_busy.is_empty() {
        return blocks
            .iter()
            .filter(|block| block.duration() > min_slot)
            .copied()
            .collect();
    }

    blocks
        .iter()
        .flat_map(|block| free_in_block(block, &merged_busy, min_slot))
        .collect()
}

/// Sweep one working block against the merged busy list.
fn free_in_block(block: &Interval, merged: &[Interval], min_slot: Duration) -> Vec<Interval> {
    // First busy interval starting at or after the block, then one step back to
    // catch an interval that started earlier and runs into the block.
    let first = merged
        .partition_point(|busy| busy.start() < block.start())
        .saturating_sub(1);

    let mut slots = Vec::new();
    let mut cursor = block.start();

    // Busy time that only touches a block edge is not relevant to it.
    let relevant = merged[first..]
        .iter()
        .take_while(|busy| busy.start() < block.end())
        .filter(|busy| busy.overlaps(block));

    for busy in relevant {
        if busy.end() <= cursor {
            continue;
        }
        if cursor < busy.start() {
            let gap_end = busy.start().min(block.end());
            slots.extend(slot_if_long_enough(block, cursor, gap_end, min_slot));
        }
        cursor = cursor.max(busy.end());
    }

    if cursor < block.end() {
        slots.extend(slot_if_long_enough(block, cursor, block.end(), min_slot));
    }

    slots
}

fn slot_if_long_enough(
    block: &Interval,
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    min_slot: Duration,
) -> Option<Interval> {
    Interval::new(start, end)
        .ok()
        .filter(|slot| slot.duration() > min_slot)
        .map(|slot| slot.with_timezone(block.start().timezone()))
}

/// Total time across a list of slots.
pub fn total_available(slots: &[Interval]) -> Duration {
    slots
        .iter()
        .fold(Duration::zero(), |total, slot| total + slot.duration())
}
