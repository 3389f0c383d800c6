//! # Slots — Serialized Result Slot Allocation
//!
//! The engine's single mandatory critical section. Every qualifying candidate
//! goes through `try_allocate`, which performs one mutex-guarded
//! check-assign-increment: no two workers ever receive the same slot, and
//! slot numbers are dense and gapless from 0. Once the target fills, `done`
//! latches true and later candidates are discarded, not queued.
//!
//! Results land in per-slot `OnceLock` cells — each written exactly once, by
//! the worker that claimed the slot, after the lock is released. Output order
//! is ascending slot by construction; nothing is ever sorted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

use anyhow::{anyhow, Result};
use rug::Integer;

/// One qualifying candidate, pinned to its ordinal slot. Immutable once
/// created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Ordinal position in [0, target), assigned in allocation order.
    pub slot: usize,
    /// The sampled value.
    pub value: Integer,
    /// Exact divisor count (odd mode only).
    pub factor_count: Option<u64>,
}

/// Shared state of one search: the slot counter, the done latch, and the
/// result cells. Created fresh per search, shared by all its workers.
pub struct SlotAllocator {
    target: usize,
    next_slot: Mutex<usize>,
    done: AtomicBool,
    cells: Vec<OnceLock<SearchResult>>,
}

impl SlotAllocator {
    /// target must be >= 1 (enforced by `SearchConfig`).
    pub fn new(target: usize) -> Self {
        SlotAllocator {
            target,
            next_slot: Mutex::new(0),
            done: AtomicBool::new(false),
            cells: (0..target).map(|_| OnceLock::new()).collect(),
        }
    }

    /// Cheap completion check for workers between candidates. The flag only
    /// ever goes false -> true.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Claim the next slot for a qualifying candidate, or discard it if the
    /// target is already filled. Returns the assigned slot.
    ///
    /// The lock is held only for the check-assign-increment; the result cell
    /// is written afterwards, since the claimed slot is exclusively ours.
    pub fn try_allocate(&self, value: Integer, factor_count: Option<u64>) -> Option<usize> {
        let slot = {
            let mut next = self.next_slot.lock().unwrap();
            if self.done.load(Ordering::Relaxed) {
                return None;
            }
            let slot = *next;
            *next += 1;
            if *next == self.target {
                self.done.store(true, Ordering::Release);
            }
            slot
        };
        let result = SearchResult {
            slot,
            value,
            factor_count,
        };
        if self.cells[slot].set(result).is_err() {
            unreachable!("slot {} allocated twice", slot);
        }
        Some(slot)
    }

    /// Latch done without filling remaining slots. Used when a worker hits a
    /// fatal error and the search must stop issuing work.
    pub fn abort(&self) {
        self.done.store(true, Ordering::Release);
    }

    /// Consume the allocator and return results ordered by slot. Errors if
    /// any slot was never filled (an aborted search).
    pub fn into_results(self) -> Result<Vec<SearchResult>> {
        self.cells
            .into_iter()
            .enumerate()
            .map(|(slot, cell)| {
                cell.into_inner()
                    .ok_or_else(|| anyhow!("slot {} was never filled", slot))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn value(n: u32) -> Integer {
        Integer::from(n)
    }

    #[test]
    fn sequential_allocation_is_dense() {
        let alloc = SlotAllocator::new(3);
        assert_eq!(alloc.try_allocate(value(10), None), Some(0));
        assert_eq!(alloc.try_allocate(value(20), None), Some(1));
        assert!(!alloc.is_done());
        assert_eq!(alloc.try_allocate(value(30), None), Some(2));
        assert!(alloc.is_done());

        let results = alloc.into_results().unwrap();
        assert_eq!(results.len(), 3);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.slot, i);
        }
        assert_eq!(results[1].value, 20u32);
    }

    #[test]
    fn post_target_candidates_are_discarded() {
        let alloc = SlotAllocator::new(1);
        assert_eq!(alloc.try_allocate(value(7), Some(2)), Some(0));
        assert_eq!(alloc.try_allocate(value(9), Some(4)), None);
        assert_eq!(alloc.try_allocate(value(11), Some(2)), None);
        let results = alloc.into_results().unwrap();
        assert_eq!(results[0].value, 7u32);
        assert_eq!(results[0].factor_count, Some(2));
    }

    #[test]
    fn abort_stops_allocation_and_fails_collection() {
        let alloc = SlotAllocator::new(2);
        assert_eq!(alloc.try_allocate(value(5), None), Some(0));
        alloc.abort();
        assert!(alloc.is_done());
        assert_eq!(alloc.try_allocate(value(7), None), None);
        assert!(alloc.into_results().is_err());
    }

    /// 8 threads racing to allocate far more candidates than the target.
    /// Exactly `target` must succeed, with slots forming {0..target-1}.
    #[test]
    fn concurrent_allocation_is_dense_and_unique() {
        let target = 100;
        let alloc = Arc::new(SlotAllocator::new(target));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let alloc = Arc::clone(&alloc);
                thread::spawn(move || {
                    let mut claimed = Vec::new();
                    for i in 0..1000u32 {
                        if let Some(slot) = alloc.try_allocate(value(t * 10_000 + i), None) {
                            claimed.push(slot);
                        }
                    }
                    claimed
                })
            })
            .collect();

        let mut all_slots: Vec<usize> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all_slots.sort_unstable();
        assert_eq!(all_slots, (0..target).collect::<Vec<_>>());

        let alloc = Arc::into_inner(alloc).unwrap();
        let results = alloc.into_results().unwrap();
        assert_eq!(results.len(), target);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.slot, i, "results out of slot order");
        }
    }
}
