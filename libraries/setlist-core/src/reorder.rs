//! Sentinel-safe renumbering plans
//!
//! Every structural operation on a playlist is expressed as a sequence of
//! [`RenumberStep`]s, each of which the storage layer turns into exactly one
//! statement inside a single transaction. The plans keep two invariants:
//!
//! - after the last step, positions are exactly `1..=N` (density);
//! - after *every* step, no two live entries share a position and at most one
//!   entry sits on [`SENTINEL_POSITION`].
//!
//! The second one is what the three-step "park on the sentinel, shift, land"
//! sequence is for. Overwriting a position directly would momentarily leave
//! two entries on the same rank.
//!
//! # Example
//!
//! ```
//! use setlist_core::reorder::{plan_move, RenumberStep, SENTINEL_POSITION};
//!
//! let steps = plan_move(4, 2, 5).applied().unwrap();
//! assert_eq!(steps.first(), Some(&RenumberStep::Relocate { from: 4, to: SENTINEL_POSITION }));
//! assert_eq!(steps.last(), Some(&RenumberStep::Relocate { from: SENTINEL_POSITION, to: 2 }));
//! ```

use crate::types::{Outcome, SkipReason};
use rand::Rng;
use std::collections::BTreeSet;

/// Reserved placeholder position, disjoint from every valid `1..=N`
pub const SENTINEL_POSITION: i64 = -1;

/// One position-rewriting statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenumberStep {
    /// Move the single entry at `from` to `to`
    Relocate { from: i64, to: i64 },
    /// Add `delta` to every entry with position in `from..=to` (`None` = no upper bound)
    Shift { from: i64, to: Option<i64>, delta: i64 },
    /// Delete the entry at `position`
    Remove { position: i64 },
}

/// Plan moving the entry at `old` so it lands on `new`
///
/// `new < 0` is rejected, `new == 0` means "to the end" and anything past the
/// end is clamped to `len`. Entries strictly between the two positions shift
/// one step toward the vacated slot; everything else is untouched.
pub fn plan_move(old: i64, new: i64, len: i64) -> Outcome<Vec<RenumberStep>> {
    if new < 0 || old < 1 || old > len {
        return Outcome::Skipped(SkipReason::InvalidPosition);
    }

    // Dropped past the last row
    let new = if new == 0 { len } else { new.min(len) };
    if new == old {
        return Outcome::Skipped(SkipReason::Unchanged);
    }

    let mut steps = vec![RenumberStep::Relocate {
        from: old,
        to: SENTINEL_POSITION,
    }];

    if new < old {
        steps.push(RenumberStep::Shift {
            from: old + 1,
            to: Some(len),
            delta: -1,
        });
        steps.push(RenumberStep::Shift {
            from: new,
            to: Some(len),
            delta: 1,
        });
    } else {
        steps.push(RenumberStep::Shift {
            from: old + 1,
            to: Some(new),
            delta: -1,
        });
    }

    steps.push(RenumberStep::Relocate {
        from: SENTINEL_POSITION,
        to: new,
    });

    Outcome::Applied(steps)
}

/// Plan removing the entries at `positions`
///
/// Duplicates and out-of-range positions are dropped. Removal runs from the
/// highest position down: each removal compacts everything above it, so
/// going top-down keeps every remaining target pointing at the entry the
/// caller meant.
pub fn plan_removal(
    positions: impl IntoIterator<Item = i64>,
    len: i64,
) -> Outcome<Vec<RenumberStep>> {
    let mut requested = false;
    let targets: BTreeSet<i64> = positions
        .into_iter()
        .inspect(|_| requested = true)
        .filter(|p| (1..=len).contains(p))
        .collect();

    if targets.is_empty() {
        let reason = if requested {
            SkipReason::InvalidPosition
        } else {
            SkipReason::Unchanged
        };
        return Outcome::Skipped(reason);
    }

    let mut steps = Vec::with_capacity(targets.len() * 2);
    let mut remaining = len;
    for position in targets.into_iter().rev() {
        steps.push(RenumberStep::Remove { position });
        if position < remaining {
            steps.push(RenumberStep::Shift {
                from: position + 1,
                to: None,
                delta: -1,
            });
        }
        remaining -= 1;
    }

    Outcome::Applied(steps)
}

/// Number of entries a plan deletes
pub fn removed_count(steps: &[RenumberStep]) -> usize {
    steps
        .iter()
        .filter(|step| matches!(step, RenumberStep::Remove { .. }))
        .count()
}

/// Plan a uniform Fisher–Yates shuffle of the suffix `start..=len`
///
/// Entries before `start` are never touched. Each swap is parked on the
/// sentinel so no two entries ever share a rank; self-swaps emit nothing.
pub fn plan_shuffle<R: Rng>(
    start: i64,
    len: i64,
    rng: &mut R,
) -> Outcome<Vec<RenumberStep>> {
    let start = start.max(1);
    if len - start < 1 {
        return Outcome::Skipped(SkipReason::Unchanged);
    }

    let mut steps = Vec::new();
    for i in (start..=len).rev() {
        let r = rng.gen_range(start..=i);
        if r == i {
            continue;
        }
        steps.push(RenumberStep::Relocate {
            from: i,
            to: SENTINEL_POSITION,
        });
        steps.push(RenumberStep::Relocate { from: r, to: i });
        steps.push(RenumberStep::Relocate {
            from: SENTINEL_POSITION,
            to: r,
        });
    }

    Outcome::Applied(steps)
}

/// Clamp an insertion target into `1..=len + 1`
///
/// Non-positive targets (a drop on no particular row) and targets past the end
/// both mean "append".
pub fn clamp_insert_position(target: i64, len: i64) -> i64 {
    if target <= 0 || target > len + 1 {
        len + 1
    } else {
        target
    }
}

/// Plan opening a gap of `count` slots at `target`
///
/// Returns the first position of the gap together with the shift that opens
/// it. The caller inserts its new rows at `start..start + count` afterwards.
pub fn plan_insert(target: i64, len: i64, count: i64) -> (i64, Vec<RenumberStep>) {
    let start = clamp_insert_position(target, len);
    let steps = if start <= len && count > 0 {
        vec![RenumberStep::Shift {
            from: start,
            to: None,
            delta: count,
        }]
    } else {
        Vec::new()
    };
    (start, steps)
}
