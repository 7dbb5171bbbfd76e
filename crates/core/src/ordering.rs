//! Positional ordering for kanban-style lists.
//!
//! Every orderable record carries an integer `position` that is authoritative
//! for display order within its bucket (a workflow type, or the single global
//! planning list). Positions are gap-tolerant: sorting is by `position`
//! ascending with a stable tie-break on `id`, and a drag-and-drop reorder
//! rewrites the whole bucket to the contiguous sequence `0..n-1`.

use crate::types::DbId;

/// A record that participates in positional ordering.
pub trait Positioned {
    fn id(&self) -> DbId;
    fn position(&self) -> i32;
    fn set_position(&mut self, position: i32);
}

/// Sort records for display: `position` ascending, ties broken by `id`.
///
/// The `id` tie-break keeps rendering deterministic when two records end up
/// sharing a position (e.g. two clients appended concurrently).
pub fn sort_for_display<T: Positioned>(items: &mut [T]) {
    items.sort_by_key(|item| (item.position(), item.id()));
}

/// Rewrite positions to the contiguous sequence `0..n-1` in current slice
/// order. Returns the ids whose position actually changed.
pub fn sequence_positions<T: Positioned>(items: &mut [T]) -> Vec<DbId> {
    let mut changed = Vec::new();
    for (index, item) in items.iter_mut().enumerate() {
        let position = index as i32;
        if item.position() != position {
            item.set_position(position);
            changed.push(item.id());
        }
    }
    changed
}

/// Reorder `items` to match the given id order, then resequence positions.
///
/// Ids not present in `items` are ignored; items missing from `ids` keep
/// their relative order and are appended after the ordered prefix. This is
/// the client-side half of a drag-and-drop: the server receives the final
/// id list and performs the same rewrite inside a transaction.
pub fn apply_order<T: Positioned>(items: &mut Vec<T>, ids: &[DbId]) -> Vec<DbId> {
    let mut ordered = Vec::with_capacity(items.len());
    for &id in ids {
        if let Some(index) = items.iter().position(|item| item.id() == id) {
            ordered.push(items.remove(index));
        }
    }
    // Leftovers (ids the caller did not know about) go to the back.
    ordered.append(items);
    *items = ordered;
    sequence_positions(items)
}

/// Position for a record appended to a bucket with the given current maximum.
pub fn next_position(current_max: Option<i32>) -> i32 {
    current_max.map_or(0, |max| max + 1)
}
