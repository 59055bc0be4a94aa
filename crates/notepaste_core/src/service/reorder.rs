//! Display-order maintenance for the note collection.
//!
//! # Responsibility
//! - Reassign a dense `display_order` after drag, delete and sort.
//! - Translate between visual sequences and storage sequences.
//!
//! # Invariants
//! - After any call here, the live notes carry exactly `0..N`.
//! - The full collection is rebuilt in memory and written once.
//! - Rendering direction never leaks into stored values: storage order is
//!   always ascending `display_order`.

use crate::model::note::{Note, NoteCollection, NoteId};
use crate::repo::note_repo::{sorted_by_display_order, NoteRepository, NoteResult};
use crate::store::StoreGateway;
use log::{info, warn};
use std::cmp::Ordering;
use std::collections::HashSet;

/// How a surface lays out storage order on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderDirection {
    /// `display_order == 0` is drawn first (top/left).
    #[default]
    OrderZeroFirst,
    /// `display_order == 0` is drawn last (bottom/right).
    OrderZeroLast,
}

/// Explicit sort actions offered by the manager page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCriterion {
    /// Most recently updated first.
    UpdatedDesc,
    /// Name ascending, case-insensitive.
    NameCaseInsensitive,
}

/// Returns notes in the order a surface with `direction` draws them.
pub fn render_order(mut notes: Vec<Note>, direction: RenderDirection) -> Vec<Note> {
    notes.sort_by_key(|note| (note.display_order, note.id));
    if direction == RenderDirection::OrderZeroLast {
        notes.reverse();
    }
    notes
}

/// Persists the sequence produced by a drag-reorder.
///
/// `visual_ids` is the on-screen order after the drop. Unknown and repeated
/// ids are skipped; live notes missing from the sequence are drawn after the
/// listed ones, in their current on-screen order, for either direction.
pub fn apply_visual_order<S: StoreGateway>(
    repo: &mut NoteRepository<S>,
    visual_ids: &[NoteId],
    direction: RenderDirection,
) -> NoteResult<Vec<Note>> {
    let collection = repo.load_collection()?;
    let current_visual: Vec<NoteId> =
        render_order(collection.values().cloned().collect(), direction)
            .into_iter()
            .map(|note| note.id)
            .collect();

    let mut sequence = complete_sequence(&collection, visual_ids, &current_visual);
    if direction == RenderDirection::OrderZeroLast {
        sequence.reverse();
    }
    persist_sequence(repo, collection, &sequence, "drag")
}

/// Closes gaps left by deletes, keeping current relative order.
pub fn close_gaps<S: StoreGateway>(repo: &mut NoteRepository<S>) -> NoteResult<Vec<Note>> {
    let collection = repo.load_collection()?;
    let sequence: Vec<NoteId> = sorted_by_display_order(collection.clone())
        .into_iter()
        .map(|note| note.id)
        .collect();
    persist_sequence(repo, collection, &sequence, "close_gaps")
}

/// Sorts the visual sequence by `criterion` and persists it.
///
/// The sort is stable: notes with equal keys keep their prior on-screen
/// order.
pub fn sort_by<S: StoreGateway>(
    repo: &mut NoteRepository<S>,
    criterion: SortCriterion,
    direction: RenderDirection,
) -> NoteResult<Vec<Note>> {
    let collection = repo.load_collection()?;
    let mut visual = render_order(collection.values().cloned().collect(), direction);
    visual.sort_by(|left, right| compare_by(criterion, left, right));

    let mut sequence: Vec<NoteId> = visual.into_iter().map(|note| note.id).collect();
    if direction == RenderDirection::OrderZeroLast {
        sequence.reverse();
    }
    persist_sequence(repo, collection, &sequence, criterion_label(criterion))
}

/// Returns whether `notes` carry exactly `0..notes.len()`.
pub fn is_dense(notes: &[Note]) -> bool {
    let mut orders: Vec<u32> = notes.iter().map(|note| note.display_order).collect();
    orders.sort_unstable();
    orders
        .iter()
        .enumerate()
        .all(|(position, order)| *order as usize == position)
}

fn compare_by(criterion: SortCriterion, left: &Note, right: &Note) -> Ordering {
    match criterion {
        SortCriterion::UpdatedDesc => {
            match (left.updated_at_parsed(), right.updated_at_parsed()) {
                (Some(l), Some(r)) => r.cmp(&l),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
        SortCriterion::NameCaseInsensitive => {
            left.name.to_lowercase().cmp(&right.name.to_lowercase())
        }
    }
}

fn criterion_label(criterion: SortCriterion) -> &'static str {
    match criterion {
        SortCriterion::UpdatedDesc => "sort_updated",
        SortCriterion::NameCaseInsensitive => "sort_name",
    }
}

fn complete_sequence(
    collection: &NoteCollection,
    requested: &[NoteId],
    current: &[NoteId],
) -> Vec<NoteId> {
    let mut seen = HashSet::with_capacity(collection.len());
    let mut sequence = Vec::with_capacity(collection.len());
    for id in requested {
        if !collection.contains_key(id) {
            warn!("event=note_reorder module=reorder status=skipped reason=unknown_id id={id}");
            continue;
        }
        if seen.insert(*id) {
            sequence.push(*id);
        }
    }
    for id in current {
        if seen.insert(*id) {
            sequence.push(*id);
        }
    }
    sequence
}

fn persist_sequence<S: StoreGateway>(
    repo: &mut NoteRepository<S>,
    mut collection: NoteCollection,
    sequence: &[NoteId],
    trigger: &'static str,
) -> NoteResult<Vec<Note>> {
    let mut changed = 0usize;
    for (position, id) in sequence.iter().enumerate() {
        if let Some(note) = collection.get_mut(id) {
            let order = u32::try_from(position).unwrap_or(u32::MAX);
            if note.display_order != order {
                note.display_order = order;
                changed += 1;
            }
        }
    }

    repo.save_collection(&collection)?;
    info!(
        "event=note_reorder module=reorder status=ok trigger={} total={} changed={}",
        trigger,
        collection.len(),
        changed
    );
    Ok(sorted_by_display_order(collection))
}

#[cfg(test)]
mod tests {
    use super::{is_dense, render_order, RenderDirection};
    use crate::model::note::Note;

    fn note(id: u64, order: u32) -> Note {
        let mut note = Note::new(id, format!("text {id}"), None);
        note.display_order = order;
        note
    }

    #[test]
    fn dense_check_detects_gaps_and_duplicates() {
        assert!(is_dense(&[note(0, 1), note(1, 0)]));
        assert!(!is_dense(&[note(0, 0), note(1, 2)]));
        assert!(!is_dense(&[note(0, 0), note(1, 0)]));
        assert!(is_dense(&[]));
    }

    #[test]
    fn render_order_reverses_for_zero_last_surfaces() {
        let notes = vec![note(5, 2), note(6, 0), note(7, 1)];
        let first: Vec<u64> = render_order(notes.clone(), RenderDirection::OrderZeroFirst)
            .iter()
            .map(|n| n.id)
            .collect();
        let last: Vec<u64> = render_order(notes, RenderDirection::OrderZeroLast)
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(first, vec![6, 7, 5]);
        assert_eq!(last, vec![5, 7, 6]);
    }
}
