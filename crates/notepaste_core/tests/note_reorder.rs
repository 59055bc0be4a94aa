use notepaste_core::service::reorder::is_dense;
use notepaste_core::{
    MemoryStore, Note, NoteService, RenderDirection, SortCriterion, StoreGateway, StoreKey,
};
use serde_json::json;

fn service_with(direction: RenderDirection, texts: &[&str]) -> NoteService<MemoryStore> {
    let mut service = NoteService::with_direction(MemoryStore::new(), direction);
    service.bootstrap().unwrap();
    for text in texts {
        service.create_note(text, None).unwrap();
    }
    service
}

fn ids(notes: &[Note]) -> Vec<u64> {
    notes.iter().map(|note| note.id).collect()
}

#[test]
fn display_order_stays_dense_across_creates_and_deletes() {
    let mut service = service_with(RenderDirection::OrderZeroFirst, &["a", "b", "c", "d"]);

    service.delete_note(1).unwrap();
    assert!(is_dense(&service.list_notes().unwrap()));

    service.create_note("e", None).unwrap();
    service.delete_note(3).unwrap();
    service.delete_note(0).unwrap();

    let notes = service.list_notes().unwrap();
    assert!(is_dense(&notes));
    assert_eq!(ids(&notes), vec![4, 2]);
}

#[test]
fn drag_persists_visual_order_when_zero_renders_first() {
    let mut service = service_with(RenderDirection::OrderZeroFirst, &["a", "b", "c"]);
    assert_eq!(ids(&service.visual_notes().unwrap()), vec![2, 1, 0]);

    let stored = service.reorder(&[0, 2, 1]).unwrap();
    assert_eq!(ids(&stored), vec![0, 2, 1]);
    assert_eq!(ids(&service.visual_notes().unwrap()), vec![0, 2, 1]);
    assert!(is_dense(&stored));
}

#[test]
fn drag_persists_visual_order_when_zero_renders_last() {
    let mut service = service_with(RenderDirection::OrderZeroLast, &["a", "b", "c"]);
    assert_eq!(ids(&service.visual_notes().unwrap()), vec![0, 1, 2]);

    service.reorder(&[2, 0, 1]).unwrap();

    assert_eq!(ids(&service.visual_notes().unwrap()), vec![2, 0, 1]);
    let stored = service.list_notes().unwrap();
    assert_eq!(ids(&stored), vec![1, 0, 2]);
    assert_eq!(stored[0].display_order, 0);
}

#[test]
fn drag_with_partial_or_unknown_ids_keeps_every_note() {
    let mut service = service_with(RenderDirection::OrderZeroFirst, &["a", "b", "c", "d"]);

    let stored = service.reorder(&[0, 77, 0]).unwrap();
    assert_eq!(ids(&stored), vec![0, 3, 2, 1]);
    assert!(is_dense(&stored));
}

#[test]
fn unlisted_notes_render_after_dragged_ones_in_both_directions() {
    let mut last = service_with(RenderDirection::OrderZeroLast, &["a", "b", "c"]);
    assert_eq!(ids(&last.visual_notes().unwrap()), vec![0, 1, 2]);
    last.reorder(&[1]).unwrap();
    assert_eq!(ids(&last.visual_notes().unwrap()), vec![1, 0, 2]);
    assert!(is_dense(&last.list_notes().unwrap()));

    let mut first = service_with(RenderDirection::OrderZeroFirst, &["a", "b", "c"]);
    assert_eq!(ids(&first.visual_notes().unwrap()), vec![2, 1, 0]);
    first.reorder(&[0]).unwrap();
    assert_eq!(ids(&first.visual_notes().unwrap()), vec![0, 2, 1]);
}

#[test]
fn reorder_writes_the_collection_once() {
    let mut service = service_with(RenderDirection::OrderZeroFirst, &["a", "b", "c"]);
    let before = service.repo().store().write_batches();

    service.reorder(&[1, 0, 2]).unwrap();
    assert_eq!(service.repo().store().write_batches(), before + 1);
}

#[test]
fn sort_by_name_is_case_insensitive_and_stable() {
    let mut service = service_with(RenderDirection::OrderZeroFirst, &[]);
    for name in ["beta", "Alpha", "alpha", "Gamma"] {
        service.create_note("body", Some(name)).unwrap();
    }
    // Visual order before sorting: Gamma, alpha, Alpha, beta.
    let sorted = service.sort(SortCriterion::NameCaseInsensitive).unwrap();

    let names: Vec<&str> = sorted.iter().map(|note| note.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "Alpha", "beta", "Gamma"]);
    assert!(is_dense(&sorted));
}

#[test]
fn sort_by_name_respects_render_direction() {
    let mut service = service_with(RenderDirection::OrderZeroLast, &[]);
    for name in ["b", "c", "a"] {
        service.create_note("body", Some(name)).unwrap();
    }

    service.sort(SortCriterion::NameCaseInsensitive).unwrap();
    let visual = service.visual_notes().unwrap();
    let names: Vec<&str> = visual.iter().map(|note| note.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn sort_by_updated_puts_recent_first_and_unparsed_last() {
    let mut store = MemoryStore::new();
    store
        .set_many(vec![
            (
                StoreKey::Notes,
                json!({
                    "0": { "id": 0, "text": "x", "name": "old", "updatedAt": "2024-01-01 08:00:00", "displayOrder": 0 },
                    "1": { "id": 1, "text": "x", "name": "broken", "updatedAt": "yesterday", "displayOrder": 1 },
                    "2": { "id": 2, "text": "x", "name": "new", "updatedAt": "2024-03-05 10:30:00", "displayOrder": 2 },
                    "3": { "id": 3, "text": "x", "name": "mid", "updatedAt": "2024-02-10 12:00:00", "displayOrder": 3 }
                }),
            ),
            (StoreKey::NoteCounter, json!(4)),
        ])
        .unwrap();
    let mut service = NoteService::new(store);

    let sorted = service.sort(SortCriterion::UpdatedDesc).unwrap();
    assert_eq!(ids(&sorted), vec![2, 3, 0, 1]);
}

#[test]
fn create_repairs_sparse_orders_from_older_data() {
    let mut store = MemoryStore::new();
    store
        .set(
            StoreKey::Notes,
            json!({
                "0": { "id": 0, "text": "x", "displayOrder": 3 },
                "1": { "id": 1, "text": "y", "displayOrder": 7 }
            }),
        )
        .unwrap();
    let mut service = NoteService::new(store);

    let created = service.create_note("z", None).unwrap().unwrap();
    let notes = service.list_notes().unwrap();
    assert!(is_dense(&notes));
    assert_eq!(ids(&notes), vec![created.id, 0, 1]);
}
