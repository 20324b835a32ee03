//! Property-based test generators using proptest.

use entisearch_backend::{Document, EntityId};
use entisearch_core::{WorkItem, WorkKind};
use proptest::prelude::*;

/// Strategy for generating entity IDs from a small pool, so sequences
/// exercise coalescing on shared keys.
pub fn entity_id_strategy() -> impl Strategy<Value = EntityId> {
    (0u64..4).prop_map(EntityId::from)
}

/// Strategy for generating a work kind.
pub fn work_kind_strategy() -> impl Strategy<Value = WorkKind> {
    prop_oneof![
        Just(WorkKind::Add),
        Just(WorkKind::Update),
        Just(WorkKind::Delete),
    ]
}

/// Strategy for generating one work item on the given entity type.
pub fn work_item_strategy(entity_type: &'static str) -> impl Strategy<Value = WorkItem> {
    (entity_id_strategy(), work_kind_strategy(), "[a-z]{1,8}").prop_map(
        move |(id, kind, text)| {
            let document = Document::new().with_text("body", text);
            match kind {
                WorkKind::Add => WorkItem::add(entity_type, id, document),
                WorkKind::Update => WorkItem::update(entity_type, id, document),
                WorkKind::Delete => WorkItem::delete(entity_type, id),
            }
        },
    )
}

/// Strategy for generating a sequence of work items.
pub fn work_sequence_strategy(entity_type: &'static str) -> impl Strategy<Value = Vec<WorkItem>> {
    prop::collection::vec(work_item_strategy(entity_type), 0..24)
}
