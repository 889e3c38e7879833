//! In-memory record store, one per record type

use serde::Serialize;

use crate::core::entity::{Assignment, FieldError, Record};
use crate::core::identity::{IdGenerator, RecordId};

/// A stored record paired with its id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry<T> {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Entry<T> {
    pub fn new(id: RecordId, record: T) -> Self {
        Self { id, record }
    }
}

/// Ordered collection of records of one type
///
/// Records keep their insertion order; updates replace a record in place.
/// Updates and deletes of an absent id leave the store untouched.
#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    entries: Vec<Entry<T>>,
    ids: IdGenerator,
}

impl<T: Record> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> RecordStore<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            ids: IdGenerator::new(),
        }
    }

    /// Build a store holding pre-existing entries
    pub fn seeded(entries: Vec<Entry<T>>) -> Self {
        let mut ids = IdGenerator::new();
        for entry in &entries {
            ids.observe(entry.id);
        }
        Self { entries, ids }
    }

    pub fn list(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: RecordId) -> Option<&Entry<T>> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Append a record under a freshly generated id
    pub fn create(&mut self, draft: T) -> &Entry<T> {
        let mut id = self.ids.next();
        while self.contains(id) {
            id = self.ids.next();
        }
        tracing::debug!(kind = T::KIND, %id, "created record");
        self.entries.push(Entry::new(id, draft));
        let last = self.entries.len() - 1;
        &self.entries[last]
    }

    /// Replace the record with `id`, keeping its position
    pub fn update(&mut self, id: RecordId, record: T) -> Option<&Entry<T>> {
        let Some(index) = self.position(id) else {
            tracing::debug!(kind = T::KIND, %id, "update skipped, no such record");
            return None;
        };
        self.entries[index].record = record;
        tracing::debug!(kind = T::KIND, %id, "updated record");
        Some(&self.entries[index])
    }

    /// Apply field assignments to the record with `id`
    ///
    /// Assignments are staged on a copy; the stored record only changes when
    /// every assignment was accepted.
    pub fn apply(
        &mut self,
        id: RecordId,
        assignments: &[Assignment],
    ) -> Result<Option<&Entry<T>>, FieldError> {
        let Some(current) = self.get(id) else {
            return Ok(None);
        };
        let mut staged = current.record.clone();
        for assignment in assignments {
            staged.set_field(&assignment.field, &assignment.value)?;
        }
        Ok(self.update(id, staged))
    }

    /// Remove the record with `id`, returning it if it was present
    pub fn delete(&mut self, id: RecordId) -> Option<Entry<T>> {
        let index = self.position(id)?;
        tracing::debug!(kind = T::KIND, %id, "deleted record");
        Some(self.entries.remove(index))
    }

    /// Remove every record matching `pred`, preserving the order of the rest
    pub fn delete_where<F>(&mut self, mut pred: F) -> Vec<Entry<T>>
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.entries).into_iter().partition(|e| pred(e));
        self.entries = kept;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::part::{Part, PartCategory};

    fn part(name: &str, quantity: u32) -> Part {
        Part {
            name: name.to_string(),
            part_number: format!("PN-{}", name),
            category: PartCategory::Engine,
            supplier: "Acme".to_string(),
            quantity,
            min_quantity: 5,
            unit_price: 10.0,
            location: "A-1".to_string(),
            description: None,
        }
    }

    fn store() -> RecordStore<Part> {
        RecordStore::seeded(vec![
            Entry::new(RecordId::new(1), part("bolt", 10)),
            Entry::new(RecordId::new(2), part("nut", 3)),
            Entry::new(RecordId::new(3), part("washer", 7)),
        ])
    }

    #[test]
    fn test_create_appends_one_record_with_fresh_id() {
        let mut store = store();
        let before: Vec<RecordId> = store.list().iter().map(|e| e.id).collect();

        let draft = part("rivet", 100);
        let created = store.create(draft.clone()).clone();

        assert_eq!(store.len(), 4);
        assert_eq!(created.record, draft);
        assert!(!before.contains(&created.id));
        assert_eq!(store.list().last().unwrap().id, created.id);
    }

    #[test]
    fn test_rapid_creates_get_distinct_ids() {
        let mut store: RecordStore<Part> = RecordStore::new();
        let a = store.create(part("a", 1)).id;
        let b = store.create(part("b", 1)).id;
        let c = store.create(part("c", 1)).id;
        assert!(a != b && b != c && a != c);
    }

    #[test]
    fn test_update_only_touches_target() {
        let mut store = store();
        let others: Vec<_> = store
            .list()
            .iter()
            .filter(|e| e.id != RecordId::new(2))
            .cloned()
            .collect();

        let updated = store.update(RecordId::new(2), part("nut", 50)).cloned();
        assert_eq!(updated.unwrap().record.quantity, 50);
        assert_eq!(store.list()[1].id, RecordId::new(2));

        let after: Vec<_> = store
            .list()
            .iter()
            .filter(|e| e.id != RecordId::new(2))
            .cloned()
            .collect();
        assert_eq!(others, after);
    }

    #[test]
    fn test_update_absent_id_is_noop() {
        let mut store = store();
        let before = store.list().to_vec();
        assert!(store.update(RecordId::new(99), part("ghost", 1)).is_none());
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_delete_preserves_order_and_is_idempotent() {
        let mut store = store();
        assert!(store.delete(RecordId::new(2)).is_some());
        let once = store.list().to_vec();
        assert!(store.delete(RecordId::new(2)).is_none());
        assert_eq!(store.list(), once.as_slice());

        let ids: Vec<u64> = store.list().iter().map(|e| e.id.value()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let mut store = store();
        let assignments = vec![
            "quantity=42".parse().unwrap(),
            "category=not-a-category".parse().unwrap(),
        ];
        assert!(store.apply(RecordId::new(1), &assignments).is_err());
        assert_eq!(store.get(RecordId::new(1)).unwrap().record.quantity, 10);

        let ok = vec!["quantity=42".parse().unwrap()];
        let entry = store.apply(RecordId::new(1), &ok).unwrap().unwrap();
        assert_eq!(entry.record.quantity, 42);
    }

    #[test]
    fn test_delete_where_keeps_remaining_order() {
        let mut store = store();
        let removed = store.delete_where(|e| e.record.quantity < 8);
        assert_eq!(removed.len(), 2);
        let ids: Vec<u64> = store.list().iter().map(|e| e.id.value()).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_seeded_ids_are_never_reissued() {
        let mut store = RecordStore::seeded(vec![Entry::new(RecordId::new(u64::MAX - 1), part("big", 1))]);
        let id = store.create(part("next", 1)).id;
        assert_eq!(id, RecordId::new(u64::MAX));
    }
}
