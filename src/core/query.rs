//! Query view: search, filter and sort over a record store

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::entity::Record;
use crate::core::identity::RecordId;
use crate::core::store::{Entry, RecordStore};
use crate::entities::Aircraft;

/// Derived aircraft id -> model index
///
/// Stages and tests only store the aircraft id; the model they show and
/// search on is looked up here, so it can never drift from the aircraft.
#[derive(Debug, Clone, Default)]
pub struct Lookup {
    models: HashMap<RecordId, String>,
}

impl Lookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_aircraft(store: &RecordStore<Aircraft>) -> Self {
        let models = store
            .list()
            .iter()
            .map(|e| (e.id, e.record.model.clone()))
            .collect();
        Self { models }
    }

    pub fn aircraft_model(&self, id: RecordId) -> Option<&str> {
        self.models.get(&id).map(String::as_str)
    }

    /// Every known aircraft as `(id, model)`, ordered by id
    pub fn aircraft(&self) -> Vec<(RecordId, &str)> {
        let mut all: Vec<(RecordId, &str)> = self
            .models
            .iter()
            .map(|(id, model)| (*id, model.as_str()))
            .collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    /// Model for display, or a marker when the aircraft no longer exists
    pub fn aircraft_label(&self, id: RecordId) -> String {
        self.aircraft_model(id)
            .map(String::from)
            .unwrap_or_else(|| format!("(missing #{})", id))
    }
}

/// Sort order for query results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Field name, or `id`
    pub field: String,
    pub reverse: bool,
}

/// Search text plus categorical filters for one record type
#[derive(Debug, Clone, Default)]
pub struct Query<F> {
    pub search: String,
    pub filter: F,
    pub sort: Option<SortSpec>,
    pub limit: Option<usize>,
}

impl<F: Default> Query<F> {
    pub fn new() -> Self {
        Self {
            search: String::new(),
            filter: F::default(),
            sort: None,
            limit: None,
        }
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn filter(mut self, filter: F) -> Self {
        self.filter = filter;
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, reverse: bool) -> Self {
        self.sort = Some(SortSpec {
            field: field.into(),
            reverse,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl<F> Query<F> {
    /// Records matching the search and every active filter
    ///
    /// Results keep store order unless a sort is requested.
    pub fn apply<'a, T>(&self, entries: &'a [Entry<T>], lookup: &Lookup) -> Vec<&'a Entry<T>>
    where
        T: Record<Filter = F>,
    {
        let needle = self.search.to_lowercase();

        let mut rows: Vec<&Entry<T>> = entries
            .iter()
            .filter(|e| matches_search(&e.record, &needle, lookup))
            .filter(|e| e.record.matches(&self.filter))
            .collect();

        if let Some(ref sort) = self.sort {
            sort_entries(&mut rows, sort);
        }

        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }

        rows
    }
}

fn matches_search<T: Record>(record: &T, needle: &str, lookup: &Lookup) -> bool {
    if needle.is_empty() {
        return true;
    }
    record
        .search_fields(lookup)
        .iter()
        .any(|value| value.to_lowercase().contains(needle))
}

fn sort_entries<T: Record>(rows: &mut [&Entry<T>], sort: &SortSpec) {
    let numeric = sort.field == "id" || T::field(&sort.field).is_some_and(|f| f.is_numeric());

    rows.sort_by(|a, b| {
        let ordering = if sort.field == "id" {
            a.id.cmp(&b.id)
        } else {
            let left = a.record.get_field(&sort.field).unwrap_or_default();
            let right = b.record.get_field(&sort.field).unwrap_or_default();
            if numeric {
                compare_numbers(&left, &right)
            } else {
                left.to_lowercase().cmp(&right.to_lowercase())
            }
        };
        if sort.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_numbers(left: &str, right: &str) -> Ordering {
    let l = left.parse::<f64>().unwrap_or(f64::NEG_INFINITY);
    let r = right.parse::<f64>().unwrap_or(f64::NEG_INFINITY);
    l.partial_cmp(&r).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Choice;
    use crate::entities::aircraft::{self, AircraftCategory, AircraftFilter};
    use crate::entities::part::{self, PartCategory, PartFilter};

    #[test]
    fn test_search_gulf_finds_only_gulfstream() {
        let store = RecordStore::seeded(aircraft::seed());
        let lookup = Lookup::from_aircraft(&store);
        let rows = Query::<AircraftFilter>::new()
            .search("gulf")
            .apply(store.list(), &lookup);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.model, "Gulfstream G650");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = RecordStore::seeded(aircraft::seed());
        let lookup = Lookup::new();
        let rows = Query::<AircraftFilter>::new()
            .search("AC-2024-00")
            .apply(store.list(), &lookup);
        assert_eq!(rows.len(), 3);
        let rows = Query::<AircraftFilter>::new()
            .search("a320NEO")
            .apply(store.list(), &lookup);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_search_is_not_trimmed() {
        let store = RecordStore::seeded(aircraft::seed());
        let lookup = Lookup::new();
        let rows = Query::<AircraftFilter>::new()
            .search("gulf")
            .apply(store.list(), &lookup);
        assert_eq!(rows.len(), 1);
        let rows = Query::<AircraftFilter>::new()
            .search(" gulf")
            .apply(store.list(), &lookup);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_filter_all_equals_no_filter() {
        let store = RecordStore::seeded(part::seed());
        let lookup = Lookup::new();
        let unfiltered = Query::<PartFilter>::new().apply(store.list(), &lookup);
        let all = Query::new()
            .filter(PartFilter {
                category: Choice::All,
                low_stock: false,
            })
            .apply(store.list(), &lookup);
        assert_eq!(unfiltered, all);
        assert_eq!(all.len(), store.len());
    }

    #[test]
    fn test_category_filter_and_search_combine() {
        let store = RecordStore::seeded(part::seed());
        let lookup = Lookup::new();
        let rows = Query::new()
            .search("pump")
            .filter(PartFilter {
                category: Choice::Only(PartCategory::Hydraulic),
                low_stock: false,
            })
            .apply(store.list(), &lookup);
        assert_eq!(rows.len(), 1);

        let none = Query::new()
            .search("pump")
            .filter(PartFilter {
                category: Choice::Only(PartCategory::Engine),
                low_stock: false,
            })
            .apply(store.list(), &lookup);
        assert!(none.is_empty());
    }

    #[test]
    fn test_numeric_sort_and_limit() {
        let store = RecordStore::seeded(part::seed());
        let lookup = Lookup::new();
        let rows = Query::<PartFilter>::new()
            .sort_by("quantity", true)
            .limit(2)
            .apply(store.list(), &lookup);
        let quantities: Vec<u32> = rows.iter().map(|e| e.record.quantity).collect();
        assert_eq!(quantities, vec![50, 25]);
    }

    #[test]
    fn test_text_sort() {
        let store = RecordStore::seeded(aircraft::seed());
        let rows = Query::<AircraftFilter>::new()
            .sort_by("model", false)
            .apply(store.list(), &Lookup::new());
        let models: Vec<&str> = rows.iter().map(|e| e.record.model.as_str()).collect();
        assert_eq!(models, vec!["A320neo", "F-35 Lightning II", "Gulfstream G650"]);
    }

    #[test]
    fn test_lookup_marks_missing_aircraft() {
        let store = RecordStore::seeded(aircraft::seed());
        let lookup = Lookup::from_aircraft(&store);
        assert_eq!(lookup.aircraft_label(RecordId::new(1)), "A320neo");
        assert_eq!(lookup.aircraft_label(RecordId::new(77)), "(missing #77)");
        let ids: Vec<u64> = lookup.aircraft().iter().map(|(id, _)| id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_category_filter_on_aircraft() {
        let store = RecordStore::seeded(aircraft::seed());
        let rows = Query::new()
            .filter(AircraftFilter {
                category: Choice::Only(AircraftCategory::Military),
                ..Default::default()
            })
            .apply(store.list(), &Lookup::new());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.model, "F-35 Lightning II");
    }
}
