//! Immutable record store with id and category indices
use crate::error::{Result, TechfindError};
use crate::technique::Technique;
use std::collections::HashMap;
use std::sync::Arc;

/// A technique together with the case-folded copies of its searchable fields.
#[derive(Debug)]
pub struct StoredTechnique {
    pub technique: Arc<Technique>,
    pub name_folded: String,
    pub description_folded: String,
    pub category_folded: String,
}

impl StoredTechnique {
    fn new(technique: Technique) -> Self {
        Self {
            name_folded: technique.name.to_lowercase(),
            description_folded: technique.description.to_lowercase(),
            category_folded: technique.category.to_lowercase(),
            technique: Arc::new(technique),
        }
    }
}

/// All techniques of one loaded corpus. Never mutated after construction;
/// a reload builds a new store.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<StoredTechnique>,
    by_id: HashMap<String, usize>,
    by_category: HashMap<String, Vec<usize>>,
    // display spelling of each folded category key, first seen wins
    category_names: HashMap<String, String>,
}

impl RecordStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the store and its indices. Fails on a duplicate id.
    pub fn new(techniques: Vec<Technique>) -> Result<Self> {
        let mut store = Self::default();
        store.records.reserve(techniques.len());

        for technique in techniques {
            let index = store.records.len();
            if store.by_id.contains_key(&technique.id) {
                return Err(TechfindError::DuplicateId(technique.id));
            }
            store.by_id.insert(technique.id.clone(), index);

            let stored = StoredTechnique::new(technique);
            store
                .category_names
                .entry(stored.category_folded.clone())
                .or_insert_with(|| stored.technique.category.clone());
            store
                .by_category
                .entry(stored.category_folded.clone())
                .or_default()
                .push(index);
            store.records.push(stored);
        }

        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in corpus order.
    pub fn records(&self) -> &[StoredTechnique] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Technique>> {
        self.by_id.get(id).map(|&i| &self.records[i].technique)
    }

    /// Case-insensitive; unknown categories yield an empty list.
    pub fn by_category(&self, category: &str) -> Vec<Arc<Technique>> {
        self.by_category
            .get(&category.to_lowercase())
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| Arc::clone(&self.records[i].technique))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Distinct categories, sorted lexicographically.
    pub fn categories(&self) -> Vec<String> {
        let mut names: Vec<String> = self.category_names.values().cloned().collect();
        names.sort();
        names
    }
}
