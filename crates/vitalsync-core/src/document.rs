//! Knowledge documents and the ordered document store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CoreError;

/// Category of a knowledge document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "Lab Report")]
    LabReport,
    #[serde(rename = "Diet Plan")]
    DietPlan,
    #[serde(rename = "Workout Routine")]
    WorkoutRoutine,
    #[serde(rename = "Medical History")]
    MedicalHistory,
    Other,
}

impl Category {
    /// All categories, in the order the upload form offers them.
    pub const ALL: [Category; 5] = [
        Category::LabReport,
        Category::DietPlan,
        Category::WorkoutRoutine,
        Category::MedicalHistory,
        Category::Other,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Category::LabReport => "Lab Report",
            Category::DietPlan => "Diet Plan",
            Category::WorkoutRoutine => "Workout Routine",
            Category::MedicalHistory => "Medical History",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    /// Accepts the label in any case, with spaces, dashes or underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect::<String>()
            .to_lowercase();

        Category::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == normalized)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

/// A user-supplied document used as assistant context.
///
/// Documents are never edited in place: they are created from a
/// [`NewDocument`] and later removed as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeDoc {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub date_added: DateTime<Utc>,
}

/// Form payload for a new document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub category: Category,
    pub content: String,
}

impl NewDocument {
    pub fn new(category: Category, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category,
            content: content.into(),
        }
    }

    /// Reject submissions with a blank title or blank content.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(CoreError::EmptyContent);
        }
        Ok(())
    }

    /// Stamp the payload with a fresh id and the current time.
    fn into_doc(self) -> KnowledgeDoc {
        KnowledgeDoc {
            id: uuid::Uuid::new_v4().to_string(),
            title: self.title,
            content: self.content,
            category: self.category,
            date_added: Utc::now(),
        }
    }
}

/// Ordered collection of knowledge documents, newest first.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    docs: IndexMap<String, KnowledgeDoc>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `docs` in the given display order.
    ///
    /// A document whose id is already present is skipped, as
    /// [`insert`](Self::insert) would reject it.
    pub fn with_documents(docs: impl IntoIterator<Item = KnowledgeDoc>) -> Self {
        let mut store = Self::new();
        for doc in docs {
            if store.docs.contains_key(&doc.id) {
                warn!("Skipping document with duplicate id {}", doc.id);
                continue;
            }
            store.docs.insert(doc.id.clone(), doc);
        }
        store
    }

    /// Validate and prepend a new document, returning the stored record.
    pub fn add(&mut self, new: NewDocument) -> Result<&KnowledgeDoc, CoreError> {
        new.validate()?;
        self.insert(new.into_doc())
    }

    /// Prepend an already-built document.
    pub fn insert(&mut self, doc: KnowledgeDoc) -> Result<&KnowledgeDoc, CoreError> {
        if self.docs.contains_key(&doc.id) {
            return Err(CoreError::DuplicateId(doc.id));
        }

        debug!("Adding document {} ({})", doc.id, doc.category);
        self.docs.shift_insert(0, doc.id.clone(), doc);

        Ok(&self.docs[0])
    }

    /// Remove the document with `id`. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &str) -> Option<KnowledgeDoc> {
        let removed = self.docs.shift_remove(id);
        if removed.is_some() {
            debug!("Removed document {}", id);
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeDoc> {
        self.docs.get(id)
    }

    /// Documents in display order.
    pub fn iter(&self) -> impl Iterator<Item = &KnowledgeDoc> {
        self.docs.values()
    }

    /// The `n` most recently added documents.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &KnowledgeDoc> {
        self.docs.values().take(n)
    }

    pub fn ids(&self) -> Vec<String> {
        self.docs.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Owned copy of the documents in display order.
    pub fn snapshot(&self) -> Vec<KnowledgeDoc> {
        self.docs.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_category_parse() {
        assert_eq!("Lab Report".parse::<Category>(), Ok(Category::LabReport));
        assert_eq!("diet-plan".parse::<Category>(), Ok(Category::DietPlan));
        assert_eq!("WORKOUT_ROUTINE".parse::<Category>(), Ok(Category::WorkoutRoutine));
        assert_eq!(" other ".parse::<Category>(), Ok(Category::Other));
        assert!(matches!(
            "xray".parse::<Category>(),
            Err(CoreError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_category_serde_uses_label() {
        let json = serde_json::to_string(&Category::MedicalHistory).unwrap();
        assert_eq!(json, "\"Medical History\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::MedicalHistory);
    }

    #[test]
    fn test_add_prepends() {
        let mut store = DocumentStore::with_documents(seed::initial_documents());
        let id = store
            .add(NewDocument::new(Category::Other, "Sleep notes", "Wakes at 3am"))
            .unwrap()
            .id
            .clone();

        assert_eq!(store.len(), 3);
        assert_eq!(store.iter().next().unwrap().id, id);
        assert_eq!(store.ids()[1..], ["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_add_generates_unique_ids() {
        let mut store = DocumentStore::new();
        let a = store
            .add(NewDocument::new(Category::Other, "A", "a"))
            .unwrap()
            .id
            .clone();
        let b = store
            .add(NewDocument::new(Category::Other, "A", "a"))
            .unwrap()
            .id
            .clone();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_rejects_blank_fields() {
        let mut store = DocumentStore::new();
        assert_eq!(
            store.add(NewDocument::new(Category::Other, "  ", "content")).err(),
            Some(CoreError::EmptyTitle)
        );
        assert_eq!(
            store.add(NewDocument::new(Category::Other, "title", "\n")).err(),
            Some(CoreError::EmptyContent)
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_then_remove_restores_order() {
        let mut store = DocumentStore::with_documents(seed::initial_documents());
        let before = store.snapshot();

        let id = store
            .add(NewDocument::new(Category::DietPlan, "Low sodium", "Under 2g/day"))
            .unwrap()
            .id
            .clone();
        let removed = store.remove(&id).unwrap();

        assert_eq!(removed.title, "Low sodium");
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = DocumentStore::with_documents(seed::initial_documents());
        assert!(store.remove("1").is_some());
        assert!(store.remove("1").is_none());
        assert!(store.remove("missing").is_none());
        assert_eq!(store.ids(), vec!["2".to_string()]);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut store = DocumentStore::with_documents(seed::initial_documents());
        let dup = store.get("1").cloned().unwrap();
        assert_eq!(
            store.insert(dup).err(),
            Some(CoreError::DuplicateId("1".to_string()))
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_with_documents_keeps_first_of_duplicates() {
        let mut docs = seed::initial_documents();
        let mut dup = docs[0].clone();
        dup.title = "Shadowed".to_string();
        docs.push(dup);

        let store = DocumentStore::with_documents(docs);
        assert_eq!(store.ids(), vec!["1".to_string(), "2".to_string()]);
        assert_ne!(store.get("1").unwrap().title, "Shadowed");
    }

    #[test]
    fn test_recent_takes_newest() {
        let mut store = DocumentStore::with_documents(seed::initial_documents());
        store
            .add(NewDocument::new(Category::WorkoutRoutine, "5x5", "Squat, bench"))
            .unwrap();
        store
            .add(NewDocument::new(Category::MedicalHistory, "Asthma", "Mild"))
            .unwrap();

        let titles: Vec<_> = store.recent(3).map(|d| d.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Asthma", "5x5", "Recent Blood Work (Cholesterol)"]
        );
    }
}
