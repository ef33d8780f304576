use crate::models::{Candidate, DogProfile};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when reading or writing stored entities
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Anything stored under a string id
pub trait Entity: Clone {
    fn entity_id(&self) -> &str;
    fn assign_id(&mut self, id: String);
}

impl Entity for DogProfile {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Entity for Candidate {
    fn entity_id(&self) -> &str {
        self.id()
    }

    fn assign_id(&mut self, id: String) {
        match self {
            Candidate::Event(activity)
            | Candidate::TrainingClass(activity)
            | Candidate::DogParkMeetup(activity) => activity.id = id,
            Candidate::OtherDog(dog) => dog.id = id,
        }
    }
}

/// Storage seam the engine's callers read from
pub trait Repository<T: Entity> {
    fn list(&self) -> Vec<T>;
    fn get(&self, id: &str) -> Result<T, RepositoryError>;
    /// Insert or replace. Entities without an id get a fresh one, which is returned.
    fn save(&mut self, entity: T) -> Result<String, RepositoryError>;
}

/// Insertion-ordered in-memory store
#[derive(Debug, Clone)]
pub struct InMemoryRepository<T> {
    items: Vec<T>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    fn list(&self) -> Vec<T> {
        self.items.clone()
    }

    fn get(&self, id: &str) -> Result<T, RepositoryError> {
        self.items
            .iter()
            .find(|item| item.entity_id() == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    fn save(&mut self, mut entity: T) -> Result<String, RepositoryError> {
        if entity.entity_id().is_empty() {
            entity.assign_id(uuid::Uuid::new_v4().to_string());
        }
        let id = entity.entity_id().to_string();

        match self.items.iter_mut().find(|item| item.entity_id() == id) {
            Some(existing) => *existing = entity,
            None => self.items.push(entity),
        }

        tracing::trace!("Saved entity {}", id);
        Ok(id)
    }
}

/// Dogs and candidates as exported from the app's storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub dogs: Vec<DogProfile>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl Dataset {
    pub fn from_json(json: &str) -> Result<Self, RepositoryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let dataset = Self::from_json(&json)?;
        tracing::debug!(
            "Loaded {} dogs and {} candidates from {}",
            dataset.dogs.len(),
            dataset.candidates.len(),
            path.as_ref().display()
        );
        Ok(dataset)
    }

    pub fn into_repositories(
        self,
    ) -> (InMemoryRepository<DogProfile>, InMemoryRepository<Candidate>) {
        (
            InMemoryRepository::with_items(self.dogs),
            InMemoryRepository::with_items(self.candidates),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"{
        "dogs": [
            {"id": "rex", "name": "Rex", "breed": "Labrador Mix", "age": 3, "energyLevel": "High"}
        ],
        "candidates": [
            {"type": "trainingClass", "id": "c1", "title": "Puppy basics",
             "requirements": {"minAge": 1, "ageUnit": "years", "trainingLevel": "Beginner"}},
            {"type": "event", "id": "e1", "title": "Lake day", "category": "dogPark",
             "tags": ["Water access"], "startsAt": "2026-06-01T10:00:00Z"},
            {"type": "otherDog", "id": "bella", "breed": "Beagle", "age": 2.5,
             "energyLevel": "Medium"}
        ]
    }"#;

    #[test]
    fn test_dataset_parses() {
        let dataset = Dataset::from_json(DATASET).unwrap();

        assert_eq!(dataset.dogs.len(), 1);
        assert_eq!(dataset.candidates.len(), 3);
        match &dataset.candidates[0] {
            Candidate::TrainingClass(class) => {
                assert_eq!(class.requirements.age.min, Some(1.0));
                assert_eq!(class.requirements.age.unit, Some(crate::models::AgeUnit::Years));
            }
            other => panic!("unexpected candidate {:?}", other),
        }
        assert_eq!(dataset.candidates[2].id(), "bella");
    }

    #[test]
    fn test_get_and_missing() {
        let (dogs, _) = Dataset::from_json(DATASET).unwrap().into_repositories();

        assert_eq!(dogs.get("rex").unwrap().name, "Rex");
        assert!(matches!(dogs.get("nope"), Err(RepositoryError::NotFound(_))));
    }

    #[test]
    fn test_save_assigns_id_and_replaces() {
        let (_, mut candidates) = Dataset::from_json(DATASET).unwrap().into_repositories();
        let mut class = candidates.get("c1").unwrap();

        if let Candidate::TrainingClass(activity) = &mut class {
            activity.title = "Renamed".to_string();
        }
        candidates.save(class.clone()).unwrap();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates.get("c1").unwrap().title(), "Renamed");

        class.assign_id(String::new());
        let id = candidates.save(class).unwrap();
        assert!(!id.is_empty());
        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates.list().last().unwrap().id(), id);
    }
}
