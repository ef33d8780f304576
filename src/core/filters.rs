use crate::models::{Candidate, Category, ScoreResult};
use serde::{Deserialize, Serialize};

/// Minimum score, exclusive, a candidate must beat to enter a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub training: u8,
    pub playdate: u8,
    pub dog_park: u8,
    pub competition: u8,
    pub playmate: u8,
    pub general: u8,
}

impl Thresholds {
    /// One threshold regardless of category, as the top-picks view uses
    pub fn flat(threshold: u8) -> Self {
        Self {
            training: threshold,
            playdate: threshold,
            dog_park: threshold,
            competition: threshold,
            playmate: threshold,
            general: threshold,
        }
    }

    pub fn for_category(&self, category: Category) -> u8 {
        match category {
            Category::Training => self.training,
            Category::Playdate => self.playdate,
            Category::DogPark => self.dog_park,
            Category::Competition => self.competition,
            Category::Playmate => self.playmate,
            Category::General => self.general,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            training: 30,
            playdate: 40,
            dog_park: 20,
            competition: 50,
            playmate: 50,
            general: 50,
        }
    }
}

/// Which candidates are eligible to be scored at all
#[derive(Debug, Clone, Default)]
pub struct CandidateQuery {
    /// The subject dog, never offered as its own playmate
    pub subject_id: String,
    pub exclude_ids: Vec<String>,
    pub category: Option<Category>,
}

/// Check if a candidate is within the query constraints
///
/// Runs before scoring.
#[inline]
pub fn matches_query(candidate: &Candidate, query: &CandidateQuery) -> bool {
    if let Candidate::OtherDog(other) = candidate {
        if !query.subject_id.is_empty() && other.id == query.subject_id {
            return false;
        }
    }

    if query.exclude_ids.iter().any(|id| id == candidate.id()) {
        return false;
    }

    if let Some(category) = query.category {
        if candidate.category() != category {
            return false;
        }
    }

    true
}

/// Gates scored candidates by disqualification and per-category threshold
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateFilter {
    thresholds: Thresholds,
}

impl CandidateFilter {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Disqualified results never pass. Others must be strictly above the threshold.
    #[inline]
    pub fn admits(&self, category: Category, result: &ScoreResult) -> bool {
        !result.disqualified && result.score > self.thresholds.for_category(category)
    }
}
