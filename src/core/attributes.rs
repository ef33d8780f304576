use crate::models::{AgeUnit, DogProfile, DogSize, TrainingLevel};
use serde::{Deserialize, Serialize};

pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Skill counts up to this are Beginner
const BEGINNER_MAX_SKILLS: usize = 3;
/// Skill counts up to this are Intermediate, anything above is Advanced
const INTERMEDIATE_MAX_SKILLS: usize = 8;

const SMALL_BREED_KEYWORDS: &[&str] = &[
    "chihuahua",
    "pomeranian",
    "yorkshire",
    "yorkie",
    "maltese",
    "shih tzu",
    "pug",
    "dachshund",
    "toy",
    "miniature",
    "papillon",
    "pekingese",
    "havanese",
    "bichon",
    "jack russell",
    "french bulldog",
    "boston terrier",
    "cavalier",
];

const LARGE_BREED_KEYWORDS: &[&str] = &[
    "labrador",
    "retriever",
    "shepherd",
    "rottweiler",
    "great dane",
    "mastiff",
    "bernese",
    "newfoundland",
    "doberman",
    "husky",
    "malamute",
    "boxer",
    "saint bernard",
    "akita",
    "weimaraner",
    "ridgeback",
    "pyrenees",
];

/// Breed keyword lookup used to estimate size when a profile doesn't state one
///
/// Keywords are matched as case-insensitive substrings of the breed name.
/// The small list is consulted first, so "Miniature Schnauzer" is small even
/// if a large list happened to mention "schnauzer".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreedSizeTable {
    pub small: Vec<String>,
    pub large: Vec<String>,
}

impl BreedSizeTable {
    pub fn new(small: Vec<String>, large: Vec<String>) -> Self {
        Self { small, large }
    }

    pub fn estimate(&self, breed: &str) -> DogSize {
        let breed = breed.to_lowercase();
        let matches = |keyword: &String| {
            let keyword = keyword.trim().to_lowercase();
            !keyword.is_empty() && breed.contains(&keyword)
        };

        if self.small.iter().any(matches) {
            DogSize::Small
        } else if self.large.iter().any(matches) {
            DogSize::Large
        } else {
            DogSize::Medium
        }
    }
}

impl Default for BreedSizeTable {
    fn default() -> Self {
        Self {
            small: SMALL_BREED_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            large: LARGE_BREED_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Infers attributes a profile leaves implicit
#[derive(Debug, Clone, Default)]
pub struct AttributeDeriver {
    breeds: BreedSizeTable,
}

impl AttributeDeriver {
    pub fn new(breeds: BreedSizeTable) -> Self {
        Self { breeds }
    }

    pub fn breeds(&self) -> &BreedSizeTable {
        &self.breeds
    }

    #[inline]
    pub fn estimate_size(&self, breed: &str) -> DogSize {
        self.breeds.estimate(breed)
    }

    /// Explicit size when stored, otherwise estimated from the breed
    pub fn size_of(&self, dog: &DogProfile) -> DogSize {
        dog.size.unwrap_or_else(|| self.estimate_size(&dog.breed))
    }

    /// Explicit level when stored, otherwise derived from skills
    pub fn training_level_of(&self, dog: &DogProfile) -> TrainingLevel {
        dog.training_level
            .unwrap_or_else(|| estimate_training_level(dog))
    }
}

pub fn estimate_training_level(dog: &DogProfile) -> TrainingLevel {
    match dog.skills.len() {
        n if n <= BEGINNER_MAX_SKILLS => TrainingLevel::Beginner,
        n if n <= INTERMEDIATE_MAX_SKILLS => TrainingLevel::Intermediate,
        _ => TrainingLevel::Advanced,
    }
}

/// The one place ages change units. Every requirement comparison goes through here.
#[inline]
pub fn to_months(value: f64, unit: AgeUnit) -> f64 {
    match unit {
        AgeUnit::Months => value,
        AgeUnit::Years => value * MONTHS_PER_YEAR,
    }
}

/// Profile age in years, clamped to zero
#[inline]
pub fn age_in_years(dog: &DogProfile) -> f64 {
    dog.age.max(0.0)
}

#[inline]
pub fn age_in_months(dog: &DogProfile) -> f64 {
    to_months(age_in_years(dog), AgeUnit::Years)
}
