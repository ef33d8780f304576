//! Pawmatch - compatibility scoring and recommendations for dog activities
//!
//! This library scores a dog profile against events, training classes, park
//! meetups and other dogs, then filters, ranks and explains the results.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use core::{AttributeDeriver, CompatibilityScorer, RankOptions, Recommender, Thresholds};
pub use models::{Candidate, Category, DogProfile, Recommendation, ScoreResult};
