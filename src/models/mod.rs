// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Activity, ActivityCategory, AgeRequirement, AgeUnit, Candidate, Category, DogProfile,
    DogSize, EnergyLevel, PlayStyle, Polarity, Reason, Recommendation, Requirements,
    ScoreResult, TrainingLevel,
};
pub use requests::RecommendRequest;
pub use responses::{RecommendationResponse, RecommendationView};
