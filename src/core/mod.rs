// Core algorithm exports
pub mod attributes;
pub mod explain;
pub mod filters;
pub mod recommender;
pub mod rules;
pub mod scoring;

pub use attributes::{estimate_training_level, to_months, AttributeDeriver, BreedSizeTable};
pub use explain::{summarize, Explanation, MatchTier};
pub use filters::{matches_query, CandidateFilter, CandidateQuery, Thresholds};
pub use recommender::{RankOptions, RecommendationSet, Recommender};
pub use rules::{AgePolicy, RuleOutcome, ScoreBasis};
pub use scoring::{AgePolicies, CompatibilityScorer};
