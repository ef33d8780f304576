use crate::core::explain::{self, MatchTier};
use crate::models::domain::{Category, Recommendation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One recommendation as presented to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationView {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub title: String,
    pub category: Category,
    pub score: u8,
    pub tier: MatchTier,
    pub badge: String,
    pub highlights: Vec<String>,
    pub concerns: Vec<String>,
    pub reasons: Vec<String>,
}

impl From<&Recommendation> for RecommendationView {
    fn from(rec: &Recommendation) -> Self {
        let summary = explain::summarize(&rec.result);
        Self {
            candidate_id: rec.candidate.id().to_string(),
            title: rec.candidate.title().to_string(),
            category: rec.category,
            score: summary.score,
            tier: summary.tier,
            badge: summary.badge,
            highlights: summary.highlights,
            concerns: summary.concerns,
            reasons: explain::expanded(&rec.result),
        }
    }
}

/// Response for a recommendation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(rename = "dogId")]
    pub dog_id: String,
    pub all: Vec<RecommendationView>,
    pub buckets: BTreeMap<Category, Vec<RecommendationView>>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
