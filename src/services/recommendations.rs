use crate::core::{RankOptions, Recommender};
use crate::models::{
    Candidate, DogProfile, RecommendRequest, RecommendationResponse, RecommendationView,
};
use crate::services::repository::{Repository, RepositoryError};
use std::collections::BTreeMap;
use thiserror::Error;
use validator::Validate;

/// Errors that can occur while serving a recommendation request
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Reads the dog and candidates from storage and runs the recommender
pub struct RecommendationService<D, C> {
    dogs: D,
    candidates: C,
    recommender: Recommender,
    max_limit: usize,
}

impl<D, C> RecommendationService<D, C>
where
    D: Repository<DogProfile>,
    C: Repository<Candidate>,
{
    pub fn new(dogs: D, candidates: C, recommender: Recommender, max_limit: usize) -> Self {
        Self {
            dogs,
            candidates,
            recommender,
            max_limit,
        }
    }

    pub fn recommend(
        &self,
        request: &RecommendRequest,
    ) -> Result<RecommendationResponse, ServiceError> {
        request.validate()?;

        let limit = (request.limit as usize).min(self.max_limit);
        tracing::info!("Recommending for dog: {}, limit: {}", request.dog_id, limit);

        let dog = self.dogs.get(&request.dog_id)?;
        let candidates = self.candidates.list();

        tracing::debug!("Scoring {} candidates for {}", candidates.len(), dog.id);

        let options = RankOptions {
            category: request.category,
            limit: Some(limit),
            exclude_ids: request.exclude_ids.clone(),
            thresholds: None,
        };

        let (all, buckets) = if request.top_picks {
            let picks = self.recommender.top_picks(&dog, &candidates, &options);
            (picks, BTreeMap::new())
        } else if let Some(category) = request.category {
            let ranked = self.recommender.rank(&dog, &candidates, &options);
            let bucket = BTreeMap::from([(category, ranked.clone())]);
            (ranked, bucket)
        } else {
            let set = self.recommender.rank_across_categories(&dog, &candidates, &options);
            (set.all, set.buckets)
        };

        let response = RecommendationResponse {
            dog_id: dog.id.clone(),
            all: all.iter().map(RecommendationView::from).collect(),
            buckets: buckets
                .iter()
                .map(|(category, recs)| {
                    (*category, recs.iter().map(RecommendationView::from).collect())
                })
                .collect(),
            total_candidates: candidates.len(),
            generated_at: chrono::Utc::now(),
        };

        tracing::info!(
            "Returning {} recommendations for dog {} (from {} candidates)",
            response.all.len(),
            response.dog_id,
            response.total_candidates
        );

        Ok(response)
    }
}
