use crate::core::{
    filters::{matches_query, CandidateFilter, CandidateQuery, Thresholds},
    scoring::CompatibilityScorer,
};
use crate::models::{Candidate, Category, DogProfile, Recommendation};
use std::collections::{BTreeMap, HashSet};

/// Per-call ranking options
#[derive(Debug, Clone, Default)]
pub struct RankOptions {
    /// Only rank candidates of this category
    pub category: Option<Category>,
    /// Maximum results per list. `None` keeps everything that passes.
    pub limit: Option<usize>,
    pub exclude_ids: Vec<String>,
    /// Overrides the recommender's configured thresholds for this call
    pub thresholds: Option<Thresholds>,
}

impl RankOptions {
    pub fn limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn category(category: Category, limit: usize) -> Self {
        Self {
            category: Some(category),
            limit: Some(limit),
            ..Self::default()
        }
    }
}

/// Recommendations bucketed by category plus the merged "All" view
#[derive(Debug, Clone, Default)]
pub struct RecommendationSet {
    pub buckets: BTreeMap<Category, Vec<Recommendation>>,
    pub all: Vec<Recommendation>,
    pub total_candidates: usize,
}

impl RecommendationSet {
    pub fn bucket(&self, category: Category) -> &[Recommendation] {
        self.buckets.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Ranking orchestrator
///
/// # Pipeline Stages
/// 1. Query pre-filter (self, excluded ids, category, duplicate ids)
/// 2. Category-specific scoring
/// 3. Disqualification and threshold gating
/// 4. Stable sort by score and truncation
#[derive(Debug, Clone)]
pub struct Recommender {
    scorer: CompatibilityScorer,
    filter: CandidateFilter,
    top_picks_threshold: u8,
}

impl Recommender {
    pub fn new(
        scorer: CompatibilityScorer,
        filter: CandidateFilter,
        top_picks_threshold: u8,
    ) -> Self {
        Self {
            scorer,
            filter,
            top_picks_threshold,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            CompatibilityScorer::default(),
            CandidateFilter::default(),
            DEFAULT_TOP_PICKS_THRESHOLD,
        )
    }

    pub fn scorer(&self) -> &CompatibilityScorer {
        &self.scorer
    }

    /// Score every eligible candidate without gating
    ///
    /// Disqualified candidates stay in the list with score 0, in input order.
    /// Useful for diagnostics and for telling "ineligible" apart from "nothing matched".
    pub fn score_all(&self, dog: &DogProfile, candidates: &[Candidate]) -> Vec<Recommendation> {
        let query = CandidateQuery {
            subject_id: dog.id.clone(),
            ..CandidateQuery::default()
        };

        candidates
            .iter()
            .filter(|candidate| matches_query(candidate, &query))
            .map(|candidate| self.recommend_one(dog, candidate))
            .collect()
    }

    /// Score, gate, sort and truncate candidates for one dog
    pub fn rank(
        &self,
        dog: &DogProfile,
        candidates: &[Candidate],
        options: &RankOptions,
    ) -> Vec<Recommendation> {
        let query = CandidateQuery {
            subject_id: dog.id.clone(),
            exclude_ids: options.exclude_ids.clone(),
            category: options.category,
        };
        let filter = options
            .thresholds
            .map(CandidateFilter::new)
            .unwrap_or(self.filter);

        let mut seen: HashSet<&str> = HashSet::new();
        let mut ranked: Vec<Recommendation> = candidates
            .iter()
            // Stage 1: Query pre-filter, first occurrence of an id wins
            .filter(|candidate| matches_query(candidate, &query))
            .filter(|&candidate| candidate.id().is_empty() || seen.insert(candidate.id()))
            // Stage 2: Score
            .map(|candidate| self.recommend_one(dog, candidate))
            // Stage 3: Gate
            .filter(|rec| {
                let admitted = filter.admits(rec.category, &rec.result);
                if !admitted {
                    tracing::trace!(
                        "Filtered {} ({}): score {}, disqualified {}",
                        rec.candidate.id(),
                        rec.category,
                        rec.result.score,
                        rec.result.disqualified
                    );
                }
                admitted
            })
            .collect();

        // Stage 4: Stable sort keeps input order among equal scores
        ranked.sort_by(|a, b| b.score().cmp(&a.score()));

        if let Some(limit) = options.limit {
            ranked.truncate(limit);
        }

        tracing::debug!(
            "Ranked {} of {} candidates for dog {}",
            ranked.len(),
            candidates.len(),
            dog.id
        );

        ranked
    }

    /// Rank every category at once and bucket the results
    ///
    /// Each bucket and the merged "All" list are truncated to `options.limit`
    /// independently. A category filter in `options` is ignored.
    pub fn rank_across_categories(
        &self,
        dog: &DogProfile,
        candidates: &[Candidate],
        options: &RankOptions,
    ) -> RecommendationSet {
        let unlimited = RankOptions {
            category: None,
            limit: None,
            ..options.clone()
        };
        let ranked = self.rank(dog, candidates, &unlimited);

        let mut buckets: BTreeMap<Category, Vec<Recommendation>> = BTreeMap::new();
        for rec in &ranked {
            buckets.entry(rec.category).or_default().push(rec.clone());
        }

        let mut all = ranked;
        if let Some(limit) = options.limit {
            all.truncate(limit);
            for bucket in buckets.values_mut() {
                bucket.truncate(limit);
            }
        }

        RecommendationSet {
            buckets,
            all,
            total_candidates: candidates.len(),
        }
    }

    /// Single-dog "top picks": every category against one flat threshold
    ///
    /// Honours the caller's category, limit and excluded ids. Only the
    /// thresholds are replaced.
    pub fn top_picks(
        &self,
        dog: &DogProfile,
        candidates: &[Candidate],
        options: &RankOptions,
    ) -> Vec<Recommendation> {
        let options = RankOptions {
            thresholds: Some(Thresholds::flat(self.top_picks_threshold)),
            ..options.clone()
        };
        self.rank(dog, candidates, &options)
    }

    fn recommend_one(&self, dog: &DogProfile, candidate: &Candidate) -> Recommendation {
        let result = self.scorer.score(dog, candidate);
        Recommendation {
            candidate: candidate.clone(),
            category: candidate.category(),
            result,
        }
    }
}

pub const DEFAULT_TOP_PICKS_THRESHOLD: u8 = 50;

impl Default for Recommender {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Activity, ActivityCategory, DogSize, EnergyLevel, PlayStyle, Requirements, TrainingLevel,
    };

    fn create_dog(id: &str, breed: &str) -> DogProfile {
        DogProfile {
            id: id.to_string(),
            name: format!("Dog {}", id),
            breed: breed.to_string(),
            age: 3.0,
            energy_level: EnergyLevel::High,
            size: None,
            training_level: None,
            is_good_off_leash: true,
            skills: vec!["agility".to_string()],
            play_style: PlayStyle::Rough,
            likes: vec!["water".to_string()],
            preferred_playmate_sizes: vec![DogSize::Large],
            behavior_notes: None,
        }
    }

    fn create_event(id: &str, category: Option<ActivityCategory>, tags: &[&str]) -> Candidate {
        Candidate::Event(Activity {
            id: id.to_string(),
            title: format!("Event {}", id),
            category,
            requirements: Requirements::default(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            starts_at: None,
            location: None,
        })
    }

    fn create_class(id: &str, level: TrainingLevel) -> Candidate {
        Candidate::TrainingClass(Activity {
            id: id.to_string(),
            title: format!("Class {}", id),
            category: None,
            requirements: Requirements {
                training_level: Some(level),
                ..Requirements::default()
            },
            tags: vec![],
            starts_at: None,
            location: None,
        })
    }

    #[test]
    fn test_rank_sorted_and_gated() {
        let recommender = Recommender::with_defaults();
        let dog = create_dog("me", "Labrador");

        let candidates = vec![
            create_class("beginner", TrainingLevel::Beginner),     // 40
            create_class("advanced", TrainingLevel::Advanced),     // 0, gated
            create_event("park", Some(ActivityCategory::DogPark), &["Water access"]), // 40
            create_event("open", None, &[]),                       // 100
        ];

        let ranked = recommender.rank(&dog, &candidates, &RankOptions::default());
        let ids: Vec<&str> = ranked.iter().map(|r| r.candidate.id()).collect();

        assert_eq!(ids, vec!["open", "beginner", "park"]);
    }

    #[test]
    fn test_rank_respects_limit_and_category() {
        let recommender = Recommender::with_defaults();
        let dog = create_dog("me", "Labrador");

        let candidates: Vec<Candidate> = (0..10)
            .map(|i| create_class(&i.to_string(), TrainingLevel::Beginner))
            .chain(std::iter::once(create_event("open", None, &[])))
            .collect();

        let options = RankOptions::category(Category::Training, 3);
        let ranked = recommender.rank(&dog, &candidates, &options);

        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|r| r.category == Category::Training));
        // Equal scores keep input order
        assert_eq!(ranked[0].candidate.id(), "0");
        assert_eq!(ranked[2].candidate.id(), "2");
    }

    #[test]
    fn test_rank_dedups_and_excludes_self() {
        let recommender = Recommender::with_defaults();
        let dog = create_dog("me", "Labrador");

        let candidates = vec![
            Candidate::OtherDog(create_dog("me", "Labrador")),
            Candidate::OtherDog(create_dog("buddy", "Golden Retriever")),
            Candidate::OtherDog(create_dog("buddy", "Golden Retriever")),
        ];

        let ranked = recommender.rank(&dog, &candidates, &RankOptions::default());

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].candidate.id(), "buddy");
        assert_eq!(ranked[0].score(), 100);
    }

    #[test]
    fn test_score_all_keeps_disqualified() {
        let recommender = Recommender::with_defaults();
        let dog = create_dog("me", "Chihuahua");
        let mut trial = Activity {
            id: "trial".to_string(),
            title: "Retriever trial".to_string(),
            category: Some(ActivityCategory::Competition),
            requirements: Requirements::default(),
            tags: vec![],
            starts_at: None,
            location: None,
        };
        trial.requirements.breed_allow_list = vec!["Retriever".to_string()];
        let candidates = vec![Candidate::Event(trial)];

        let raw = recommender.score_all(&dog, &candidates);
        assert_eq!(raw.len(), 1);
        assert!(raw[0].result.disqualified);

        let ranked = recommender.rank(&dog, &candidates, &RankOptions::default());
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_buckets_and_all_view() {
        let recommender = Recommender::with_defaults();
        let dog = create_dog("me", "Labrador");

        let candidates = vec![
            create_class("beginner", TrainingLevel::Beginner),
            create_event("park", Some(ActivityCategory::DogPark), &["Water access"]),
            create_event("open", None, &[]),
            Candidate::OtherDog(create_dog("buddy", "Golden Retriever")),
        ];

        let set = recommender.rank_across_categories(&dog, &candidates, &RankOptions::limit(2));

        assert_eq!(set.total_candidates, 4);
        assert_eq!(set.all.len(), 2);
        assert_eq!(set.bucket(Category::Training).len(), 1);
        assert_eq!(set.bucket(Category::DogPark).len(), 1);
        assert_eq!(set.bucket(Category::Playmate).len(), 1);
        assert!(set.bucket(Category::Competition).is_empty());
        assert!(set.all[0].score() >= set.all[1].score());
    }

    #[test]
    fn test_top_picks_uses_flat_threshold() {
        let recommender = Recommender::with_defaults();
        let dog = create_dog("me", "Labrador");

        let candidates = vec![
            // 40 passes the training threshold of 30 but not the flat 50
            create_class("beginner", TrainingLevel::Beginner),
            create_event("open", None, &[]),
        ];

        let picks = recommender.top_picks(&dog, &candidates, &RankOptions::limit(6));

        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].candidate.id(), "open");
    }

    #[test]
    fn test_top_picks_honours_exclusions() {
        let recommender = Recommender::with_defaults();
        let dog = create_dog("me", "Labrador");

        let candidates = vec![
            create_event("open", None, &[]),
            create_event("also-open", None, &[]),
        ];
        let options = RankOptions {
            exclude_ids: vec!["open".to_string()],
            ..RankOptions::limit(6)
        };

        let picks = recommender.top_picks(&dog, &candidates, &options);

        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].candidate.id(), "also-open");
    }
}
