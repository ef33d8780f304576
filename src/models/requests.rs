use crate::models::domain::Category;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for recommendations for one dog
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "dog_id", rename = "dogId")]
    pub dog_id: String,
    /// Restrict to one category. All categories are bucketed when absent.
    #[serde(default)]
    pub category: Option<Category>,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: u16,
    #[serde(default)]
    #[serde(alias = "exclude_ids", rename = "excludeIds")]
    pub exclude_ids: Vec<String>,
    /// Use the flat top-picks threshold instead of per-category thresholds
    #[serde(default)]
    #[serde(alias = "top_picks", rename = "topPicks")]
    pub top_picks: bool,
}

fn default_limit() -> u16 {
    6
}

impl RecommendRequest {
    pub fn for_dog(dog_id: impl Into<String>) -> Self {
        Self {
            dog_id: dog_id.into(),
            category: None,
            limit: default_limit(),
            exclude_ids: vec![],
            top_picks: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let req: RecommendRequest = serde_json::from_str(r#"{"dogId": "rex"}"#).unwrap();

        assert_eq!(req.limit, 6);
        assert!(req.category.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        let mut req = RecommendRequest::for_dog("");
        assert!(req.validate().is_err());

        req.dog_id = "rex".to_string();
        req.limit = 0;
        assert!(req.validate().is_err());

        req.limit = 101;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_category_parses() {
        let req: RecommendRequest =
            serde_json::from_str(r#"{"dogId": "rex", "category": "dogPark", "limit": 3}"#).unwrap();

        assert_eq!(req.category, Some(Category::DogPark));
        assert_eq!(req.limit, 3);
    }
}
