// Service exports
pub mod recommendations;
pub mod repository;

pub use recommendations::{RecommendationService, ServiceError};
pub use repository::{Dataset, Entity, InMemoryRepository, Repository, RepositoryError};
