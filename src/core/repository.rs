//! Repository trait for dish data

use crate::core::dish::Dish;
use crate::core::error::RepositoryError;
use async_trait::async_trait;

/// Source of dishes for the detail view
///
/// Implementations may talk to a remote service; every call may fail with a
/// [`RepositoryError`] whose message is shown to the user as-is.
#[async_trait]
pub trait DishRepository: Send + Sync {
    /// Ids of all dishes, in menu order
    async fn get_all_ids(&self) -> Result<Vec<String>, RepositoryError>;

    /// Get a dish by id
    async fn get_by_id(&self, id: &str) -> Result<Dish, RepositoryError>;

    /// Persist a dish, returning the stored copy
    async fn save(&self, dish: Dish) -> Result<Dish, RepositoryError>;
}

#[async_trait]
impl<R: DishRepository + ?Sized> DishRepository for std::sync::Arc<R> {
    async fn get_all_ids(&self) -> Result<Vec<String>, RepositoryError> {
        (**self).get_all_ids().await
    }

    async fn get_by_id(&self, id: &str) -> Result<Dish, RepositoryError> {
        (**self).get_by_id(id).await
    }

    async fn save(&self, dish: Dish) -> Result<Dish, RepositoryError> {
        (**self).save(dish).await
    }
}
