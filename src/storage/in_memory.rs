//! In-memory implementation of DishRepository for testing and development

use crate::core::{Dish, DishRepository, RepositoryError};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;
use std::sync::{Arc, RwLock};

/// In-memory dish repository
///
/// Keeps dishes in insertion order, which is also the order of
/// [`get_all_ids`](DishRepository::get_all_ids). Uses RwLock for
/// thread-safe access; clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryDishRepository {
    dishes: Arc<RwLock<IndexMap<String, Dish>>>,
}

#[derive(Deserialize)]
struct Database {
    dishes: Vec<Dish>,
}

impl InMemoryDishRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding `dishes`; a later duplicate id replaces an earlier one
    pub fn with_dishes(dishes: impl IntoIterator<Item = Dish>) -> Self {
        let map = dishes
            .into_iter()
            .map(|dish| (dish.id.clone(), dish))
            .collect();
        Self {
            dishes: Arc::new(RwLock::new(map)),
        }
    }

    /// Load a `{"dishes": [...]}` document
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let db: Database = serde_json::from_str(json)?;
        Ok(Self::with_dishes(db.dishes))
    }

    /// Insert or replace a dish
    pub fn insert(&self, dish: Dish) -> Result<(), RepositoryError> {
        let mut dishes = self
            .dishes
            .write()
            .map_err(|e| RepositoryError::new(format!("Failed to acquire write lock: {}", e)))?;
        dishes.insert(dish.id.clone(), dish);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.dishes.read().map(|dishes| dishes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DishRepository for InMemoryDishRepository {
    async fn get_all_ids(&self) -> Result<Vec<String>, RepositoryError> {
        let dishes = self
            .dishes
            .read()
            .map_err(|e| RepositoryError::new(format!("Failed to acquire read lock: {}", e)))?;

        Ok(dishes.keys().cloned().collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Dish, RepositoryError> {
        let dishes = self
            .dishes
            .read()
            .map_err(|e| RepositoryError::new(format!("Failed to acquire read lock: {}", e)))?;

        dishes
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(id))
    }

    async fn save(&self, dish: Dish) -> Result<Dish, RepositoryError> {
        let mut dishes = self
            .dishes
            .write()
            .map_err(|e| RepositoryError::new(format!("Failed to acquire write lock: {}", e)))?;

        let slot = dishes
            .get_mut(&dish.id)
            .ok_or_else(|| RepositoryError::not_found(&dish.id))?;
        *slot = dish.clone();

        Ok(dish)
    }
}
