//! Core module containing the records, traits and pure logic of the view

pub mod dish;
pub mod error;
pub mod events;
pub mod field;
pub mod neighbors;
pub mod repository;
pub mod validation;

pub use dish::{Comment, Dish};
pub use error::{
    ConfigError, DishDetailError, NavigationError, RepositoryError, ValidationError, ViewError,
};
pub use events::{EventBus, ViewEvent, Visibility};
pub use field::FieldValue;
pub use neighbors::{Neighbors, resolve};
pub use repository::DishRepository;
