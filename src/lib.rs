//! # dishdetail
//!
//! The logic behind a restaurant menu's dish detail page: show a dish, page
//! to its previous/next neighbor with wraparound, and post a comment through
//! a live-validated form.
//!
//! ## Features
//!
//! - **Cyclic Navigation**: previous/next ids over the ordered dish list
//! - **Declarative Validation**: rules as data (`required`, `minlength:2`), messages in a catalog
//! - **Reactive Form Errors**: every edit recomputes all fields, published on a watch channel
//! - **Ordered Loads**: stale responses never overwrite newer state
//! - **Configuration-Based**: form and policies loadable from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dishdetail::prelude::*;
//!
//! let repository = InMemoryDishRepository::from_json_str(include_str!("db.json"))?;
//! let view = DetailViewController::new(repository, DetailConfig::default_config())?;
//!
//! view.load("0").await?;
//! view.set_field("author", "Ada")?;
//! view.set_field("comment", "Imagine all the eatables!")?;
//! view.submit_comment().await?;
//! ```

pub mod config;
pub mod controller;
pub mod core;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Comment, ConfigError, Dish, DishDetailError, DishRepository, EventBus, FieldValue,
        NavigationError, Neighbors, RepositoryError, ValidationError, ViewError, ViewEvent,
        Visibility, resolve,
        validation::{CommentForm, FormErrors, FormField, MessageCatalog, Rule, evaluate},
    };

    // === Controller ===
    pub use crate::controller::{DetailViewController, History, Outcome, ViewSnapshot};

    // === Storage ===
    pub use crate::storage::InMemoryDishRepository;

    // === Config ===
    pub use crate::config::{DetailConfig, FieldConfig, FormConfig, SaveFailurePolicy};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
}
