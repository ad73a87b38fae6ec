//! Typed error handling for the dish detail view
//!
//! A small hierarchy so callers can react to specific failures instead of
//! inspecting strings.
//!
//! # Error Categories
//!
//! - [`NavigationError`]: previous/next resolution over the dish id list
//! - [`RepositoryError`]: failures reported by a [`DishRepository`](crate::core::DishRepository)
//! - [`ValidationError`]: invalid comment submissions
//! - [`ConfigError`]: malformed configuration (rules, policies)
//! - [`ViewError`]: controller operations attempted in the wrong state
//!
//! # Example
//!
//! ```rust,ignore
//! match controller.submit_comment().await {
//!     Ok(Outcome::Applied(dish)) => println!("{} comments", dish.comments.len()),
//!     Ok(Outcome::Discarded) => {}
//!     Err(DishDetailError::Repository(e)) => eprintln!("save failed: {}", e.message()),
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The main error type for the dish detail crate
#[derive(Debug)]
pub enum DishDetailError {
    /// Previous/next resolution errors
    Navigation(NavigationError),

    /// Errors surfaced by the dish repository
    Repository(RepositoryError),

    /// Comment validation errors
    Validation(ValidationError),

    /// Configuration errors
    Config(ConfigError),

    /// Controller state errors
    View(ViewError),
}

impl fmt::Display for DishDetailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DishDetailError::Navigation(e) => write!(f, "{}", e),
            DishDetailError::Repository(e) => write!(f, "{}", e),
            DishDetailError::Validation(e) => write!(f, "{}", e),
            DishDetailError::Config(e) => write!(f, "{}", e),
            DishDetailError::View(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DishDetailError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DishDetailError::Navigation(e) => Some(e),
            DishDetailError::Repository(e) => Some(e),
            DishDetailError::Validation(e) => Some(e),
            DishDetailError::Config(e) => Some(e),
            DishDetailError::View(e) => Some(e),
        }
    }
}

/// Serializable error summary for a presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl DishDetailError {
    /// Get the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DishDetailError::Navigation(e) => e.error_code(),
            DishDetailError::Repository(_) => "REPOSITORY_ERROR",
            DishDetailError::Validation(_) => "VALIDATION_ERROR",
            DishDetailError::Config(_) => "CONFIG_ERROR",
            DishDetailError::View(e) => e.error_code(),
        }
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

// =============================================================================
// Navigation Errors
// =============================================================================

/// Errors raised while resolving the neighbors of a dish
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The id list was empty
    #[error("Cannot resolve neighbors in an empty dish list")]
    EmptyList,

    /// The current id is not part of the list
    #[error("Dish '{id}' is not in the dish list")]
    NotFound { id: String },
}

impl NavigationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            NavigationError::EmptyList => "EMPTY_DISH_LIST",
            NavigationError::NotFound { .. } => "DISH_NOT_IN_LIST",
        }
    }
}

impl From<NavigationError> for DishDetailError {
    fn from(err: NavigationError) -> Self {
        DishDetailError::Navigation(err)
    }
}

// =============================================================================
// Repository Errors
// =============================================================================

/// Failure reported by a dish repository
///
/// The message is opaque to this crate and surfaced to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RepositoryError {
    message: String,
}

impl RepositoryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message as reported by the repository
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Shorthand for a missing dish
    pub fn not_found(id: &str) -> Self {
        Self::new(format!("Dish '{}' not found", id))
    }
}

impl From<RepositoryError> for DishDetailError {
    fn from(err: RepositoryError) -> Self {
        DishDetailError::Repository(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors raised when a comment cannot be built or submitted
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// One or more form fields fail their rules
    #[error("Form is invalid: {}", .fields.join(", "))]
    InvalidForm { fields: Vec<String> },

    /// A single field carries an unusable value
    #[error("Invalid value for '{field}': {message}")]
    FieldError { field: String, message: String },
}

impl From<ValidationError> for DishDetailError {
    fn from(err: ValidationError) -> Self {
        DishDetailError::Validation(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A rule string could not be parsed
    #[error("Invalid rule '{rule}': {message}")]
    InvalidRule { rule: String, message: String },

    /// Two fields share a name
    #[error("Field '{field}' is declared more than once")]
    DuplicateField { field: String },
}

impl From<ConfigError> for DishDetailError {
    fn from(err: ConfigError) -> Self {
        DishDetailError::Config(err)
    }
}

// =============================================================================
// View Errors
// =============================================================================

/// Controller operations attempted in a state that does not allow them
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// No dish is currently held by the view
    #[error("No dish is loaded")]
    NoDish,
}

impl ViewError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ViewError::NoDish => "NO_DISH_LOADED",
        }
    }
}

impl From<ViewError> for DishDetailError {
    fn from(err: ViewError) -> Self {
        DishDetailError::View(err)
    }
}

/// Result alias used across the crate
pub type Result<T, E = DishDetailError> = std::result::Result<T, E>;
