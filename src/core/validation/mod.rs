//! Form validation
//!
//! Rules are data ([`Rule`]), messages live in a [`MessageCatalog`], and
//! [`evaluate`] folds both over the form fields into a [`FormErrors`]
//! mapping. [`CommentForm`] re-runs that evaluation on every edit.

pub mod aggregator;
pub mod form;
pub mod messages;
pub mod rules;

pub use aggregator::{FormErrors, FormField, evaluate};
pub use form::CommentForm;
pub use messages::MessageCatalog;
pub use rules::{Pattern, Rule};
