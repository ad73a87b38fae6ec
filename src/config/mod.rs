//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::field::FieldValue;
use crate::core::validation::{CommentForm, FormField, MessageCatalog, Rule};
use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Names of the comment form fields used by the default configuration
pub mod fields {
    pub const AUTHOR: &str = "author";
    pub const RATING: &str = "rating";
    pub const COMMENT: &str = "comment";
}

/// What happens to the held dish when saving a comment fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SaveFailurePolicy {
    /// Drop the held dish (and the unsaved comment with it)
    #[default]
    Clear,
    /// Keep showing the dish as it was before the failed save
    Keep,
}

/// One form control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field name (e.g., "author")
    pub name: String,

    /// Value the field starts with and returns to on reset
    #[serde(default = "empty_text")]
    pub default: FieldValue,

    /// Rules in evaluation order (e.g., ["required", "minlength:2"])
    #[serde(default)]
    pub rules: Vec<Rule>,

    /// Messages keyed by rule key (e.g., required -> "Name is required.")
    #[serde(default)]
    pub messages: IndexMap<String, String>,
}

fn empty_text() -> FieldValue {
    FieldValue::String(String::new())
}

/// The comment form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    pub fields: Vec<FieldConfig>,
}

impl FormConfig {
    /// Collect every field's messages into one catalog
    pub fn catalog(&self) -> MessageCatalog {
        let mut catalog = MessageCatalog::new();
        for field in &self.fields {
            catalog.extend_field(&field.name, field.messages.clone());
        }
        catalog
    }

    /// Build a live form from this configuration
    pub fn build(&self) -> Result<CommentForm, ConfigError> {
        let fields = self
            .fields
            .iter()
            .map(|f| FormField::new(f.name.clone(), f.default.clone(), f.rules.clone()))
            .collect();
        CommentForm::new(fields, self.catalog())
    }
}

/// Complete configuration of the detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailConfig {
    /// Prefix joined with dish image paths
    #[serde(default)]
    pub base_url: String,

    /// Policy applied when saving a comment fails
    #[serde(default)]
    pub save_failure: SaveFailurePolicy,

    /// Comment form definition
    pub form: FormConfig,
}

impl DetailConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        // Surface duplicate fields at load time rather than on first use
        config.form.build()?;
        Ok(config)
    }

    /// Join the base URL and a relative path with exactly one slash
    pub fn resolve_url(&self, path: &str) -> String {
        if self.base_url.is_empty() {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// The comment form of the dish detail page
    pub fn default_config() -> Self {
        let field = |name: &str, default: FieldValue, rules: Vec<Rule>, messages: &[(&str, &str)]| {
            FieldConfig {
                name: name.to_string(),
                default,
                rules,
                messages: messages
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        };

        Self {
            base_url: "http://localhost:3000/".to_string(),
            save_failure: SaveFailurePolicy::Clear,
            form: FormConfig {
                fields: vec![
                    field(
                        fields::AUTHOR,
                        empty_text(),
                        vec![Rule::Required, Rule::MinLength(2)],
                        &[
                            ("required", "Name is required."),
                            ("minlength", "Name must be at least 2 characters long."),
                        ],
                    ),
                    field(
                        fields::RATING,
                        FieldValue::Number(5.0),
                        vec![Rule::Min(1.0), Rule::Max(5.0)],
                        &[
                            ("min", "Rating must be at least 1."),
                            ("max", "Rating must be at most 5."),
                        ],
                    ),
                    field(
                        fields::COMMENT,
                        empty_text(),
                        vec![Rule::Required],
                        &[("required", "Comment is required.")],
                    ),
                ],
            },
        }
    }
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
