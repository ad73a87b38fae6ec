//! Human-readable messages for failing rules

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Messages keyed by field name, then by rule key
///
/// ```
/// use dishdetail::core::validation::MessageCatalog;
///
/// let catalog = MessageCatalog::new().with("author", "required", "Name is required.");
/// assert_eq!(catalog.get("author", "required"), Some("Name is required."));
/// assert_eq!(catalog.get("author", "minlength"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageCatalog {
    entries: IndexMap<String, IndexMap<String, String>>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: &str, rule_key: &str, message: &str) -> Self {
        self.insert(field, rule_key, message);
        self
    }

    pub fn insert(&mut self, field: &str, rule_key: &str, message: &str) {
        self.entries
            .entry(field.to_string())
            .or_default()
            .insert(rule_key.to_string(), message.to_string());
    }

    /// Add every message of one field
    pub fn extend_field<I, K, V>(&mut self, field: &str, messages: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let slot = self.entries.entry(field.to_string()).or_default();
        for (key, message) in messages {
            slot.insert(key.into(), message.into());
        }
    }

    pub fn get(&self, field: &str, rule_key: &str) -> Option<&str> {
        self.entries
            .get(field)
            .and_then(|messages| messages.get(rule_key))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(IndexMap::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_per_field() {
        let catalog = MessageCatalog::new()
            .with("author", "required", "Name is required.")
            .with("comment", "required", "Comment is required.");

        assert_eq!(catalog.get("author", "required"), Some("Name is required."));
        assert_eq!(catalog.get("comment", "required"), Some("Comment is required."));
        assert_eq!(catalog.get("rating", "required"), None);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut catalog = MessageCatalog::new().with("author", "required", "old");
        catalog.insert("author", "required", "new");
        assert_eq!(catalog.get("author", "required"), Some("new"));
    }

    #[test]
    fn test_extend_field() {
        let mut catalog = MessageCatalog::new();
        catalog.extend_field("author", [("required", "a"), ("minlength", "b")]);
        assert_eq!(catalog.get("author", "minlength"), Some("b"));
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_deserializes_nested_map() {
        let catalog: MessageCatalog = serde_yaml::from_str(
            "author:\n  required: Name is required.\n  minlength: Too short.\n",
        )
        .unwrap();
        assert_eq!(catalog.get("author", "minlength"), Some("Too short."));
    }
}
