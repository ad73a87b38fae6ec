//! Per-field error aggregation
//!
//! [`evaluate`] turns the current state of every declared field into one
//! error string per field. It is a pure function of its inputs: the mapping
//! is rebuilt from scratch on each call and never patched incrementally.

use super::messages::MessageCatalog;
use super::rules::Rule;
use crate::core::field::FieldValue;
use indexmap::IndexMap;
use serde::Serialize;

/// A form control: its value, whether the user touched it, and its rules
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: FieldValue,
    pub dirty: bool,
    pub rules: Vec<Rule>,
}

impl FormField {
    /// A clean field
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            dirty: false,
            rules,
        }
    }

    /// Same field, marked as touched by the user
    pub fn touched(mut self) -> Self {
        self.dirty = true;
        self
    }

    /// Rules the current value fails, in declaration order
    pub fn failing_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules
            .iter()
            .filter(|rule| !rule.is_satisfied_by(&self.value))
    }

    pub fn is_valid(&self) -> bool {
        self.failing_rules().next().is_none()
    }
}

/// Accumulated error strings, one entry per declared field, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(IndexMap<String, String>);

impl FormErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when at least one field currently shows a message
    pub fn has_errors(&self) -> bool {
        self.0.values().any(|message| !message.is_empty())
    }
}

/// Compute the error mapping for `fields`.
///
/// Untouched fields and valid fields map to `""`. A dirty, invalid field maps
/// to the catalog message of each failing rule, in rule order, each followed
/// by one space. A rule without a catalog message contributes nothing.
pub fn evaluate(fields: &[FormField], catalog: &MessageCatalog) -> FormErrors {
    let mut errors = IndexMap::with_capacity(fields.len());

    for field in fields {
        let mut message = String::new();

        if field.dirty {
            for rule in field.failing_rules() {
                match catalog.get(&field.name, rule.key()) {
                    Some(text) => {
                        message.push_str(text);
                        message.push(' ');
                    }
                    None => tracing::warn!(
                        field = %field.name,
                        rule = rule.key(),
                        "No message for failing rule"
                    ),
                }
            }
        }

        errors.insert(field.name.clone(), message);
    }

    FormErrors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MessageCatalog {
        MessageCatalog::new()
            .with("author", "required", "Name is required.")
            .with(
                "author",
                "minlength",
                "Name must be at least 2 characters long.",
            )
            .with("comment", "required", "Comment is required.")
    }

    fn author(value: &str) -> FormField {
        FormField::new("author", value, vec![Rule::Required, Rule::MinLength(2)])
    }

    fn comment(value: &str) -> FormField {
        FormField::new("comment", value, vec![Rule::Required])
    }

    #[test]
    fn test_untouched_fields_are_blank() {
        let errors = evaluate(&[author(""), comment("")], &catalog());
        assert_eq!(errors.get("author"), Some(""));
        assert_eq!(errors.get("comment"), Some(""));
        assert!(!errors.has_errors());
    }

    #[test]
    fn test_messages_concatenate_in_rule_order() {
        let errors = evaluate(&[author("").touched()], &catalog());
        assert_eq!(
            errors.get("author"),
            Some("Name is required. Name must be at least 2 characters long. ")
        );
    }

    #[test]
    fn test_only_failing_rules_report() {
        let errors = evaluate(&[author("A").touched()], &catalog());
        assert_eq!(
            errors.get("author"),
            Some("Name must be at least 2 characters long. ")
        );
    }

    #[test]
    fn test_valid_dirty_field_is_blank() {
        let errors = evaluate(&[author("Ada").touched()], &catalog());
        assert_eq!(errors.get("author"), Some(""));
    }

    #[test]
    fn test_one_entry_per_field_in_order() {
        let errors = evaluate(
            &[comment("").touched(), author("x").touched()],
            &catalog(),
        );
        let keys: Vec<&str> = errors.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["comment", "author"]);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_missing_message_does_not_blank_other_fields() {
        let partial = MessageCatalog::new()
            .with("author", "minlength", "Too short.")
            .with("comment", "required", "Comment is required.");
        let errors = evaluate(&[author("").touched(), comment("").touched()], &partial);
        assert_eq!(errors.get("author"), Some("Too short. "));
        assert_eq!(errors.get("comment"), Some("Comment is required. "));
    }

    #[test]
    fn test_field_without_rules_is_blank() {
        let rating = FormField::new("rating", 5u8, vec![]).touched();
        let errors = evaluate(&[rating], &catalog());
        assert_eq!(errors.get("rating"), Some(""));
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let fields = [author("A").touched(), comment("").touched()];
        let catalog = catalog();
        assert_eq!(evaluate(&fields, &catalog), evaluate(&fields, &catalog));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let errors = evaluate(&[comment("").touched()], &catalog());
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({"comment": "Comment is required. "})
        );
    }
}
