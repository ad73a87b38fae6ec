//! Reactive comment form
//!
//! [`CommentForm`] owns the controls of the comment form and keeps the error
//! mapping in sync with them. Every edit triggers a full re-evaluation of all
//! fields, and the result is published on a `tokio::sync::watch` channel so a
//! presentation layer always sees the latest complete mapping.

use super::aggregator::{FormErrors, FormField, evaluate};
use super::messages::MessageCatalog;
use crate::core::error::{ConfigError, ValidationError};
use crate::core::field::FieldValue;
use indexmap::IndexMap;
use std::collections::HashSet;
use tokio::sync::watch;

/// Comment form state with live validation
#[derive(Debug)]
pub struct CommentForm {
    fields: Vec<FormField>,
    defaults: Vec<FieldValue>,
    catalog: MessageCatalog,
    errors: watch::Sender<FormErrors>,
}

impl CommentForm {
    /// Build a form from its fields; their current values become the reset defaults.
    ///
    /// All fields start clean and the error mapping is seeded immediately.
    pub fn new(fields: Vec<FormField>, catalog: MessageCatalog) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateField {
                    field: field.name.clone(),
                });
            }
        }

        let fields: Vec<FormField> = fields
            .into_iter()
            .map(|mut field| {
                field.dirty = false;
                field
            })
            .collect();
        let defaults = fields.iter().map(|field| field.value.clone()).collect();
        let (errors, _) = watch::channel(evaluate(&fields, &catalog));

        Ok(Self {
            fields,
            defaults,
            catalog,
            errors,
        })
    }

    /// Replace a field's value and mark it dirty
    pub fn set_value(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), ValidationError> {
        let field = self.field_mut(name)?;
        field.value = value.into();
        field.dirty = true;
        self.recompute();
        Ok(())
    }

    /// Mark a field as touched without changing its value
    pub fn mark_dirty(&mut self, name: &str) -> Result<(), ValidationError> {
        self.field_mut(name)?.dirty = true;
        self.recompute();
        Ok(())
    }

    /// Restore every field to its default and clear dirtiness
    pub fn reset(&mut self) {
        for (field, default) in self.fields.iter_mut().zip(&self.defaults) {
            field.value = default.clone();
            field.dirty = false;
        }
        self.recompute();
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    /// Snapshot of all values in declaration order
    pub fn values(&self) -> IndexMap<String, FieldValue> {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.value.clone()))
            .collect()
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// The current error mapping
    pub fn errors(&self) -> FormErrors {
        self.errors.borrow().clone()
    }

    /// Receive every recomputed error mapping
    pub fn subscribe(&self) -> watch::Receiver<FormErrors> {
        self.errors.subscribe()
    }

    /// Whether every field passes its rules, touched or not
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(FormField::is_valid)
    }

    /// Names of the fields that fail at least one rule
    pub fn invalid_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|field| !field.is_valid())
            .map(|field| field.name.clone())
            .collect()
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut FormField, ValidationError> {
        self.fields
            .iter_mut()
            .find(|field| field.name == name)
            .ok_or_else(|| ValidationError::FieldError {
                field: name.to_string(),
                message: "no such field".to_string(),
            })
    }

    fn recompute(&self) {
        self.errors.send_replace(evaluate(&self.fields, &self.catalog));
    }
}
