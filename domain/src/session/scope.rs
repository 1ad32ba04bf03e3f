//! Scope value object.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The original scope a session was asked to deliver.
///
/// Created once through [`Scope::new`] (or the builder methods, which keep
/// the same validation) and never narrowed afterwards. Completion checks
/// compare the finished work against [`Scope::expected_items`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    estimated_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    items: Vec<String>,
}

impl Scope {
    /// Creates a free-text scope.
    ///
    /// Fails with [`DomainError::InvalidScope`] when the description is blank.
    pub fn new(description: impl Into<String>) -> Result<Self, DomainError> {
        let description = description.into().trim().to_string();
        if description.is_empty() {
            return Err(DomainError::InvalidScope(
                "scope description cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            description,
            estimated_items: None,
            items: Vec::new(),
        })
    }

    /// Declares how many deliverable items the scope contains.
    pub fn with_estimated_items(mut self, count: usize) -> Result<Self, DomainError> {
        if count == 0 {
            return Err(DomainError::InvalidScope(
                "estimated item count must be at least 1".to_string(),
            ));
        }
        self.estimated_items = Some(count);
        Ok(self)
    }

    /// Adds an itemized deliverable. Blank items are rejected.
    pub fn with_item(mut self, item: impl Into<String>) -> Result<Self, DomainError> {
        let item = item.into().trim().to_string();
        if item.is_empty() {
            return Err(DomainError::InvalidScope(
                "scope items cannot be empty".to_string(),
            ));
        }
        self.items.push(item);
        Ok(self)
    }

    /// Re-checks a scope that was built elsewhere (e.g. deserialized).
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.description.trim().is_empty() {
            return Err(DomainError::InvalidScope(
                "scope description cannot be empty".to_string(),
            ));
        }
        if self.estimated_items == Some(0) {
            return Err(DomainError::InvalidScope(
                "estimated item count must be at least 1".to_string(),
            ));
        }
        if self.items.iter().any(|i| i.trim().is_empty()) {
            return Err(DomainError::InvalidScope(
                "scope items cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn estimated_items(&self) -> Option<usize> {
        self.estimated_items
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Number of items the finished session must account for.
    ///
    /// An explicit estimate wins over the itemized list; `None` means the
    /// scope declared no count and any number of completed groups satisfies it.
    pub fn expected_items(&self) -> Option<usize> {
        self.estimated_items.or(if self.items.is_empty() {
            None
        } else {
            Some(self.items.len())
        })
    }
}
