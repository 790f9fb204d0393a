//! Category labels.

use serde::{Deserialize, Serialize};

/// Reserved label that matches every product.
pub const ALL_CATEGORY: &str = "All";

/// Errors from category management.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryError {
    #[error("Category name cannot be empty")]
    EmptyName,
    #[error("Category already exists: {0}")]
    Duplicate(String),
    #[error("Cannot modify the 'All' category")]
    Reserved,
    #[error("Category not found: {0}")]
    NotFound(String),
}

/// Ordered category labels, always starting with [`ALL_CATEGORY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CategoryList(Vec<String>);

impl CategoryList {
    /// Build a list from labels, placing the sentinel first and dropping
    /// blanks and duplicates.
    #[must_use]
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = vec![ALL_CATEGORY.to_string()];
        for label in labels {
            let label = label.into().trim().to_string();
            if !label.is_empty() && !list.contains(&label) {
                list.push(label);
            }
        }
        Self(list)
    }

    /// All labels including the sentinel.
    #[must_use]
    pub fn all(&self) -> &[String] {
        &self.0
    }

    /// Labels a product can be assigned to (everything but the sentinel).
    pub fn display(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .map(String::as_str)
            .filter(|label| *label != ALL_CATEGORY)
    }

    /// Whether `label` is a known category (the sentinel included).
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|c| c == label)
    }

    /// Whether a product may be filed under `label`.
    #[must_use]
    pub fn is_assignable(&self, label: &str) -> bool {
        label != ALL_CATEGORY && self.contains(label)
    }

    /// Append a new category.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is blank or already present.
    pub fn add(&mut self, label: &str) -> Result<String, CategoryError> {
        let label = normalize(label)?;
        if self.contains(&label) {
            return Err(CategoryError::Duplicate(label));
        }
        self.0.push(label.clone());
        Ok(label)
    }

    /// Rename a category in place, keeping its position.
    ///
    /// Returns the normalized new label. Products are not touched here; see
    /// [`super::Catalog::relabel`].
    ///
    /// # Errors
    ///
    /// Returns an error for the sentinel, a blank or duplicate new label, or
    /// an unknown old label.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<String, CategoryError> {
        if old == ALL_CATEGORY {
            return Err(CategoryError::Reserved);
        }
        let new = normalize(new)?;
        if new == ALL_CATEGORY {
            return Err(CategoryError::Duplicate(new));
        }
        let position = self
            .0
            .iter()
            .position(|c| c == old)
            .ok_or_else(|| CategoryError::NotFound(old.to_string()))?;
        if new != old && self.contains(&new) {
            return Err(CategoryError::Duplicate(new));
        }
        if let Some(slot) = self.0.get_mut(position) {
            slot.clone_from(&new);
        }
        Ok(new)
    }

    /// Remove a category.
    ///
    /// # Errors
    ///
    /// Returns an error for the sentinel or an unknown label.
    pub fn remove(&mut self, label: &str) -> Result<(), CategoryError> {
        if label == ALL_CATEGORY {
            return Err(CategoryError::Reserved);
        }
        let before = self.0.len();
        self.0.retain(|c| c != label);
        if self.0.len() == before {
            return Err(CategoryError::NotFound(label.to_string()));
        }
        Ok(())
    }
}

impl Default for CategoryList {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl From<Vec<String>> for CategoryList {
    fn from(labels: Vec<String>) -> Self {
        Self::new(labels)
    }
}

impl From<CategoryList> for Vec<String> {
    fn from(list: CategoryList) -> Self {
        list.0
    }
}

fn normalize(label: &str) -> Result<String, CategoryError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(CategoryError::EmptyName);
    }
    Ok(label.to_string())
}
