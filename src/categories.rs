//! Static mapping from the model's native labels to project categories
//!
//! The table is built once from configuration and never mutated afterwards.
//! Labels the model emits that are not in the table resolve to the default
//! category.

use crate::config::CategoryConfig;
use crate::error::{ClassifierError, ClassifierResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Project category identifier
pub type CategoryId = u32;

/// A resolved project category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Validated, immutable category table
#[derive(Debug, Clone)]
pub struct CategoryTable {
    mapping: BTreeMap<String, Category>,
    names: BTreeMap<CategoryId, String>,
    default: Category,
}

impl CategoryTable {
    /// Build the table from configuration
    ///
    /// Fails when either table is empty, when a label or name is blank, when an
    /// id key is not an integer, or when the default id or any mapping target
    /// has no display name.
    pub fn from_config(config: &CategoryConfig) -> ClassifierResult<Self> {
        if config.names.is_empty() {
            return Err(ClassifierError::Config(
                "category names table is empty".to_string(),
            ));
        }
        if config.mapping.is_empty() {
            return Err(ClassifierError::Config(
                "category mapping table is empty".to_string(),
            ));
        }

        let mut names = BTreeMap::new();
        for (raw_id, name) in &config.names {
            let id: CategoryId = raw_id.trim().parse().map_err(|_| {
                ClassifierError::Config(format!("category id '{}' is not an integer", raw_id))
            })?;
            if name.trim().is_empty() {
                return Err(ClassifierError::Config(format!(
                    "category {} has an empty name",
                    id
                )));
            }
            if names.insert(id, name.clone()).is_some() {
                return Err(ClassifierError::Config(format!(
                    "category id {} is defined more than once",
                    id
                )));
            }
        }

        let default = names
            .get(&config.default_id)
            .map(|name| Category {
                id: config.default_id,
                name: name.clone(),
            })
            .ok_or_else(|| {
                ClassifierError::Config(format!(
                    "default category id {} has no name",
                    config.default_id
                ))
            })?;

        let mut mapping = BTreeMap::new();
        for (label, id) in &config.mapping {
            if label.trim().is_empty() {
                return Err(ClassifierError::Config(
                    "category mapping contains an empty label".to_string(),
                ));
            }
            let name = names.get(id).ok_or_else(|| {
                ClassifierError::Config(format!(
                    "label '{}' maps to unknown category id {}",
                    label, id
                ))
            })?;
            mapping.insert(
                label.clone(),
                Category {
                    id: *id,
                    name: name.clone(),
                },
            );
        }

        Ok(Self {
            mapping,
            names,
            default,
        })
    }

    /// Resolve a native label, falling back to the default category
    pub fn resolve(&self, native_label: &str) -> &Category {
        self.mapping.get(native_label).unwrap_or(&self.default)
    }

    /// Category used when no mapping exists or classification cannot run
    pub fn default_category(&self) -> &Category {
        &self.default
    }

    /// Display name for a category id
    pub fn name_of(&self, id: CategoryId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Native labels known to the table, in sorted order
    pub fn native_labels(&self) -> impl Iterator<Item = &str> {
        self.mapping.keys().map(String::as_str)
    }

    /// Native label → category id pairs
    pub fn mapping(&self) -> impl Iterator<Item = (&str, CategoryId)> {
        self.mapping
            .iter()
            .map(|(label, category)| (label.as_str(), category.id))
    }

    /// Category id → display name pairs
    pub fn names(&self) -> impl Iterator<Item = (CategoryId, &str)> {
        self.names.iter().map(|(id, name)| (*id, name.as_str()))
    }

    /// Number of native labels in the mapping
    pub fn mapping_len(&self) -> usize {
        self.mapping.len()
    }

    /// Number of project categories
    pub fn names_len(&self) -> usize {
        self.names.len()
    }
}
