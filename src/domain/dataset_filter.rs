//! Dataset filters: one typed level of a rule's resource scope, optionally
//! narrowed by a nested level.

use super::filter_type::FilterType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetFilterError {
    #[error("Dataset filter of type '{filter_type}' cannot narrow a '{parent}' filter")]
    IncompatibleType {
        parent: FilterType,
        filter_type: FilterType,
    },

    #[error("Dataset filter of type '{filter_type}' must reference at least one resource")]
    EmptyResourceSet { filter_type: FilterType },

    #[error("Dataset filter of type '{filter_type}' references invalid resource ID {id}")]
    InvalidResourceId { filter_type: FilterType, id: i64 },
}

/// Check one filter level against its parent level, if any.
///
/// Checks run in a fixed order: empty resource set, parent compatibility,
/// unchosen (`empty`) category, identifier well-formedness.
pub fn validate(
    filter_type: FilterType,
    resource_ids: &BTreeSet<i64>,
    parent: Option<FilterType>,
) -> Result<(), DatasetFilterError> {
    if resource_ids.is_empty() {
        return Err(DatasetFilterError::EmptyResourceSet { filter_type });
    }

    if let Some(parent) = parent {
        if !parent.can_be_narrowed_by(filter_type) {
            return Err(DatasetFilterError::IncompatibleType {
                parent,
                filter_type,
            });
        }
    }

    if filter_type == FilterType::Empty {
        return Err(DatasetFilterError::EmptyResourceSet { filter_type });
    }

    if let Some(&id) = resource_ids.iter().find(|&&id| id <= 0) {
        return Err(DatasetFilterError::InvalidResourceId { filter_type, id });
    }

    Ok(())
}

/// Unvalidated dataset filter as submitted by a client.
///
/// May be incomplete while a rule is being edited; it only becomes a
/// [`DatasetFilter`] once the whole chain validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetFilterInput {
    #[serde(rename = "type")]
    pub filter_type: FilterType,
    #[serde(default)]
    pub resources: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_filter: Option<Box<DatasetFilterInput>>,
}

impl DatasetFilterInput {
    pub fn new(filter_type: FilterType, resources: Vec<i64>) -> Self {
        Self {
            filter_type,
            resources,
            dataset_filter: None,
        }
    }

    pub fn narrowed_by(mut self, child: DatasetFilterInput) -> Self {
        self.dataset_filter = Some(Box::new(child));
        self
    }
}

/// Validate a whole chain, root to leaf, stopping at the first failing level.
pub fn validate_chain(root: &DatasetFilterInput) -> Result<(), DatasetFilterError> {
    let mut parent = None;
    let mut current = Some(root);

    while let Some(node) = current {
        let resource_ids: BTreeSet<i64> = node.resources.iter().copied().collect();
        validate(node.filter_type, &resource_ids, parent)?;
        parent = Some(node.filter_type);
        current = node.dataset_filter.as_deref();
    }

    Ok(())
}

/// A validated, immutable dataset filter level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DatasetFilterInput", into = "DatasetFilterInput")]
pub struct DatasetFilter {
    filter_type: FilterType,
    resource_ids: BTreeSet<i64>,
    child: Option<Box<DatasetFilter>>,
}

impl DatasetFilter {
    /// Build a level on top of an already valid child.
    pub fn new(
        filter_type: FilterType,
        resource_ids: impl IntoIterator<Item = i64>,
        child: Option<DatasetFilter>,
    ) -> Result<Self, DatasetFilterError> {
        let resource_ids: BTreeSet<i64> = resource_ids.into_iter().collect();
        validate(filter_type, &resource_ids, None)?;

        if let Some(child) = &child {
            if !filter_type.can_be_narrowed_by(child.filter_type) {
                return Err(DatasetFilterError::IncompatibleType {
                    parent: filter_type,
                    filter_type: child.filter_type,
                });
            }
        }

        Ok(Self {
            filter_type,
            resource_ids,
            child: child.map(Box::new),
        })
    }

    pub fn leaf(
        filter_type: FilterType,
        resource_ids: impl IntoIterator<Item = i64>,
    ) -> Result<Self, DatasetFilterError> {
        Self::new(filter_type, resource_ids, None)
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn resource_ids(&self) -> &BTreeSet<i64> {
        &self.resource_ids
    }

    pub fn child(&self) -> Option<&DatasetFilter> {
        self.child.as_deref()
    }

    /// Number of levels in the chain starting at this node.
    pub fn depth(&self) -> usize {
        self.levels().count()
    }

    /// Iterate the chain from this node down to its leaf.
    pub fn levels(&self) -> impl Iterator<Item = &DatasetFilter> {
        std::iter::successors(Some(self), |node| node.child())
    }

    /// Replacement of this level with a different child.
    pub fn with_child(&self, child: Option<DatasetFilter>) -> Result<Self, DatasetFilterError> {
        Self::new(self.filter_type, self.resource_ids.iter().copied(), child)
    }

    /// Same category and same resources at the root level.
    pub fn has_same_root(&self, other: &DatasetFilter) -> bool {
        self.filter_type == other.filter_type && self.resource_ids == other.resource_ids
    }
}

impl TryFrom<&DatasetFilterInput> for DatasetFilter {
    type Error = DatasetFilterError;

    fn try_from(input: &DatasetFilterInput) -> Result<Self, Self::Error> {
        validate_chain(input)?;

        let mut levels = Vec::new();
        let mut current = Some(input);
        while let Some(node) = current {
            levels.push(node);
            current = node.dataset_filter.as_deref();
        }

        levels.into_iter().rev().try_fold(None, |child, node| {
            DatasetFilter::new(node.filter_type, node.resources.iter().copied(), child).map(Some)
        })?
        .ok_or(DatasetFilterError::EmptyResourceSet {
            filter_type: input.filter_type,
        })
    }
}

impl TryFrom<DatasetFilterInput> for DatasetFilter {
    type Error = DatasetFilterError;

    fn try_from(input: DatasetFilterInput) -> Result<Self, Self::Error> {
        DatasetFilter::try_from(&input)
    }
}

impl From<&DatasetFilter> for DatasetFilterInput {
    fn from(filter: &DatasetFilter) -> Self {
        DatasetFilterInput {
            filter_type: filter.filter_type,
            resources: filter.resource_ids.iter().copied().collect(),
            dataset_filter: filter
                .child()
                .map(|child| Box::new(DatasetFilterInput::from(child))),
        }
    }
}

impl From<DatasetFilter> for DatasetFilterInput {
    fn from(filter: DatasetFilter) -> Self {
        DatasetFilterInput::from(&filter)
    }
}
