//! Resource access rule aggregate and its request models

use super::dataset_filter::{DatasetFilter, DatasetFilterError, DatasetFilterInput};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use validator::Validate;

lazy_static::lazy_static! {
    static ref WHITESPACE_RUN: regex::Regex = regex::Regex::new(r"\s+").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleValidationError {
    #[error("Rule name cannot be empty")]
    EmptyName,

    #[error("Rule name '{name}' exceeds the maximum length of {max} characters")]
    NameTooLong { name: String, max: usize },

    #[error("Rule description exceeds the maximum length of {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("Invalid contact ID {0}")]
    InvalidContactId(i64),

    #[error("Invalid contact group ID {0}")]
    InvalidContactGroupId(i64),

    #[error("Dataset #{index} has the same root filter as dataset #{duplicate_of}")]
    DuplicateDataset { index: usize, duplicate_of: usize },

    #[error(transparent)]
    Dataset(#[from] DatasetFilterError),
}

/// Field values of a rule, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleDefinition {
    pub name: String,
    pub description: String,
    pub is_enabled: bool,
    pub linked_contacts: BTreeSet<i64>,
    pub linked_contact_groups: BTreeSet<i64>,
    pub datasets: Vec<DatasetFilter>,
}

/// Checks shared by [`NewRule`] and [`Rule`]; returns the formatted name.
fn validate_definition(definition: &RuleDefinition) -> Result<String, RuleValidationError> {
    let formatted_name = Rule::format_name(&definition.name);
    if formatted_name.is_empty() {
        return Err(RuleValidationError::EmptyName);
    }
    if formatted_name.chars().count() > Rule::NAME_MAX_LENGTH {
        return Err(RuleValidationError::NameTooLong {
            name: definition.name.clone(),
            max: Rule::NAME_MAX_LENGTH,
        });
    }
    if definition.description.chars().count() > Rule::DESCRIPTION_MAX_LENGTH {
        return Err(RuleValidationError::DescriptionTooLong {
            max: Rule::DESCRIPTION_MAX_LENGTH,
        });
    }
    if let Some(&id) = definition.linked_contacts.iter().find(|&&id| id <= 0) {
        return Err(RuleValidationError::InvalidContactId(id));
    }
    if let Some(&id) = definition.linked_contact_groups.iter().find(|&&id| id <= 0) {
        return Err(RuleValidationError::InvalidContactGroupId(id));
    }
    for (index, dataset) in definition.datasets.iter().enumerate() {
        if let Some(duplicate_of) = definition.datasets[..index]
            .iter()
            .position(|other| other.has_same_root(dataset))
        {
            return Err(RuleValidationError::DuplicateDataset {
                index,
                duplicate_of,
            });
        }
    }
    Ok(formatted_name)
}

/// A validated rule that has not been assigned an identity yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRule {
    name: String,
    formatted_name: String,
    description: String,
    is_enabled: bool,
    linked_contacts: BTreeSet<i64>,
    linked_contact_groups: BTreeSet<i64>,
    datasets: Vec<DatasetFilter>,
}

impl NewRule {
    pub fn new(definition: RuleDefinition) -> Result<Self, RuleValidationError> {
        let formatted_name = validate_definition(&definition)?;
        Ok(Self {
            name: definition.name.trim().to_string(),
            formatted_name,
            description: definition.description,
            is_enabled: definition.is_enabled,
            linked_contacts: definition.linked_contacts,
            linked_contact_groups: definition.linked_contact_groups,
            datasets: definition.datasets,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn formatted_name(&self) -> &str {
        &self.formatted_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    pub fn linked_contacts(&self) -> &BTreeSet<i64> {
        &self.linked_contacts
    }

    pub fn linked_contact_groups(&self) -> &BTreeSet<i64> {
        &self.linked_contact_groups
    }

    pub fn datasets(&self) -> &[DatasetFilter] {
        &self.datasets
    }
}

/// Resource access rule aggregate.
///
/// Immutable once built: edits produce a new value through [`Rule::merge`]
/// or [`Rule::replace`], which re-run every structural check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    id: i64,
    name: String,
    formatted_name: String,
    description: String,
    is_enabled: bool,
    linked_contacts: BTreeSet<i64>,
    linked_contact_groups: BTreeSet<i64>,
    datasets: Vec<DatasetFilter>,
}

impl Rule {
    pub const NAME_MAX_LENGTH: usize = 255;
    pub const DESCRIPTION_MAX_LENGTH: usize = 65_535;

    /// Normalized name used for uniqueness comparison.
    pub fn format_name(raw: &str) -> String {
        WHITESPACE_RUN.replace_all(raw.trim(), "_").to_lowercase()
    }

    pub fn new(id: i64, definition: RuleDefinition) -> Result<Self, RuleValidationError> {
        Ok(Self::from_new(id, NewRule::new(definition)?))
    }

    /// Attach the identity assigned by storage to a validated rule.
    pub fn from_new(id: i64, rule: NewRule) -> Self {
        Self {
            id,
            name: rule.name,
            formatted_name: rule.formatted_name,
            description: rule.description,
            is_enabled: rule.is_enabled,
            linked_contacts: rule.linked_contacts,
            linked_contact_groups: rule.linked_contact_groups,
            datasets: rule.datasets,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn formatted_name(&self) -> &str {
        &self.formatted_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    pub fn linked_contacts(&self) -> &BTreeSet<i64> {
        &self.linked_contacts
    }

    pub fn linked_contact_groups(&self) -> &BTreeSet<i64> {
        &self.linked_contact_groups
    }

    pub fn datasets(&self) -> &[DatasetFilter] {
        &self.datasets
    }

    pub fn to_definition(&self) -> RuleDefinition {
        RuleDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            is_enabled: self.is_enabled,
            linked_contacts: self.linked_contacts.clone(),
            linked_contact_groups: self.linked_contact_groups.clone(),
            datasets: self.datasets.clone(),
        }
    }

    /// Full replacement keeping the identity.
    pub fn replace(&self, definition: RuleDefinition) -> Result<Rule, RuleValidationError> {
        Rule::new(self.id, definition)
    }

    /// Apply the supplied patch fields onto a copy of this rule.
    pub fn merge(&self, patch: &RulePatch) -> Result<Rule, RuleValidationError> {
        let current = self.to_definition();
        self.replace(RuleDefinition {
            name: patch.name.clone().unwrap_or(current.name),
            description: patch.description.clone().unwrap_or(current.description),
            is_enabled: patch.is_enabled.unwrap_or(current.is_enabled),
            linked_contacts: patch
                .linked_contacts
                .clone()
                .unwrap_or(current.linked_contacts),
            linked_contact_groups: patch
                .linked_contact_groups
                .clone()
                .unwrap_or(current.linked_contact_groups),
            datasets: patch.datasets.clone().unwrap_or(current.datasets),
        })
    }

    pub fn is_bound_to_contact(&self, contact_id: i64) -> bool {
        self.linked_contacts.contains(&contact_id)
    }

    pub fn is_bound_to_any_contact_group(&self, group_ids: &[i64]) -> bool {
        group_ids
            .iter()
            .any(|id| self.linked_contact_groups.contains(id))
    }
}

/// Fields to change on an existing rule; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_enabled: Option<bool>,
    pub linked_contacts: Option<BTreeSet<i64>>,
    pub linked_contact_groups: Option<BTreeSet<i64>>,
    pub datasets: Option<Vec<DatasetFilter>>,
}

impl RulePatch {
    pub fn is_empty(&self) -> bool {
        self == &RulePatch::default()
    }
}

fn default_enabled() -> bool {
    true
}

fn build_datasets(inputs: &[DatasetFilterInput]) -> Result<Vec<DatasetFilter>, DatasetFilterError> {
    inputs.iter().map(DatasetFilter::try_from).collect()
}

/// Input for creating a rule
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRuleInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 65535))]
    pub description: String,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    #[serde(default)]
    pub contacts: Vec<i64>,
    #[serde(default)]
    pub contact_groups: Vec<i64>,
    #[validate(length(min = 1, message = "A rule must contain at least one dataset"))]
    pub datasets: Vec<DatasetFilterInput>,
}

/// Input for a full update; every field is replaced.
pub type UpdateRuleInput = CreateRuleInput;

impl CreateRuleInput {
    pub fn into_definition(self) -> Result<RuleDefinition, DatasetFilterError> {
        Ok(RuleDefinition {
            datasets: build_datasets(&self.datasets)?,
            name: self.name,
            description: self.description,
            is_enabled: self.is_enabled,
            linked_contacts: self.contacts.into_iter().collect(),
            linked_contact_groups: self.contact_groups.into_iter().collect(),
        })
    }
}

/// Input for a partial update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PartialUpdateRuleInput {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 65535))]
    pub description: Option<String>,
    #[serde(default)]
    pub is_enabled: Option<bool>,
    #[serde(default)]
    pub contacts: Option<Vec<i64>>,
    #[serde(default)]
    pub contact_groups: Option<Vec<i64>>,
    #[serde(default)]
    #[validate(length(min = 1, message = "A rule must contain at least one dataset"))]
    pub datasets: Option<Vec<DatasetFilterInput>>,
}

impl PartialUpdateRuleInput {
    pub fn into_patch(self) -> Result<RulePatch, DatasetFilterError> {
        Ok(RulePatch {
            datasets: self
                .datasets
                .as_deref()
                .map(build_datasets)
                .transpose()?,
            name: self.name,
            description: self.description,
            is_enabled: self.is_enabled,
            linked_contacts: self.contacts.map(|ids| ids.into_iter().collect()),
            linked_contact_groups: self.contact_groups.map(|ids| ids.into_iter().collect()),
        })
    }
}
