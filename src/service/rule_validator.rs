//! Semantic checks on rules that need collaborators

use crate::domain::{DatasetFilter, FilterType, Rule};
use crate::error::{AppError, Result};
use crate::repository::{
    ReadContactGroupRepository, ReadContactRepository, ReadResourceAccessRepository,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

fn missing_ids(requested: &BTreeSet<i64>, existing: &[i64]) -> Vec<i64> {
    let existing: BTreeSet<i64> = existing.iter().copied().collect();
    requested.difference(&existing).copied().collect()
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct RuleValidator<R, C, G>
where
    R: ReadResourceAccessRepository,
    C: ReadContactRepository,
    G: ReadContactGroupRepository,
{
    rule_repo: Arc<R>,
    contact_repo: Arc<C>,
    contact_group_repo: Arc<G>,
}

impl<R, C, G> RuleValidator<R, C, G>
where
    R: ReadResourceAccessRepository,
    C: ReadContactRepository,
    G: ReadContactGroupRepository,
{
    pub fn new(rule_repo: Arc<R>, contact_repo: Arc<C>, contact_group_repo: Arc<G>) -> Self {
        Self {
            rule_repo,
            contact_repo,
            contact_group_repo,
        }
    }

    /// Fails with `Conflict` when another rule already uses the formatted name.
    ///
    /// This is a read followed later by a write; storage with a unique index
    /// on the formatted name is what closes the gap between the two.
    pub async fn assert_is_valid_name(&self, name: &str) -> Result<()> {
        let formatted_name = Rule::format_name(name);
        if self.rule_repo.exists_by_name(&formatted_name).await? {
            return Err(AppError::Conflict(format!(
                "Name '{}' (formatted as '{}') is already used by another rule",
                name, formatted_name
            )));
        }
        Ok(())
    }

    pub async fn assert_contacts_exist(&self, contact_ids: &BTreeSet<i64>) -> Result<()> {
        if contact_ids.is_empty() {
            return Ok(());
        }
        let requested: Vec<i64> = contact_ids.iter().copied().collect();
        let existing = self.contact_repo.exist(&requested).await?;
        let missing = missing_ids(contact_ids, &existing);
        if !missing.is_empty() {
            return Err(AppError::BadRequest(format!(
                "The following contacts do not exist: {}",
                join_ids(&missing)
            )));
        }
        Ok(())
    }

    pub async fn assert_contact_groups_exist(&self, group_ids: &BTreeSet<i64>) -> Result<()> {
        if group_ids.is_empty() {
            return Ok(());
        }
        let requested: Vec<i64> = group_ids.iter().copied().collect();
        let existing = self.contact_group_repo.exist(&requested).await?;
        let missing = missing_ids(group_ids, &existing);
        if !missing.is_empty() {
            return Err(AppError::BadRequest(format!(
                "The following contact groups do not exist: {}",
                join_ids(&missing)
            )));
        }
        Ok(())
    }

    /// Check every level of every dataset against the monitoring inventory.
    ///
    /// Identifiers are grouped per category so each category is queried once.
    pub async fn assert_resources_exist(&self, datasets: &[DatasetFilter]) -> Result<()> {
        let mut requested: BTreeMap<FilterType, BTreeSet<i64>> = BTreeMap::new();
        for level in datasets.iter().flat_map(DatasetFilter::levels) {
            requested
                .entry(level.filter_type())
                .or_default()
                .extend(level.resource_ids().iter().copied());
        }

        for (filter_type, ids) in requested {
            let query: Vec<i64> = ids.iter().copied().collect();
            let existing = self.rule_repo.exist_resources(filter_type, &query).await?;
            let missing = missing_ids(&ids, &existing);
            if !missing.is_empty() {
                return Err(AppError::BadRequest(format!(
                    "The following {} resources do not exist: {}",
                    filter_type,
                    join_ids(&missing)
                )));
            }
        }
        Ok(())
    }
}
