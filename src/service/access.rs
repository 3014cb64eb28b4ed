//! Effective rule computation for a contact

use crate::domain::{Contact, DatasetFilter, Rule};
use crate::error::Result;
use crate::repository::{ReadContactGroupRepository, ReadResourceAccessRepository};
use crate::telemetry::metrics::record_effective_rules;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Union of two rule lists, one entry per rule ID, ordered by ID.
pub fn union_rules(direct: Vec<Rule>, via_groups: Vec<Rule>) -> Vec<Rule> {
    let mut by_id: BTreeMap<i64, Rule> = BTreeMap::new();
    for rule in direct.into_iter().chain(via_groups) {
        by_id.entry(rule.id()).or_insert(rule);
    }
    by_id.into_values().collect()
}

pub struct AccessResolver<R, G>
where
    R: ReadResourceAccessRepository,
    G: ReadContactGroupRepository,
{
    rule_repo: Arc<R>,
    contact_group_repo: Arc<G>,
}

impl<R, G> AccessResolver<R, G>
where
    R: ReadResourceAccessRepository,
    G: ReadContactGroupRepository,
{
    pub fn new(rule_repo: Arc<R>, contact_group_repo: Arc<G>) -> Self {
        Self {
            rule_repo,
            contact_group_repo,
        }
    }

    /// Rules bound to the contact directly or through any of its contact
    /// groups. Admins get every rule.
    pub async fn effective_rules(&self, contact: &Contact) -> Result<Vec<Rule>> {
        record_effective_rules(contact.is_admin);
        if contact.is_admin {
            let mut rules = self.rule_repo.find_all().await?;
            rules.sort_by_key(Rule::id);
            return Ok(rules);
        }

        let direct = self.rule_repo.find_by_contact_id(contact.id).await?;
        let group_ids: Vec<i64> = self
            .contact_group_repo
            .find_all_by_user_id(contact.id)
            .await?
            .into_iter()
            .map(|group| group.id)
            .collect();

        let via_groups = if group_ids.is_empty() {
            vec![]
        } else {
            self.rule_repo.find_by_contact_group_ids(&group_ids).await?
        };

        debug!(
            contact_id = contact.id,
            direct = direct.len(),
            via_groups = via_groups.len(),
            groups = group_ids.len(),
            "Resolved effective rules"
        );

        Ok(union_rules(direct, via_groups))
    }

    pub async fn is_rule_visible(&self, contact: &Contact, rule_id: i64) -> Result<bool> {
        if contact.is_admin {
            return Ok(true);
        }
        Ok(self
            .effective_rules(contact)
            .await?
            .iter()
            .any(|rule| rule.id() == rule_id))
    }

    /// Dataset filters granted to the contact by its enabled effective rules.
    pub async fn effective_datasets(&self, contact: &Contact) -> Result<Vec<DatasetFilter>> {
        let mut datasets: Vec<DatasetFilter> = Vec::new();
        for rule in self.effective_rules(contact).await? {
            if !rule.is_enabled() {
                continue;
            }
            for dataset in rule.datasets() {
                if !datasets.contains(dataset) {
                    datasets.push(dataset.clone());
                }
            }
        }
        Ok(datasets)
    }
}
