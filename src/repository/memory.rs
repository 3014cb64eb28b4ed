//! In-memory collaborators, used by the CLI and by integration tests.

use super::{
    ReadAccessGroupRepository, ReadContactGroupRepository, ReadContactRepository,
    ReadResourceAccessRepository, WriteResourceAccessRepository,
};
use crate::domain::{AccessGroup, Contact, ContactGroup, FilterType, NewRule, Rule};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct RuleStore {
    rules: BTreeMap<i64, Rule>,
    last_id: i64,
    inventory: HashMap<FilterType, BTreeSet<i64>>,
}

impl RuleStore {
    fn name_owner(&self, formatted_name: &str) -> Option<i64> {
        self.rules
            .values()
            .find(|rule| rule.formatted_name() == formatted_name)
            .map(Rule::id)
    }
}

fn name_conflict(name: &str, formatted_name: &str) -> AppError {
    AppError::Conflict(format!(
        "Name '{}' (formatted as '{}') is already used by another rule",
        name, formatted_name
    ))
}

/// Rule store plus the monitoring inventory used for existence checks.
///
/// Writes check the formatted name under the same lock that inserts the
/// rule, so two concurrent writers can never both commit the same name.
#[derive(Debug, Default)]
pub struct InMemoryResourceAccessRepository {
    store: RwLock<RuleStore>,
}

impl InMemoryResourceAccessRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register monitoring resources of a category.
    pub fn with_resources(mut self, filter_type: FilterType, ids: impl IntoIterator<Item = i64>) -> Self {
        self.store
            .get_mut()
            .inventory
            .entry(filter_type)
            .or_default()
            .extend(ids);
        self
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.rules.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ReadResourceAccessRepository for InMemoryResourceAccessRepository {
    async fn find_by_id(&self, rule_id: i64) -> Result<Option<Rule>> {
        Ok(self.store.read().await.rules.get(&rule_id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Rule>> {
        Ok(self.store.read().await.rules.values().cloned().collect())
    }

    async fn find_by_contact_id(&self, contact_id: i64) -> Result<Vec<Rule>> {
        let store = self.store.read().await;
        Ok(store
            .rules
            .values()
            .filter(|rule| rule.is_bound_to_contact(contact_id))
            .cloned()
            .collect())
    }

    async fn find_by_contact_group_ids(&self, group_ids: &[i64]) -> Result<Vec<Rule>> {
        let store = self.store.read().await;
        Ok(store
            .rules
            .values()
            .filter(|rule| rule.is_bound_to_any_contact_group(group_ids))
            .cloned()
            .collect())
    }

    async fn exists_by_name(&self, formatted_name: &str) -> Result<bool> {
        Ok(self.store.read().await.name_owner(formatted_name).is_some())
    }

    async fn exist_resources(
        &self,
        filter_type: FilterType,
        resource_ids: &[i64],
    ) -> Result<Vec<i64>> {
        let store = self.store.read().await;
        let Some(known) = store.inventory.get(&filter_type) else {
            return Ok(vec![]);
        };
        Ok(resource_ids
            .iter()
            .copied()
            .filter(|id| known.contains(id))
            .collect())
    }
}

#[async_trait]
impl WriteResourceAccessRepository for InMemoryResourceAccessRepository {
    async fn add(&self, rule: &NewRule) -> Result<i64> {
        let mut store = self.store.write().await;
        if store.name_owner(rule.formatted_name()).is_some() {
            return Err(name_conflict(rule.name(), rule.formatted_name()));
        }

        store.last_id += 1;
        let id = store.last_id;
        store.rules.insert(id, Rule::from_new(id, rule.clone()));
        Ok(id)
    }

    async fn update(&self, rule: &Rule) -> Result<()> {
        let mut store = self.store.write().await;
        if !store.rules.contains_key(&rule.id()) {
            return Err(AppError::NotFound("Rule".to_string()));
        }
        if let Some(owner) = store.name_owner(rule.formatted_name()) {
            if owner != rule.id() {
                return Err(name_conflict(rule.name(), rule.formatted_name()));
            }
        }

        store.rules.insert(rule.id(), rule.clone());
        Ok(())
    }

    async fn delete(&self, rule_id: i64) -> Result<()> {
        match self.store.write().await.rules.remove(&rule_id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Rule".to_string())),
        }
    }
}

#[derive(Debug, Default)]
struct DirectoryState {
    contacts: BTreeMap<i64, Contact>,
    contact_groups: BTreeMap<i64, ContactGroup>,
    memberships: HashMap<i64, BTreeSet<i64>>,
    access_groups: HashMap<i64, Vec<AccessGroup>>,
}

/// Contacts, contact groups, memberships and ACL groups.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    state: RwLock<DirectoryState>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.state.get_mut().contacts.insert(contact.id, contact);
        self
    }

    pub fn with_contact_group(mut self, group: ContactGroup) -> Self {
        self.state.get_mut().contact_groups.insert(group.id, group);
        self
    }

    pub fn with_membership(mut self, contact_id: i64, group_id: i64) -> Self {
        self.state
            .get_mut()
            .memberships
            .entry(contact_id)
            .or_default()
            .insert(group_id);
        self
    }

    pub fn with_access_group(mut self, contact_id: i64, group: AccessGroup) -> Self {
        self.state
            .get_mut()
            .access_groups
            .entry(contact_id)
            .or_default()
            .push(group);
        self
    }

    /// Add a contact to a contact group after construction.
    pub async fn add_membership(&self, contact_id: i64, group_id: i64) {
        self.state
            .write()
            .await
            .memberships
            .entry(contact_id)
            .or_default()
            .insert(group_id);
    }
}

#[async_trait]
impl ReadAccessGroupRepository for InMemoryDirectory {
    async fn find_by_contact(&self, contact_id: i64) -> Result<Vec<AccessGroup>> {
        Ok(self
            .state
            .read()
            .await
            .access_groups
            .get(&contact_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ReadContactRepository for InMemoryDirectory {
    async fn exist(&self, contact_ids: &[i64]) -> Result<Vec<i64>> {
        let state = self.state.read().await;
        Ok(contact_ids
            .iter()
            .copied()
            .filter(|id| state.contacts.contains_key(id))
            .collect())
    }
}

#[async_trait]
impl ReadContactGroupRepository for InMemoryDirectory {
    async fn find_all_by_user_id(&self, user_id: i64) -> Result<Vec<ContactGroup>> {
        let state = self.state.read().await;
        let Some(group_ids) = state.memberships.get(&user_id) else {
            return Ok(vec![]);
        };
        Ok(group_ids
            .iter()
            .filter_map(|id| state.contact_groups.get(id).cloned())
            .collect())
    }

    async fn exist(&self, group_ids: &[i64]) -> Result<Vec<i64>> {
        let state = self.state.read().await;
        Ok(group_ids
            .iter()
            .copied()
            .filter(|id| state.contact_groups.contains_key(id))
            .collect())
    }
}
