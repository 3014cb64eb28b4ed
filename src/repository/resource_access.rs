//! Resource access rule repositories

use crate::domain::{FilterType, NewRule, Rule};
use crate::error::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadResourceAccessRepository: Send + Sync {
    async fn find_by_id(&self, rule_id: i64) -> Result<Option<Rule>>;
    async fn find_all(&self) -> Result<Vec<Rule>>;
    /// Rules directly bound to the contact.
    async fn find_by_contact_id(&self, contact_id: i64) -> Result<Vec<Rule>>;
    /// Rules bound to at least one of the contact groups.
    async fn find_by_contact_group_ids(&self, group_ids: &[i64]) -> Result<Vec<Rule>>;
    /// Whether a rule with this formatted name exists.
    async fn exists_by_name(&self, formatted_name: &str) -> Result<bool>;
    /// Subset of `resource_ids` that exist in the monitoring inventory.
    async fn exist_resources(
        &self,
        filter_type: FilterType,
        resource_ids: &[i64],
    ) -> Result<Vec<i64>>;
}

/// Write side. Implementations backed by a store with a unique index on the
/// formatted name should report a clash as `AppError::Conflict`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WriteResourceAccessRepository: Send + Sync {
    /// Persist a new rule and return its assigned ID.
    async fn add(&self, rule: &NewRule) -> Result<i64>;
    /// Replace every field of an existing rule.
    async fn update(&self, rule: &Rule) -> Result<()>;
    async fn delete(&self, rule_id: i64) -> Result<()>;
}
