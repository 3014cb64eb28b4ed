//! Contact and contact group directory lookups

use crate::domain::ContactGroup;
use crate::error::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadContactRepository: Send + Sync {
    /// Subset of `contact_ids` that exist.
    async fn exist(&self, contact_ids: &[i64]) -> Result<Vec<i64>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadContactGroupRepository: Send + Sync {
    /// Contact groups the user belongs to.
    async fn find_all_by_user_id(&self, user_id: i64) -> Result<Vec<ContactGroup>>;
    /// Subset of `group_ids` that exist.
    async fn exist(&self, group_ids: &[i64]) -> Result<Vec<i64>>;
}
