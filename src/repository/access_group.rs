//! ACL group lookup

use crate::domain::AccessGroup;
use crate::error::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadAccessGroupRepository: Send + Sync {
    async fn find_by_contact(&self, contact_id: i64) -> Result<Vec<AccessGroup>>;
}
