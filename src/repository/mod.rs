//! Data access layer (Repository pattern)

pub mod access_group;
pub mod contact;
pub mod memory;
pub mod resource_access;

pub use access_group::ReadAccessGroupRepository;
pub use contact::{ReadContactGroupRepository, ReadContactRepository};
pub use memory::{InMemoryDirectory, InMemoryResourceAccessRepository};
pub use resource_access::{ReadResourceAccessRepository, WriteResourceAccessRepository};
