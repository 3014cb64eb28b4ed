//! Business logic layer

pub mod access;
pub mod resource_access;
pub mod rule_validator;

pub use access::{union_rules, AccessResolver};
pub use resource_access::ResourceAccessService;
pub use rule_validator::RuleValidator;
