//! Domain models for the resource access rule engine

pub mod contact;
pub mod dataset_filter;
pub mod filter_type;
pub mod rule;

pub use contact::*;
pub use dataset_filter::*;
pub use filter_type::*;
pub use rule::*;
