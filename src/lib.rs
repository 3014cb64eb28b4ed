//! Resource Access Core - rule engine for monitoring resource access
//!
//! Validates and manages the rules that grant contacts and contact groups
//! visibility over monitoring resources, and resolves the rules that apply
//! to a given contact.

pub mod config;
pub mod domain;
pub mod error;
pub mod repository;
pub mod response;
pub mod service;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use response::UseCaseResponse;
