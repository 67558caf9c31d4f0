//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod resource_usage_repo;

pub use resource_usage_repo::ResourceUsageRepo;
