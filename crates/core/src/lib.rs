//! `quotas-core` -- pure domain logic for resource-usage quotas.
//!
//! Nothing in this crate touches the database or the network. The `db`
//! crate persists what is modelled here and the `worker` crate drives it.

pub mod error;
pub mod metric_names;
pub mod plugin_path;
pub mod schedule;
pub mod types;
pub mod usage;
