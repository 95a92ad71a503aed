//! Port traits (interfaces) for hexagonal architecture.

pub mod config_port;
pub mod dataset_port;
pub mod export_port;
