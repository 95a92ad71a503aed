//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod csv_export_adapter;
pub mod dataset_cache;
pub mod file_config_adapter;
