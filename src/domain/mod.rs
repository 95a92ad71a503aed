//! Core domain types and logic.

pub mod aggregate;
pub mod config_validation;
pub mod dataset;
pub mod district;
pub mod error;
pub mod filter;
pub mod record;
pub mod selection;
