//! URL handling module for Sumi-Mirror
//!
//! This module provides seed normalization, visited-set keys and host
//! comparison.

mod domain;
mod normalize;

pub use domain::{host_dir, same_host};
pub use normalize::{normalize_seed, visit_key};
