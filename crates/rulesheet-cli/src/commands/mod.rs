//! CLI command implementations.

pub mod lint;
pub mod validate;
