//! Validation schema: the type map and the condition rules.

mod rule;
mod type_map;
mod types;

pub use rule::{Rule, RuleSet, normalize_condition};
pub use type_map::TypeMap;
pub use types::ExpectedType;
