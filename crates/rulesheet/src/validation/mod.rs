//! Validation engine: type checks and condition rules over normalized rows.

mod classifier;
mod record;
mod validators;

pub use classifier::{Classification, TypeClass, TypeClassifier};
pub use record::{ErrorCategory, ErrorRecord};
pub use validators::{
    ConditionRuleValidator, DataTypeValidator, ValidationEngine, ValidationOutcome, Validator,
};
