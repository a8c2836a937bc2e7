use crate::traits::Record;
use std::fmt::{self, Display};
use thiserror::Error as ThisError;

///
/// Violation
///
/// One constraint violation. Collection is non-failing: all violations are
/// gathered and returned together, the caller decides how to interpret them.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Violation {
    pub field: Option<String>,
    pub message: String,
}

impl Violation {
    #[must_use]
    pub fn new(field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            field: field.map(str::to_string),
            message: message.into(),
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

///
/// ValidationError
///
/// Aggregate of all violations found on one instance. A non-empty set
/// aborts persist before any write.
///

#[derive(Debug, ThisError)]
#[error("validation failed: {}", format_violations(violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

///
/// Validator
///
/// Injected constraint-checking capability, invoked before persist.
///

pub trait Validator: Send + Sync {
    fn validate(&self, record: &dyn Record) -> Vec<Violation>;
}

/// Default validator: accepts every instance.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl Validator for AcceptAll {
    fn validate(&self, _record: &dyn Record) -> Vec<Violation> {
        Vec::new()
    }
}
