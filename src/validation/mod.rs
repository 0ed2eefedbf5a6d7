//! Takeoff field validation.
//!
//! A fixed field table plus a handful of cross-field business rules. The
//! validator gates the workflow before template selection runs.

pub mod fields;
pub mod rules;
pub mod validator;

use serde::{Deserialize, Serialize};

pub use rules::ValidationRule;
pub use validator::TakeoffValidator;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}
