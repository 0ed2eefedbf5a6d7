//! sowgen - roofing takeoff to scope-of-work generator
//!
//! Takes a roofing takeoff form, validates it, picks the construction
//! template that fits its work type, membrane, attachment method and deck,
//! and renders a scope-of-work summary plus a placeholder document. Progress
//! is recorded to an optional project store on a best-effort basis.
//!
//! # Example Usage
//!
//! ```
//! use sowgen::template::select_template;
//! use sowgen::TakeoffData;
//!
//! let takeoff = TakeoffData {
//!     project_type: Some("Tear-off".to_string()),
//!     membrane_type: Some("TPO".to_string()),
//!     fastening_pattern: Some("Fully Adhered".to_string()),
//!     deck_type: Some("Gypsum".to_string()),
//!     ..Default::default()
//! };
//!
//! let selection = select_template(&takeoff);
//! assert_eq!(selection.template_id, "T8");
//! ```
//!
//! # Project Structure
//!
//! - [`template`]: normalization, catalog, selection and compatibility
//! - [`validation`]: takeoff field table and business rules
//! - [`summary`]: SOW summary and placeholder document
//! - [`store`]: best-effort persistence
//! - [`workflow`]: the phased submission pipeline
//! - [`api`] and [`cli`]: HTTP and command-line surfaces

pub mod api;
pub mod cli;
pub mod config;
pub mod progress;
pub mod store;
pub mod summary;
pub mod takeoff;
pub mod template;
pub mod util;
pub mod validation;
pub mod workflow;

pub use config::{ConfigError, SowgenConfig};
pub use store::{ProjectStore, StoreError};
pub use summary::SowSummary;
pub use takeoff::TakeoffData;
pub use template::{select_template, validate_compatibility, CompatibilityReport, SelectionResult};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};
pub use validation::{TakeoffValidator, ValidationReport};
pub use workflow::{WorkflowError, WorkflowOrchestrator, WorkflowResult, WorkflowStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_sowgen() {
        assert_eq!(NAME, "sowgen");
    }
}
