//! Template selection engine.
//!
//! Maps four categorical takeoff attributes (work type, membrane, attachment
//! method, deck) onto one entry of a fixed template catalog.
//!
//! - [`normalize`] turns free text into canonical tokens; it never fails.
//! - [`catalog`] holds the immutable template records.
//! - [`registry`] indexes catalog records by [`SelectionKey`].
//! - [`selector`] performs exact, deck-wildcard, then default lookup.
//! - [`compatibility`] re-checks a chosen template against the takeoff.
//!
//! ```
//! use sowgen::takeoff::TakeoffData;
//! use sowgen::template::{select_template, Confidence};
//!
//! let takeoff = TakeoffData {
//!     project_type: Some("tearoff".into()),
//!     membrane_type: Some("TPO".into()),
//!     fastening_pattern: Some("Fully Adhered".into()),
//!     deck_type: Some("Gypsum".into()),
//!     ..Default::default()
//! };
//! let result = select_template(&takeoff);
//! assert_eq!(result.template_id, "T8");
//! assert_eq!(result.confidence, Confidence::High);
//! ```

#[macro_use]
pub mod token_enum_macro;

pub mod catalog;
pub mod compatibility;
pub mod confidence;
pub mod normalize;
pub mod registry;
pub mod selector;
pub mod tokens;

pub use catalog::{list_templates, TemplateRecord, TemplateSummary, CATALOG, DEFAULT_TEMPLATE_ID};
pub use compatibility::{validate_compatibility, CompatibilityReport};
pub use confidence::Confidence;
pub use registry::{SelectionKey, SelectionRule, TemplateRegistry};
pub use selector::{select_template, MatchKind, NormalizedInputs, SelectionResult, TemplateSelector};
pub use tokens::{AttachmentMethod, Complexity, DeckType, MembraneType, WorkType};
