//! Template selection over the rule registry.
//!
//! Selection never fails. An exact key match wins over a deck-wildcard match,
//! which wins over the default template. Work type, membrane and attachment
//! method are never relaxed.

use super::catalog::{self, TemplateRecord};
use super::confidence::Confidence;
use super::normalize::{
    normalize_attachment_method, normalize_deck_type, normalize_membrane_type,
    normalize_work_type,
};
use super::registry::{SelectionKey, SelectionRule, TemplateRegistry};
use super::tokens::{AttachmentMethod, Complexity, DeckType, MembraneType, WorkType};
use crate::takeoff::TakeoffData;
use serde::Serialize;
use tracing::debug;

pub const DECK_VERIFICATION_NOTE: &str =
    "Deck type needs verification for optimal template selection";
pub const NO_MATCH_NOTE: &str = "No exact template match found for specified parameters";
pub const DEFAULT_TEMPLATE_NOTE: &str = "Using default TPO recover template";
pub const MANUAL_REVIEW_NOTE: &str = "Manual review recommended for template selection";

const FALLBACK_DESCRIPTION: &str = "Default TPO template - requires manual review";
const FALLBACK_DURATION: &str = "To be determined based on final specifications";

/// Canonical tokens derived from a takeoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizedInputs {
    pub work_type: WorkType,
    pub membrane_type: MembraneType,
    pub attachment_method: AttachmentMethod,
    pub deck_type: Option<DeckType>,
}

impl NormalizedInputs {
    pub fn from_takeoff(takeoff: &TakeoffData) -> Self {
        Self {
            work_type: normalize_work_type(takeoff.project_type_text()),
            membrane_type: normalize_membrane_type(takeoff.membrane_type_text()),
            attachment_method: normalize_attachment_method(takeoff.fastening_pattern_text()),
            deck_type: normalize_deck_type(takeoff.deck_type_text()),
        }
    }

    pub fn key(&self) -> SelectionKey {
        SelectionKey::new(
            self.work_type,
            self.membrane_type,
            self.attachment_method,
            self.deck_type,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    DeckWildcard,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionResult {
    pub template_id: &'static str,
    pub template_name: &'static str,
    /// Description of the matching rule, or of the fallback.
    pub description: &'static str,
    pub template: &'static TemplateRecord,
    pub normalized_inputs: NormalizedInputs,
    pub match_kind: MatchKind,
    pub confidence: Confidence,
    pub notes: Vec<String>,
    pub complexity: Complexity,
    pub estimated_duration: &'static str,
    pub sections: &'static [&'static str],
}

impl SelectionResult {
    fn from_rule(
        rule: &SelectionRule,
        inputs: NormalizedInputs,
        match_kind: MatchKind,
        notes: Vec<String>,
    ) -> Self {
        let template = rule.template;
        Self {
            template_id: template.id,
            template_name: template.name,
            description: rule.description,
            template,
            normalized_inputs: inputs,
            match_kind,
            // a deck-wildcard match still reports high confidence; the note
            // carries the verification request
            confidence: Confidence::High,
            notes,
            complexity: template.complexity,
            estimated_duration: template.estimated_duration,
            sections: template.sections,
        }
    }

    fn fallback(inputs: NormalizedInputs) -> Self {
        let template = catalog::default_template();
        Self {
            template_id: template.id,
            template_name: template.name,
            description: FALLBACK_DESCRIPTION,
            template,
            normalized_inputs: inputs,
            match_kind: MatchKind::Fallback,
            confidence: Confidence::Low,
            notes: vec![
                NO_MATCH_NOTE.to_string(),
                DEFAULT_TEMPLATE_NOTE.to_string(),
                MANUAL_REVIEW_NOTE.to_string(),
            ],
            complexity: Complexity::RequiresReview,
            estimated_duration: FALLBACK_DURATION,
            sections: template.sections,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.match_kind == MatchKind::Fallback
    }
}

#[derive(Clone, Copy)]
pub struct TemplateSelector {
    registry: &'static TemplateRegistry,
}

impl TemplateSelector {
    pub fn new() -> Self {
        Self::with_registry(TemplateRegistry::shared())
    }

    pub fn with_registry(registry: &'static TemplateRegistry) -> Self {
        Self { registry }
    }

    pub fn select(&self, takeoff: &TakeoffData) -> SelectionResult {
        self.select_normalized(NormalizedInputs::from_takeoff(takeoff))
    }

    pub fn select_normalized(&self, inputs: NormalizedInputs) -> SelectionResult {
        let key = inputs.key();

        if let Some(rule) = self.registry.get(&key) {
            debug!(template = rule.template.id, ?key, "Exact template match");
            return SelectionResult::from_rule(rule, inputs, MatchKind::Exact, Vec::new());
        }

        // an absent deck was already looked up as the wildcard key above
        let wildcard = inputs
            .deck_type
            .and_then(|_| self.registry.get(&key.without_deck()));
        if let Some(rule) = wildcard {
            debug!(
                template = rule.template.id,
                ?key,
                "Template matched with deck type as wildcard"
            );
            return SelectionResult::from_rule(
                rule,
                inputs,
                MatchKind::DeckWildcard,
                vec![DECK_VERIFICATION_NOTE.to_string()],
            );
        }

        debug!(?key, "No selection rule matched, using default template");
        SelectionResult::fallback(inputs)
    }
}

impl Default for TemplateSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// Selects a template using the shared registry.
pub fn select_template(takeoff: &TakeoffData) -> SelectionResult {
    TemplateSelector::new().select(takeoff)
}
