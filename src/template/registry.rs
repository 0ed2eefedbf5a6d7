//! Exact-match index from selection keys to catalog templates.

use super::catalog::{self, TemplateRecord};
use super::tokens::{AttachmentMethod, DeckType, MembraneType, WorkType};
use AttachmentMethod::{FullyAdhered, MechanicallyAttached, RhinoBond};
use DeckType::{Concrete, Gypsum, LightweightConcrete, Steel, StructuralStandingSeam};
use MembraneType::{Tpo, TpoFleece};
use WorkType::{Recover, Tearoff};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Lookup key for selection rules. A `None` deck is a wildcard entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SelectionKey {
    pub work_type: WorkType,
    pub membrane_type: MembraneType,
    pub attachment_method: AttachmentMethod,
    pub deck_type: Option<DeckType>,
}

impl SelectionKey {
    pub const fn new(
        work_type: WorkType,
        membrane_type: MembraneType,
        attachment_method: AttachmentMethod,
        deck_type: Option<DeckType>,
    ) -> Self {
        Self {
            work_type,
            membrane_type,
            attachment_method,
            deck_type,
        }
    }

    pub fn without_deck(self) -> Self {
        Self {
            deck_type: None,
            ..self
        }
    }
}

/// A rule entry: which template a key resolves to and why.
#[derive(Debug, Clone, Copy)]
pub struct SelectionRule {
    pub template: &'static TemplateRecord,
    pub description: &'static str,
}

struct RuleSpec {
    key: SelectionKey,
    template_id: &'static str,
    description: &'static str,
}

const fn rule(
    work_type: WorkType,
    membrane_type: MembraneType,
    attachment_method: AttachmentMethod,
    deck_type: Option<DeckType>,
    template_id: &'static str,
    description: &'static str,
) -> RuleSpec {
    RuleSpec {
        key: SelectionKey::new(work_type, membrane_type, attachment_method, deck_type),
        template_id,
        description,
    }
}

static DEFAULT_RULES: &[RuleSpec] = &[
    // recover
    rule(
        Recover,
        Tpo,
        MechanicallyAttached,
        Some(Steel),
        "T2",
        "TPO recover over BUR on lightweight concrete and steel deck",
    ),
    rule(
        Recover,
        Tpo,
        MechanicallyAttached,
        Some(Concrete),
        "T2",
        "TPO recover over existing membrane on concrete",
    ),
    rule(
        Recover,
        TpoFleece,
        MechanicallyAttached,
        Some(Steel),
        "T4",
        "TPO fleeceback recover over BUR on steel (Note: Not for Prologis)",
    ),
    rule(
        Recover,
        Tpo,
        RhinoBond,
        Some(Steel),
        "T5",
        "TPO with Rhino Bond over structural standing seam roof",
    ),
    rule(
        Recover,
        Tpo,
        RhinoBond,
        Some(StructuralStandingSeam),
        "T5",
        "TPO with Rhino Bond over structural standing seam roof",
    ),
    // tearoff
    rule(
        Tearoff,
        Tpo,
        MechanicallyAttached,
        Some(Steel),
        "T6",
        "TPO tearoff and replacement with insulation on steel deck",
    ),
    rule(
        Tearoff,
        Tpo,
        MechanicallyAttached,
        Some(LightweightConcrete),
        "T7",
        "TPO tearoff over lightweight concrete on steel deck",
    ),
    rule(
        Tearoff,
        Tpo,
        FullyAdhered,
        Some(Gypsum),
        "T8",
        "Fully adhered TPO tearoff and replacement on gypsum deck",
    ),
    // deck to be determined
    rule(
        Recover,
        Tpo,
        MechanicallyAttached,
        None,
        "T2",
        "Standard TPO recover (deck type to be determined)",
    ),
    rule(
        Tearoff,
        Tpo,
        MechanicallyAttached,
        None,
        "T6",
        "Standard TPO tearoff (deck type to be determined)",
    ),
];

static SHARED: LazyLock<TemplateRegistry> = LazyLock::new(TemplateRegistry::with_defaults);

pub struct TemplateRegistry {
    rules: HashMap<SelectionKey, SelectionRule>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for spec in DEFAULT_RULES {
            registry.insert(spec.key, spec.template_id, spec.description);
        }
        registry
    }

    /// Process-wide registry built from the default rule table on first use.
    pub fn shared() -> &'static TemplateRegistry {
        &SHARED
    }

    /// Adds a rule pointing at a catalog template.
    ///
    /// # Panics
    ///
    /// Panics if `template_id` is not in the catalog. Rules and catalog are
    /// both compiled in, so a dangling id is a defect rather than bad input.
    pub fn insert(
        &mut self,
        key: SelectionKey,
        template_id: &str,
        description: &'static str,
    ) -> Option<SelectionRule> {
        let template = catalog::find(template_id).unwrap_or_else(|| {
            panic!(
                "selection rule {:?} references template '{}' which is not in the catalog",
                key, template_id
            )
        });
        self.rules.insert(
            key,
            SelectionRule {
                template,
                description,
            },
        )
    }

    pub fn get(&self, key: &SelectionKey) -> Option<&SelectionRule> {
        self.rules.get(key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules ordered by key, for stable listings.
    pub fn rules(&self) -> Vec<(&SelectionKey, &SelectionRule)> {
        let mut rules: Vec<_> = self.rules.iter().collect();
        rules.sort_by_key(|(key, _)| **key);
        rules
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
