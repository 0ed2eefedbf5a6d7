//! Static catalog of scope-of-work templates.
//!
//! The catalog is the single source of truth for template metadata. Selection
//! rules in [`super::registry`] refer to these records by id.

use super::normalize::{normalize_membrane_type, normalize_work_type};
use super::tokens::{AttachmentMethod, Complexity, DeckType, MembraneType, WorkType};
use serde::Serialize;

/// Template used when no selection rule matches.
pub const DEFAULT_TEMPLATE_ID: &str = "T2";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateRecord {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub work_type: WorkType,
    pub membrane_types: &'static [MembraneType],
    pub attachment_methods: &'static [AttachmentMethod],
    /// Empty means any deck.
    pub deck_types: &'static [DeckType],
    pub sections: &'static [&'static str],
    pub complexity: Complexity,
    pub estimated_duration: &'static str,
    pub restrictions: &'static [&'static str],
}

impl TemplateRecord {
    pub fn supports_membrane(&self, membrane: MembraneType) -> bool {
        self.membrane_types.contains(&membrane)
    }

    pub fn supports_attachment(&self, method: AttachmentMethod) -> bool {
        self.attachment_methods.contains(&method)
    }

    pub fn supports_deck(&self, deck: DeckType) -> bool {
        self.deck_types.is_empty() || self.deck_types.contains(&deck)
    }
}

/// Sorted by id.
pub static CATALOG: &[TemplateRecord] = &[
    TemplateRecord {
        id: "T2",
        name: "T2-Recover-TPO(MA)-cvr-bd-BUR-lwc-steel",
        description: "TPO recover over BUR on lightweight concrete and steel deck",
        work_type: WorkType::Recover,
        membrane_types: &[MembraneType::Tpo],
        attachment_methods: &[AttachmentMethod::MechanicallyAttached],
        deck_types: &[
            DeckType::Steel,
            DeckType::Concrete,
            DeckType::LightweightConcrete,
        ],
        sections: &[
            "project_overview",
            "existing_conditions",
            "scope_of_work",
            "materials",
            "installation",
            "fastening_requirements",
            "flashing_details",
            "warranty",
        ],
        complexity: Complexity::Standard,
        estimated_duration: "5-7 days per 10,000 sf",
        restrictions: &[],
    },
    TemplateRecord {
        id: "T4",
        name: "T4-Recover-TPOfleece(MA)-BUR-lwc-steel",
        description: "TPO fleeceback recover over BUR on steel (Note: Not for Prologis)",
        work_type: WorkType::Recover,
        membrane_types: &[MembraneType::TpoFleece],
        attachment_methods: &[AttachmentMethod::MechanicallyAttached],
        deck_types: &[DeckType::Steel],
        sections: &[
            "project_overview",
            "scope_of_work",
            "materials",
            "installation",
            "fleeceback_requirements",
        ],
        complexity: Complexity::Standard,
        estimated_duration: "4-6 days per 10,000 sf",
        restrictions: &["Not approved for Prologis projects"],
    },
    TemplateRecord {
        id: "T5",
        name: "T5-Recover-TPO(Rhino)-iso-EPS-flute-fill-SSR",
        description: "TPO with Rhino Bond over structural standing seam roof",
        work_type: WorkType::Recover,
        membrane_types: &[MembraneType::Tpo],
        // induction welding normalizes to rhino_bond
        attachment_methods: &[AttachmentMethod::RhinoBond],
        deck_types: &[DeckType::StructuralStandingSeam],
        sections: &[
            "project_overview",
            "scope_of_work",
            "materials",
            "installation",
            "rhino_bond_requirements",
            "EPS_flute_fill",
        ],
        complexity: Complexity::Complex,
        estimated_duration: "6-8 days per 10,000 sf",
        restrictions: &[],
    },
    TemplateRecord {
        id: "T6",
        name: "T6-Tearoff-TPO(MA)-insul-steel",
        description: "TPO tearoff and replacement with insulation on steel deck",
        work_type: WorkType::Tearoff,
        membrane_types: &[MembraneType::Tpo],
        attachment_methods: &[AttachmentMethod::MechanicallyAttached],
        deck_types: &[DeckType::Steel],
        sections: &[
            "project_overview",
            "tearoff_requirements",
            "scope_of_work",
            "materials",
            "insulation",
            "installation",
            "fastening",
            "warranty",
        ],
        complexity: Complexity::Standard,
        estimated_duration: "7-10 days per 10,000 sf",
        restrictions: &[],
    },
    TemplateRecord {
        id: "T7",
        name: "T7-Tearoff-TPO(MA)-insul-lwc-steel",
        description: "TPO tearoff over lightweight concrete on steel deck",
        work_type: WorkType::Tearoff,
        membrane_types: &[MembraneType::Tpo],
        attachment_methods: &[AttachmentMethod::MechanicallyAttached],
        deck_types: &[DeckType::LightweightConcrete, DeckType::Steel],
        sections: &[
            "project_overview",
            "tearoff_requirements",
            "scope_of_work",
            "materials",
            "insulation",
            "installation",
            "lwc_considerations",
        ],
        complexity: Complexity::Standard,
        estimated_duration: "8-11 days per 10,000 sf",
        restrictions: &[],
    },
    TemplateRecord {
        id: "T8",
        name: "T8-Tearoff-TPO(adhered)-insul(adhered)-gypsum",
        description: "Fully adhered TPO tearoff and replacement on gypsum deck",
        work_type: WorkType::Tearoff,
        membrane_types: &[MembraneType::Tpo],
        attachment_methods: &[AttachmentMethod::FullyAdhered],
        deck_types: &[DeckType::Gypsum],
        sections: &[
            "project_overview",
            "tearoff_requirements",
            "scope_of_work",
            "materials",
            "adhered_insulation",
            "adhered_membrane",
            "gypsum_requirements",
        ],
        complexity: Complexity::Complex,
        estimated_duration: "9-12 days per 10,000 sf",
        restrictions: &[],
    },
];

pub fn find(id: &str) -> Option<&'static TemplateRecord> {
    CATALOG.iter().find(|record| record.id == id)
}

/// The record behind [`DEFAULT_TEMPLATE_ID`].
pub fn default_template() -> &'static TemplateRecord {
    find(DEFAULT_TEMPLATE_ID).expect("default template missing from catalog")
}

/// Listing entry for discovery endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub template_id: &'static str,
    pub template_name: String,
    pub work_type: WorkType,
    pub membrane_types: &'static [MembraneType],
    pub attachment_methods: &'static [AttachmentMethod],
    pub deck_types: &'static [DeckType],
    pub complexity: Complexity,
    pub estimated_duration: &'static str,
}

impl From<&'static TemplateRecord> for TemplateSummary {
    fn from(record: &'static TemplateRecord) -> Self {
        let membranes: Vec<&str> = record.membrane_types.iter().map(|m| m.as_str()).collect();
        Self {
            template_id: record.id,
            template_name: format!("{}-{}-{}", record.id, record.work_type, membranes.join("-")),
            work_type: record.work_type,
            membrane_types: record.membrane_types,
            attachment_methods: record.attachment_methods,
            deck_types: record.deck_types,
            complexity: record.complexity,
            estimated_duration: record.estimated_duration,
        }
    }
}

/// Lists catalog templates sorted by id. Filters are free text and go through
/// the same normalization as selection inputs; an empty filter is ignored.
pub fn list_templates(
    work_type_filter: Option<&str>,
    membrane_type_filter: Option<&str>,
) -> Vec<TemplateSummary> {
    let work_type = work_type_filter
        .filter(|s| !s.is_empty())
        .map(normalize_work_type);
    let membrane = membrane_type_filter
        .filter(|s| !s.is_empty())
        .map(normalize_membrane_type);

    let mut templates: Vec<TemplateSummary> = CATALOG
        .iter()
        .filter(|record| work_type.map_or(true, |wt| record.work_type == wt))
        .filter(|record| membrane.map_or(true, |m| record.supports_membrane(m)))
        .map(TemplateSummary::from)
        .collect();

    templates.sort_by(|a, b| a.template_id.cmp(b.template_id));
    templates
}
