//! Mapping of free-text takeoff fields onto canonical tokens.
//!
//! Every function here is total: any input, including an empty string,
//! yields a token. Matching is substring based and case-insensitive, and the
//! order of checks within each function is significant.

use super::tokens::{AttachmentMethod, DeckType, MembraneType, WorkType};

/// Defaults to `Recover` when neither work type is mentioned.
pub fn normalize_work_type(text: &str) -> WorkType {
    let text = text.trim().to_lowercase();
    if text.contains("recover") || text.contains("re-cover") {
        WorkType::Recover
    } else if text.contains("tearoff") || text.contains("tear-off") || text.contains("replacement")
    {
        WorkType::Tearoff
    } else {
        WorkType::Recover
    }
}

/// Fleece is checked before plain TPO since "TPO Fleeceback" contains both.
/// Defaults to `Tpo`.
pub fn normalize_membrane_type(text: &str) -> MembraneType {
    let text = text.trim().to_uppercase();
    if text.contains("FLEECE") || text.contains("FLEECEBACK") {
        MembraneType::TpoFleece
    } else if text.contains("TPO") {
        MembraneType::Tpo
    } else if text.contains("EPDM") {
        MembraneType::Epdm
    } else if text.contains("PVC") {
        MembraneType::Pvc
    } else {
        MembraneType::Tpo
    }
}

/// "attached" wins over "fully", so "Fully Attached" is mechanically attached.
/// Defaults to `MechanicallyAttached`.
pub fn normalize_attachment_method(text: &str) -> AttachmentMethod {
    let text = text.trim().to_lowercase();
    if text.contains("mechanical") || text.contains("attached") {
        AttachmentMethod::MechanicallyAttached
    } else if text.contains("adhered") || text.contains("fully") {
        AttachmentMethod::FullyAdhered
    } else if text.contains("rhino") || text.contains("induction") {
        AttachmentMethod::RhinoBond
    } else if text.contains("ballasted") {
        AttachmentMethod::Ballasted
    } else {
        AttachmentMethod::MechanicallyAttached
    }
}

/// Returns `None` for empty or unrecognized input; `None` acts as a wildcard
/// during template lookup.
pub fn normalize_deck_type(text: &str) -> Option<DeckType> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    if text.contains("steel") {
        Some(DeckType::Steel)
    } else if text.contains("concrete") {
        if text.contains("lightweight") || text.contains("lwc") {
            Some(DeckType::LightweightConcrete)
        } else {
            Some(DeckType::Concrete)
        }
    } else if text.contains("gypsum") {
        Some(DeckType::Gypsum)
    } else if text.contains("wood") {
        Some(DeckType::Wood)
    } else if text.contains("standing") && text.contains("seam") {
        Some(DeckType::StructuralStandingSeam)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_type_variants() {
        assert_eq!(normalize_work_type("Recover"), WorkType::Recover);
        assert_eq!(normalize_work_type("  RE-COVER over BUR "), WorkType::Recover);
        assert_eq!(normalize_work_type("Tear-Off"), WorkType::Tearoff);
        assert_eq!(normalize_work_type("full replacement"), WorkType::Tearoff);
    }

    #[test]
    fn test_work_type_default() {
        assert_eq!(normalize_work_type(""), WorkType::Recover);
        assert_eq!(normalize_work_type("new construction"), WorkType::Recover);
    }

    #[test]
    fn test_membrane_fleece_precedes_tpo() {
        assert_eq!(normalize_membrane_type("TPO Fleeceback"), MembraneType::TpoFleece);
        assert_eq!(normalize_membrane_type("fleece"), MembraneType::TpoFleece);
        assert_eq!(normalize_membrane_type("tpo"), MembraneType::Tpo);
    }

    #[test]
    fn test_membrane_other_families() {
        assert_eq!(normalize_membrane_type("EPDM 60 mil"), MembraneType::Epdm);
        assert_eq!(normalize_membrane_type("pvc"), MembraneType::Pvc);
        assert_eq!(normalize_membrane_type("Modified Bitumen"), MembraneType::Tpo);
        assert_eq!(normalize_membrane_type(""), MembraneType::Tpo);
    }

    #[test]
    fn test_attachment_precedence() {
        assert_eq!(
            normalize_attachment_method("Fully Attached"),
            AttachmentMethod::MechanicallyAttached
        );
        assert_eq!(
            normalize_attachment_method("Fully Adhered"),
            AttachmentMethod::FullyAdhered
        );
        assert_eq!(
            normalize_attachment_method("Mechanically Attached"),
            AttachmentMethod::MechanicallyAttached
        );
    }

    #[test]
    fn test_attachment_rhino_and_ballast() {
        assert_eq!(normalize_attachment_method("Rhino Bond"), AttachmentMethod::RhinoBond);
        assert_eq!(
            normalize_attachment_method("induction welded"),
            AttachmentMethod::RhinoBond
        );
        assert_eq!(normalize_attachment_method("Ballasted"), AttachmentMethod::Ballasted);
        assert_eq!(
            normalize_attachment_method("glued"),
            AttachmentMethod::MechanicallyAttached
        );
    }

    #[test]
    fn test_deck_types() {
        assert_eq!(normalize_deck_type("Steel"), Some(DeckType::Steel));
        assert_eq!(normalize_deck_type("Concrete"), Some(DeckType::Concrete));
        assert_eq!(
            normalize_deck_type("Lightweight Concrete"),
            Some(DeckType::LightweightConcrete)
        );
        assert_eq!(
            normalize_deck_type("LWC concrete fill"),
            Some(DeckType::LightweightConcrete)
        );
        assert_eq!(normalize_deck_type("gypsum"), Some(DeckType::Gypsum));
        assert_eq!(normalize_deck_type("Wood plank"), Some(DeckType::Wood));
        assert_eq!(
            normalize_deck_type("Structural Standing Seam"),
            Some(DeckType::StructuralStandingSeam)
        );
    }

    #[test]
    fn test_deck_unknown_is_wildcard() {
        assert_eq!(normalize_deck_type(""), None);
        assert_eq!(normalize_deck_type("   "), None);
        assert_eq!(normalize_deck_type("bamboo"), None);
        assert_eq!(normalize_deck_type("Unknown Deck Material"), None);
        // lightweight without concrete is not a recognized deck
        assert_eq!(normalize_deck_type("lwc"), None);
    }

    #[test]
    fn test_normalizers_are_total_on_noise() {
        for input in ["", "\u{1F3E0}\u{0301}", "ñandú", "\0", "%%%", "Tpo\u{00A0}Fleece"] {
            let _ = normalize_work_type(input);
            let _ = normalize_membrane_type(input);
            let _ = normalize_attachment_method(input);
            let _ = normalize_deck_type(input);
        }
    }
}
