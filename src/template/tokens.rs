crate::define_token_enum! {
    /// Kind of roofing work
    WorkType {
        Recover => "recover",
        Tearoff => "tearoff",
    }
}

crate::define_token_enum! {
    /// Canonical membrane family
    MembraneType {
        Tpo => "TPO",
        TpoFleece => "TPO_fleece",
        Epdm => "EPDM",
        Pvc => "PVC",
    }
}

crate::define_token_enum! {
    /// How the membrane is secured to the roof assembly
    AttachmentMethod {
        MechanicallyAttached => "mechanically_attached",
        FullyAdhered => "fully_adhered",
        RhinoBond => "rhino_bond",
        Ballasted => "ballasted",
    }
}

crate::define_token_enum! {
    /// Structural deck material. An unrecognized deck is represented as `None`
    /// at use sites rather than as a variant.
    DeckType {
        Steel => "steel",
        Concrete => "concrete",
        LightweightConcrete => "lightweight_concrete",
        Gypsum => "gypsum",
        Wood => "wood",
        StructuralStandingSeam => "structural_standing_seam",
    }
}

crate::define_token_enum! {
    Complexity {
        Standard => "standard",
        Complex => "complex",
        RequiresReview => "requires_review",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membrane_serialization() {
        assert_eq!(serde_json::to_string(&MembraneType::Tpo).unwrap(), "\"TPO\"");
        assert_eq!(
            serde_json::to_string(&MembraneType::TpoFleece).unwrap(),
            "\"TPO_fleece\""
        );
    }

    #[test]
    fn test_deck_deserialization() {
        assert_eq!(
            serde_json::from_str::<DeckType>("\"structural_standing_seam\"").unwrap(),
            DeckType::StructuralStandingSeam
        );
    }

    #[test]
    fn test_unknown_token_rejected() {
        let err = serde_json::from_str::<WorkType>("\"reroof\"").unwrap_err();
        assert!(err.to_string().contains("reroof"));
        assert_eq!(AttachmentMethod::from_token("induction_welded"), None);
    }

    #[test]
    fn test_tokens_match_variants() {
        assert_eq!(DeckType::TOKENS.len(), DeckType::all_variants().len());
        for variant in Complexity::all_variants() {
            assert_eq!(Complexity::from_token(variant.as_str()), Some(*variant));
        }
    }

    #[test]
    fn test_display_uses_token() {
        assert_eq!(AttachmentMethod::RhinoBond.to_string(), "rhino_bond");
        assert_eq!(WorkType::Tearoff.to_string(), "tearoff");
    }
}
