use super::rules::{
    FieldTableRule, HeightWindZoneRule, HvhzStateRule, InsulationConsistencyRule, RoofAreaRule,
    UnknownFieldsRule, ValidationRule,
};
use super::ValidationReport;
use crate::takeoff::TakeoffData;
use serde_json::{Map, Value};
use tracing::debug;

pub struct TakeoffValidator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl TakeoffValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    pub fn validate(&self, data: &Map<String, Value>) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            let before = (report.errors.len(), report.warnings.len());
            rule.check(data, &mut report);
            debug!(
                rule = rule.name(),
                errors = report.errors.len() - before.0,
                warnings = report.warnings.len() - before.1,
                "Validation rule applied"
            );
        }
        report.is_valid = report.errors.is_empty();
        report
    }

    /// Validates an arbitrary JSON value; anything but an object is invalid.
    pub fn validate_value(&self, value: &Value) -> ValidationReport {
        match value.as_object() {
            Some(map) => self.validate(map),
            None => {
                let mut report = ValidationReport::default();
                report.error("Takeoff data must be a JSON object");
                report.is_valid = false;
                report
            }
        }
    }

    pub fn validate_takeoff(&self, takeoff: &TakeoffData) -> ValidationReport {
        self.validate_value(&takeoff.to_value())
    }
}

impl Default for TakeoffValidator {
    fn default() -> Self {
        Self {
            rules: vec![
                Box::new(FieldTableRule),
                Box::new(HvhzStateRule),
                Box::new(InsulationConsistencyRule),
                Box::new(HeightWindZoneRule),
                Box::new(RoofAreaRule),
                Box::new(UnknownFieldsRule),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_takeoff() -> Value {
        json!({
            "project_name": "Warehouse 12",
            "address": "1200 Commerce Blvd, Tampa FL",
            "roof_area": 25000,
            "membrane_type": "TPO",
            "fastening_pattern": "Mechanically Attached",
            "deck_type": "Steel",
            "hvhz_zone": true,
            "state": "FL"
        })
    }

    #[test]
    fn test_valid_takeoff() {
        let report = TakeoffValidator::new().validate_value(&valid_takeoff());
        assert!(report.is_valid, "{:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_errors_accumulate_across_rules() {
        let mut data = valid_takeoff();
        data["roof_area"] = json!(50);
        data["insulation_type"] = json!("None");
        data["insulation_thickness"] = json!(1.5);
        data["notes"] = json!("gate code 1234");

        let report = TakeoffValidator::new().validate_value(&data);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.warnings, vec!["Unknown field: notes".to_string()]);
    }

    #[test]
    fn test_non_object_rejected() {
        let report = TakeoffValidator::new().validate_value(&json!([1, 2, 3]));
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_custom_rule_set() {
        let validator = TakeoffValidator::with_rules(vec![Box::new(RoofAreaRule)]);
        let report = validator.validate_value(&json!({ "roof_area": 200000 }));
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_validate_typed_takeoff() {
        let takeoff = TakeoffData::from_value(valid_takeoff()).unwrap();
        assert!(TakeoffValidator::new().validate_takeoff(&takeoff).is_valid);
    }
}
