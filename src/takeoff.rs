//! Takeoff form data as submitted by the estimator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A roofing takeoff record.
///
/// Every field is optional at this level; the field validator decides what is
/// required. Fields outside the known set are kept in `extra` so they survive
/// a save/load round trip and can be reported as unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TakeoffData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roof_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membrane_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fastening_pattern: Option<String>,
    /// Free-text work type hint, e.g. "recover" or "tear-off".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insulation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insulation_thickness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hvhz_zone: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asce_version: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl TakeoffData {
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Best-effort conversion for selection, which never rejects input.
    /// Fields whose value does not fit their type are dropped; a non-object
    /// yields an empty takeoff.
    pub fn from_value_lenient(value: &Value) -> Self {
        let Value::Object(fields) = value else {
            return Self::default();
        };

        let mut kept = Map::new();
        for (name, field) in fields {
            let single = Value::Object(Map::from_iter([(name.clone(), field.clone())]));
            if serde_json::from_value::<Self>(single).is_ok() {
                kept.insert(name.clone(), field.clone());
            }
        }
        serde_json::from_value(Value::Object(kept)).unwrap_or_default()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn project_type_text(&self) -> &str {
        self.project_type.as_deref().unwrap_or("")
    }

    pub fn membrane_type_text(&self) -> &str {
        self.membrane_type.as_deref().unwrap_or("")
    }

    pub fn fastening_pattern_text(&self) -> &str {
        self.fastening_pattern.as_deref().unwrap_or("")
    }

    pub fn deck_type_text(&self) -> &str {
        self.deck_type.as_deref().unwrap_or("")
    }

    pub fn roof_area_or_zero(&self) -> f64 {
        self.roof_area.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_known_and_extra_fields() {
        let takeoff = TakeoffData::from_value(json!({
            "project_name": "Warehouse 12",
            "roof_area": 25000,
            "membrane_type": "TPO",
            "deck_type": null,
            "estimator": "JS"
        }))
        .unwrap();

        assert_eq!(takeoff.project_name.as_deref(), Some("Warehouse 12"));
        assert_eq!(takeoff.roof_area, Some(25000.0));
        assert_eq!(takeoff.deck_type, None);
        assert_eq!(takeoff.extra.get("estimator"), Some(&json!("JS")));
    }

    #[test]
    fn test_text_accessors_default_to_empty() {
        let takeoff = TakeoffData::default();
        assert_eq!(takeoff.project_type_text(), "");
        assert_eq!(takeoff.deck_type_text(), "");
        assert_eq!(takeoff.roof_area_or_zero(), 0.0);
    }

    #[test]
    fn test_lenient_drops_mistyped_fields() {
        let takeoff = TakeoffData::from_value_lenient(&json!({
            "project_type": "recover",
            "deck_type": "Steel",
            "roof_area": "big",
            "hvhz_zone": "yes",
            "estimator": 7
        }));

        assert_eq!(takeoff.project_type.as_deref(), Some("recover"));
        assert_eq!(takeoff.deck_type.as_deref(), Some("Steel"));
        assert_eq!(takeoff.roof_area, None);
        assert_eq!(takeoff.hvhz_zone, None);
        assert_eq!(takeoff.extra.get("estimator"), Some(&json!(7)));
    }

    #[test]
    fn test_lenient_non_object_is_empty() {
        assert_eq!(TakeoffData::from_value_lenient(&json!([1, 2])), TakeoffData::default());
        assert_eq!(TakeoffData::from_value_lenient(&json!(null)), TakeoffData::default());
    }

    #[test]
    fn test_to_value_skips_missing() {
        let takeoff = TakeoffData {
            membrane_type: Some("EPDM".to_string()),
            ..Default::default()
        };
        assert_eq!(takeoff.to_value(), json!({ "membrane_type": "EPDM" }));
    }
}
