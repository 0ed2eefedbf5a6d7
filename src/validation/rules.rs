use super::fields::{is_known_field, FIELDS};
use super::ValidationReport;
use serde_json::{Map, Value};

/// A check over the raw takeoff object. Rules append to the report and never
/// stop the remaining rules from running.
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn check(&self, data: &Map<String, Value>, report: &mut ValidationReport);
}

const HVHZ_STATES: &[&str] = &["FL", "TX", "LA", "MS", "AL"];
const LOW_WIND_ZONES: &[&str] = &["I", "II"];
const LARGE_ROOF_AREA: f64 = 100_000.0;
const TALL_BUILDING_FT: f64 = 60.0;

fn number(data: &Map<String, Value>, key: &str) -> Option<f64> {
    data.get(key).and_then(Value::as_f64)
}

fn text<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Required presence plus per-field type, length, pattern, value and range.
pub struct FieldTableRule;

impl ValidationRule for FieldTableRule {
    fn name(&self) -> &'static str {
        "FieldTable"
    }

    fn check(&self, data: &Map<String, Value>, report: &mut ValidationReport) {
        for field in FIELDS.iter().filter(|f| f.required) {
            match data.get(field.name) {
                None => report.error(format!(
                    "Missing required field: {} ({})",
                    field.name, field.description
                )),
                Some(value) => {
                    if let Some(err) = field.check(value) {
                        report.error(err);
                    }
                }
            }
        }

        for field in FIELDS.iter().filter(|f| !f.required) {
            if let Some(err) = data.get(field.name).and_then(|v| field.check(v)) {
                report.error(err);
            }
        }
    }
}

pub struct HvhzStateRule;

impl ValidationRule for HvhzStateRule {
    fn name(&self) -> &'static str {
        "HvhzState"
    }

    fn check(&self, data: &Map<String, Value>, report: &mut ValidationReport) {
        if !is_truthy(data.get("hvhz_zone")) {
            return;
        }
        let coastal = text(data, "state").is_some_and(|s| HVHZ_STATES.contains(&s));
        if !coastal {
            report.warning("HVHZ zone is typically only required in coastal states");
        }
    }
}

pub struct InsulationConsistencyRule;

impl ValidationRule for InsulationConsistencyRule {
    fn name(&self) -> &'static str {
        "InsulationConsistency"
    }

    fn check(&self, data: &Map<String, Value>, report: &mut ValidationReport) {
        let no_insulation = text(data, "insulation_type") == Some("None");
        let thickness = number(data, "insulation_thickness").unwrap_or(0.0);
        if no_insulation && thickness > 0.0 {
            report.error("Insulation thickness cannot be > 0 when insulation type is 'None'");
        }
    }
}

pub struct HeightWindZoneRule;

impl ValidationRule for HeightWindZoneRule {
    fn name(&self) -> &'static str {
        "HeightWindZone"
    }

    fn check(&self, data: &Map<String, Value>, report: &mut ValidationReport) {
        let height = number(data, "building_height").unwrap_or(0.0);
        let low_zone = text(data, "wind_zone").is_some_and(|z| LOW_WIND_ZONES.contains(&z));
        if height > TALL_BUILDING_FT && low_zone {
            report.warning("Tall buildings typically require higher wind zones");
        }
    }
}

pub struct RoofAreaRule;

impl ValidationRule for RoofAreaRule {
    fn name(&self) -> &'static str {
        "RoofArea"
    }

    fn check(&self, data: &Map<String, Value>, report: &mut ValidationReport) {
        if number(data, "roof_area").is_some_and(|area| area > LARGE_ROOF_AREA) {
            report.warning("Very large roof area - please verify measurement");
        }
    }
}

pub struct UnknownFieldsRule;

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &'static str {
        "UnknownFields"
    }

    fn check(&self, data: &Map<String, Value>, report: &mut ValidationReport) {
        let mut unknown: Vec<&String> = data.keys().filter(|k| !is_known_field(k)).collect();
        unknown.sort();
        for field in unknown {
            report.warning(format!("Unknown field: {}", field));
        }
    }
}
