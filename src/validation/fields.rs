//! Declarative table of takeoff form fields.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use FieldKind::{Boolean, Number, Text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
        }
    }

    pub fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
        }
    }
}

/// JSON type name used in error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<&'static LazyLock<Regex>>,
    pub allowed_values: &'static [&'static str],
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl FieldSpec {
    const fn new(name: &'static str, description: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            description,
            required: false,
            kind,
            min_length: None,
            max_length: None,
            pattern: None,
            allowed_values: &[],
            min_value: None,
            max_value: None,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    const fn range(mut self, min: f64, max: f64) -> Self {
        self.min_value = Some(min);
        self.max_value = Some(max);
        self
    }

    const fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.allowed_values = values;
        self
    }

    const fn pattern(mut self, regex: &'static LazyLock<Regex>) -> Self {
        self.pattern = Some(regex);
        self
    }

    /// Returns the first failing check for `value` as an error message.
    pub fn check(&self, value: &Value) -> Option<String> {
        let name = self.name;
        if !self.kind.accepts(value) {
            return Some(format!(
                "{}: Expected {}, got {}",
                name,
                self.kind.name(),
                json_type_name(value)
            ));
        }

        if let Value::String(text) = value {
            let len = text.chars().count();
            if let Some(min) = self.min_length.filter(|min| len < *min) {
                return Some(format!("{}: Minimum length is {}, got {}", name, min, len));
            }
            if let Some(max) = self.max_length.filter(|max| len > *max) {
                return Some(format!("{}: Maximum length is {}, got {}", name, max, len));
            }
            if let Some(regex) = self.pattern {
                if !regex.is_match(text) {
                    return Some(format!(
                        "{}: Does not match required pattern {}",
                        name,
                        regex.as_str()
                    ));
                }
            }
            if !self.allowed_values.is_empty() && !self.allowed_values.contains(&text.as_str()) {
                return Some(format!(
                    "{}: Must be one of [{}], got '{}'",
                    name,
                    self.allowed_values.join(", "),
                    text
                ));
            }
        }

        if let Value::Number(number) = value {
            let n = number.as_f64().unwrap_or(f64::NAN);
            if let Some(min) = self.min_value.filter(|min| n < *min) {
                return Some(format!("{}: Minimum value is {}, got {}", name, min, number));
            }
            if let Some(max) = self.max_value.filter(|max| n > *max) {
                return Some(format!("{}: Maximum value is {}, got {}", name, max, number));
            }
        }

        None
    }
}

static WIND_ZONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(I|II|III|IV)$").expect("wind zone pattern"));
static STATE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("state code pattern"));

pub static FIELDS: &[FieldSpec] = &[
    FieldSpec::new("project_name", "Project name", Text)
        .required()
        .length(1, 100),
    FieldSpec::new("address", "Project address", Text)
        .required()
        .length(10, 200),
    FieldSpec::new("roof_area", "Roof area in square feet", Number)
        .required()
        .range(100.0, 1_000_000.0),
    FieldSpec::new("membrane_type", "Roofing membrane type", Text)
        .required()
        .one_of(&["TPO", "EPDM", "PVC", "Modified Bitumen", "Built-Up"]),
    FieldSpec::new("fastening_pattern", "Fastening pattern", Text)
        .required()
        .one_of(&["Mechanically Attached", "Fully Adhered", "Ballasted"]),
    FieldSpec::new("insulation_type", "Insulation type", Text)
        .one_of(&["Polyiso", "XPS", "EPS", "Mineral Wool", "None"]),
    FieldSpec::new("insulation_thickness", "Insulation thickness in inches", Number)
        .range(0.0, 12.0),
    FieldSpec::new("deck_type", "Roof deck type", Text)
        .one_of(&["Steel", "Concrete", "Wood", "Lightweight Concrete"]),
    FieldSpec::new("building_height", "Building height in feet", Number).range(8.0, 500.0),
    FieldSpec::new("wind_zone", "Wind zone classification", Text).pattern(&WIND_ZONE),
    FieldSpec::new("hvhz_zone", "High Velocity Hurricane Zone", Boolean),
    FieldSpec::new("county", "County name", Text).length(2, 50),
    FieldSpec::new("state", "State abbreviation", Text).pattern(&STATE_CODE),
    FieldSpec::new("building_code", "Applicable building code", Text)
        .one_of(&["IBC2021", "IBC2018", "FBC2020", "FBC2023"]),
    FieldSpec::new("asce_version", "ASCE 7 version", Text).one_of(&["7-16", "7-22", "7-10"]),
    FieldSpec::new("project_type", "Work type, e.g. recover or tearoff", Text).length(1, 50),
];

pub fn find_field(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|field| field.name == name)
}

pub fn is_known_field(name: &str) -> bool {
    find_field(name).is_some()
}
