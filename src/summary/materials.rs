use serde::{Deserialize, Serialize};

const FASTENERS_PER_SQ_FT: f64 = 4.5;
const SQ_FT_PER_ADHESIVE_GALLON: f64 = 100.0;
const LBS_PER_SQ_FT: f64 = 1.2;

/// Rough material quantities derived from roof area. Counts truncate toward
/// zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialsEstimate {
    pub membrane_sq_ft: f64,
    pub fasteners_count: i64,
    pub plates_count: i64,
    pub adhesive_gallons: i64,
    pub estimated_weight_lbs: i64,
}

impl MaterialsEstimate {
    pub fn for_roof_area(roof_area: f64) -> Self {
        let fasteners = (roof_area * FASTENERS_PER_SQ_FT) as i64;
        Self {
            membrane_sq_ft: roof_area,
            fasteners_count: fasteners,
            plates_count: fasteners,
            adhesive_gallons: (roof_area / SQ_FT_PER_ADHESIVE_GALLON) as i64,
            estimated_weight_lbs: (roof_area * LBS_PER_SQ_FT) as i64,
        }
    }

    /// Number of line items, as reported by the workflow.
    pub fn item_count(&self) -> usize {
        5
    }
}

/// "<area / 2000 + 1> days"
pub fn estimated_duration(roof_area: f64) -> String {
    format!("{} days", (roof_area / 2000.0) as i64 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materials_for_area() {
        let m = MaterialsEstimate::for_roof_area(25_000.0);
        assert_eq!(m.membrane_sq_ft, 25_000.0);
        assert_eq!(m.fasteners_count, 112_500);
        assert_eq!(m.plates_count, 112_500);
        assert_eq!(m.adhesive_gallons, 250);
        assert_eq!(m.estimated_weight_lbs, 30_000);
    }

    #[test]
    fn test_materials_truncate() {
        let m = MaterialsEstimate::for_roof_area(150.5);
        assert_eq!(m.fasteners_count, 677);
        assert_eq!(m.adhesive_gallons, 1);
        assert_eq!(m.estimated_weight_lbs, 180);
    }

    #[test]
    fn test_estimated_duration() {
        assert_eq!(estimated_duration(0.0), "1 days");
        assert_eq!(estimated_duration(1999.0), "1 days");
        assert_eq!(estimated_duration(25_000.0), "13 days");
    }
}
