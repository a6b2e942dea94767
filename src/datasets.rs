//! Built-in demonstration datasets.
//!
//! Each dataset belongs to one model and is kept as-is; they use different
//! city lists and units and are not meant to be combined.

use crate::gravity::{Candidate, DemandPoint, GravityInput};
use crate::record::SiteTable;

/// Thirteen Indian cities with cost and benefit attributes for the
/// composite attraction score.
///
/// Units: Water ₹/1000 L, Energy ₹/kWh, Workforce ₹/year, Renewable %,
/// LandCost ₹/sq ft, LandAvail / Network / Climate 1-10 indices.
pub fn indian_cities() -> SiteTable {
    SiteTable::from_columns(
        &[
            "Mumbai", "Gurgaon", "Nagpur", "Hyderabad", "Mangalore", "Bangalore", "Pune",
            "Ahmedabad", "Noida", "Chandigarh", "Jaipur", "Kolkata", "Bhopal",
        ],
        &[
            (
                "Water",
                &[50.0, 50.0, 21.5, 80.0, 80.0, 68.5, 21.5, 30.0, 40.0, 20.0, 30.0, 25.0, 20.0],
            ),
            (
                "Energy",
                &[7.5, 6.75, 7.0, 6.3, 7.0, 7.15, 7.0, 7.5, 8.2, 7.0, 7.5, 8.1, 7.0],
            ),
            (
                "Workforce",
                &[
                    803000.0, 771000.0, 550000.0, 746000.0, 550000.0, 891000.0, 720000.0,
                    720000.0, 771000.0, 700000.0, 640000.0, 643000.0, 550000.0,
                ],
            ),
            (
                "Renewable",
                &[45.0, 29.0, 45.0, 42.9, 70.8, 70.8, 45.0, 59.5, 18.3, 36.5, 74.6, 13.5, 32.0],
            ),
            (
                "LandCost",
                &[
                    3000.0, 2500.0, 475.0, 1200.0, 800.0, 2000.0, 1500.0, 1000.0, 2500.0, 1200.0,
                    800.0, 1000.0, 500.0,
                ],
            ),
            (
                "LandAvail",
                &[3.0, 6.0, 9.0, 8.0, 7.0, 5.0, 7.0, 8.0, 7.0, 6.0, 8.0, 6.0, 9.0],
            ),
            (
                "Network",
                &[10.0, 8.0, 5.0, 8.0, 6.0, 9.0, 7.0, 6.0, 9.0, 6.0, 6.0, 6.0, 5.0],
            ),
            (
                "Climate",
                &[5.0, 7.0, 8.0, 8.0, 6.0, 7.0, 8.0, 7.0, 7.0, 7.0, 8.0, 6.0, 9.0],
            ),
        ],
    )
    .expect("static dataset is well-formed")
}

/// Four metro sites for the capacity-constrained selection model.
///
/// Attributes: `EnergyCost` $/kWh, `Renewable` grid fraction, `LandCost`
/// relative land + build cost, `Latency` ms to the main user base,
/// `Capacity` MW of available power.
pub fn metro_sites() -> SiteTable {
    SiteTable::from_columns(
        &["Mumbai", "Hyderabad", "Chennai", "Delhi"],
        &[
            ("EnergyCost", &[0.10, 0.08, 0.09, 0.07]),
            ("Renewable", &[0.50, 0.60, 0.40, 0.30]),
            ("LandCost", &[5.0, 3.0, 4.0, 6.0]),
            ("Latency", &[10.0, 20.0, 15.0, 25.0]),
            ("Capacity", &[100.0, 120.0, 90.0, 110.0]),
        ],
    )
    .expect("static dataset is well-formed")
}

/// Five generic candidate sites for the single-site selection model and
/// clustering.
///
/// Attributes: `Cost` millions USD, `Renewable` fraction, `Connectivity`
/// 0-100 score, `Risk` climate risk index.
pub fn generic_sites() -> SiteTable {
    SiteTable::from_columns(
        &["A", "B", "C", "D", "E"],
        &[
            ("Cost", &[10.0, 12.0, 9.0, 11.0, 13.0]),
            ("Renewable", &[0.5, 0.6, 0.55, 0.45, 0.7]),
            ("Connectivity", &[80.0, 75.0, 90.0, 85.0, 70.0]),
            ("Risk", &[0.3, 0.4, 0.2, 0.25, 0.35]),
        ],
    )
    .expect("static dataset is well-formed")
}

/// Three candidate sites, three demand points and their distance matrix
/// (km) for the gravity model.
pub fn gravity_demo() -> GravityInput {
    GravityInput {
        candidates: vec![
            Candidate::new("Site1", 10.0, 0.90, 0.6),
            Candidate::new("Site2", 8.0, 0.85, 0.7),
            Candidate::new("Site3", 12.0, 0.95, 0.5),
        ],
        demand: vec![
            DemandPoint::new("D1", 100.0),
            DemandPoint::new("D2", 150.0),
            DemandPoint::new("D3", 120.0),
        ],
        distances: vec![
            vec![20.0, 25.0, 30.0],
            vec![35.0, 30.0, 40.0],
            vec![30.0, 40.0, 20.0],
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datasets_shapes() {
        assert_eq!(indian_cities().len(), 13);
        assert_eq!(indian_cities().attribute_names().len(), 8);
        assert_eq!(metro_sites().len(), 4);
        assert_eq!(generic_sites().len(), 5);
        let g = gravity_demo();
        assert_eq!(g.distances.len(), g.demand.len());
        assert!(g.distances.iter().all(|row| row.len() == g.candidates.len()));
    }
}
