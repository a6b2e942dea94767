//! The fixed feature vector of the cluster predictor.

use crate::error::{Error, Result};
use crate::record::DatacenterRecord;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Feature names in model input order.
pub const FEATURE_NAMES: [&str; 14] = [
    "ENERGY",
    "AREA",
    "IT EQUIPMENT POWER",
    "State_Aggregated_PUE",
    "FULL_CABINETS",
    "PARTIAL_CABINETS",
    "SHARED_RACKSPACE",
    "CAGES",
    "SUITES",
    "BUILD_TO_SUIT",
    "FOOTPRINTS",
    "REMOTE_HANDS",
    "YEAR_OPERATIONAL",
    "State_Aggregated_IXP_Count",
];

const ENERGY_MW: RangeInclusive<f64> = 1.0..=150.0;
const AREA_SQFT: RangeInclusive<f64> = 1_000.0..=500_000.0;
const IT_POWER_MW: RangeInclusive<f64> = 0.5..=100.0;
const PUE: RangeInclusive<f64> = 0.0..=5.0;
const YEAR: RangeInclusive<i32> = 1920..=2025;
const IXP_COUNT: RangeInclusive<f64> = 0.0..=5.0;

/// Description of a (possibly planned) data center.
///
/// # Example
///
/// ```
/// use dcsite::cluster::DatacenterFeatures;
///
/// let features = DatacenterFeatures::default();
/// assert!(features.validate().is_ok());
/// assert_eq!(features.to_vector().len(), 14);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatacenterFeatures {
    pub energy_mw: f64,
    pub area_sqft: f64,
    pub it_power_mw: f64,
    pub pue: f64,
    /// Service flags in [`DatacenterRecord::service_flags`] order.
    pub services: [bool; 8],
    pub year_operational: i32,
    pub ixp_count: f64,
}

impl Default for DatacenterFeatures {
    fn default() -> Self {
        Self {
            energy_mw: 20.0,
            area_sqft: 120_000.0,
            it_power_mw: 15.0,
            pue: 0.0,
            services: [false; 8],
            year_operational: 2023,
            ixp_count: 0.0,
        }
    }
}

impl DatacenterFeatures {
    /// Features of an existing facility.
    pub fn from_record(record: &DatacenterRecord) -> Self {
        Self {
            energy_mw: record.energy_mw,
            area_sqft: record.area_sqft,
            it_power_mw: record.it_power_mw,
            pue: record.pue,
            services: record.service_flags(),
            year_operational: record.year_operational,
            ixp_count: record.ixp_count,
        }
    }

    /// Checks every field against the accepted input range.
    pub fn validate(&self) -> Result<()> {
        check("energy_mw", self.energy_mw, &ENERGY_MW)?;
        check("area_sqft", self.area_sqft, &AREA_SQFT)?;
        check("it_power_mw", self.it_power_mw, &IT_POWER_MW)?;
        check("pue", self.pue, &PUE)?;
        check("ixp_count", self.ixp_count, &IXP_COUNT)?;
        if !YEAR.contains(&self.year_operational) {
            return Err(Error::invalid_value(
                "year_operational",
                format!("{} outside {}..={}", self.year_operational, YEAR.start(), YEAR.end()),
            ));
        }
        Ok(())
    }

    /// Model input vector, ordered as [`FEATURE_NAMES`]; flags are 0/1.
    pub fn to_vector(&self) -> Vec<f64> {
        let mut v = Vec::with_capacity(FEATURE_NAMES.len());
        v.extend([self.energy_mw, self.area_sqft, self.it_power_mw, self.pue]);
        v.extend(self.services.iter().map(|&s| if s { 1.0 } else { 0.0 }));
        v.push(f64::from(self.year_operational));
        v.push(self.ixp_count);
        v
    }
}

fn check(field: &str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid_value(
            field,
            format!("{value} outside {}..={}", range.start(), range.end()),
        ))
    }
}
