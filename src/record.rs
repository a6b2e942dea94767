//! Candidate data model.
//!
//! Two shapes of input recur across the toolkit:
//!
//! - [`SiteTable`]: a small table of named candidate sites with arbitrary
//!   numeric attributes (cost, energy price, renewable fraction, ...). Used
//!   by weighted scoring, the selection models and clustering.
//! - [`DatacenterRecord`]: a typed row of the data-center dataset (power,
//!   area, PUE, IXP count, service-feature flags). Used by the portfolio
//!   NSGA-II problem and the cluster predictor.
//!
//! Records are immutable inputs for the duration of a run.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Year used to derive facility age when none is supplied.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2025;

/// A named candidate site with numeric attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub attributes: BTreeMap<String, f64>,
}

impl Site {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder: sets an attribute value.
    pub fn with(mut self, attribute: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(attribute.into(), value);
        self
    }

    /// Returns the value of `attribute`.
    pub fn get(&self, attribute: &str) -> Result<f64> {
        self.attributes
            .get(attribute)
            .copied()
            .ok_or_else(|| Error::MissingAttribute {
                attribute: attribute.to_string(),
            })
    }
}

/// An ordered table of candidate sites sharing one attribute schema.
///
/// # Examples
///
/// ```
/// use dcsite::record::SiteTable;
///
/// let table = SiteTable::from_columns(
///     &["A", "B"],
///     &[("Cost", &[10.0, 12.0]), ("Renewable", &[0.5, 0.6])],
/// ).unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.column("Cost").unwrap(), vec![10.0, 12.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteTable {
    sites: Vec<Site>,
}

impl SiteTable {
    /// Creates a table, checking that every site has the same attribute set
    /// and that names are unique.
    pub fn new(sites: Vec<Site>) -> Result<Self> {
        if let Some(first) = sites.first() {
            let schema: Vec<&String> = first.attributes.keys().collect();
            for site in &sites[1..] {
                let keys: Vec<&String> = site.attributes.keys().collect();
                if keys != schema {
                    let missing = schema
                        .iter()
                        .find(|k| !site.attributes.contains_key(k.as_str()))
                        .map(|k| k.to_string())
                        .or_else(|| {
                            keys.iter()
                                .find(|k| !first.attributes.contains_key(k.as_str()))
                                .map(|k| k.to_string())
                        })
                        .unwrap_or_default();
                    return Err(Error::MissingAttribute { attribute: missing });
                }
            }
        }
        for (i, site) in sites.iter().enumerate() {
            if sites[..i].iter().any(|s| s.name == site.name) {
                return Err(Error::invalid_value(
                    "site name",
                    format!("duplicate site `{}`", site.name),
                ));
            }
        }
        Ok(Self { sites })
    }

    /// Builds a table from a name column and named value columns.
    pub fn from_columns(names: &[&str], columns: &[(&str, &[f64])]) -> Result<Self> {
        for (attribute, values) in columns {
            if values.len() != names.len() {
                return Err(Error::DimensionMismatch {
                    expected: names.len(),
                    actual: values.len(),
                    context: "column length",
                });
            }
            if attribute.is_empty() {
                return Err(Error::invalid_value("attribute", "empty column name"));
            }
        }
        let sites = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                columns
                    .iter()
                    .fold(Site::new(*name), |site, (attr, values)| site.with(*attr, values[i]))
            })
            .collect();
        Self::new(sites)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn names(&self) -> Vec<&str> {
        self.sites.iter().map(|s| s.name.as_str()).collect()
    }

    /// Attribute names in schema (sorted) order.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.sites
            .first()
            .map(|s| s.attributes.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns the values of `attribute` in row order.
    pub fn column(&self, attribute: &str) -> Result<Vec<f64>> {
        self.sites.iter().map(|s| s.get(attribute)).collect()
    }

    /// Looks a site up by name.
    pub fn site(&self, name: &str) -> Result<&Site> {
        self.sites
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::UnknownSite(name.to_string()))
    }

    /// Row index of the named site.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.sites
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| Error::UnknownSite(name.to_string()))
    }
}

/// One row of the data-center dataset.
///
/// Column names follow the upstream spreadsheet export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatacenterRecord {
    #[serde(rename = "LOCATION", default)]
    pub location: String,
    #[serde(rename = "CITY", default)]
    pub city: String,
    #[serde(rename = "STATE", default)]
    pub state: String,
    /// Total facility power in MW.
    #[serde(rename = "ENERGY", default)]
    pub energy_mw: f64,
    /// Floor area in square feet.
    #[serde(rename = "AREA")]
    pub area_sqft: f64,
    /// IT equipment power in MW.
    #[serde(rename = "IT EQUIPMENT POWER")]
    pub it_power_mw: f64,
    #[serde(rename = "State_Aggregated_PUE")]
    pub pue: f64,
    #[serde(rename = "State_Aggregated_IXP_Count")]
    pub ixp_count: f64,
    #[serde(rename = "YEAR_OPERATIONAL")]
    pub year_operational: i32,
    #[serde(rename = "FULL_CABINETS", deserialize_with = "flag")]
    pub full_cabinets: bool,
    #[serde(rename = "PARTIAL_CABINETS", deserialize_with = "flag")]
    pub partial_cabinets: bool,
    #[serde(rename = "SHARED_RACKSPACE", deserialize_with = "flag")]
    pub shared_rackspace: bool,
    #[serde(rename = "CAGES", deserialize_with = "flag")]
    pub cages: bool,
    #[serde(rename = "SUITES", deserialize_with = "flag")]
    pub suites: bool,
    #[serde(rename = "BUILD_TO_SUIT", deserialize_with = "flag")]
    pub build_to_suit: bool,
    #[serde(rename = "FOOTPRINTS", deserialize_with = "flag")]
    pub footprints: bool,
    #[serde(rename = "REMOTE_HANDS", deserialize_with = "flag")]
    pub remote_hands: bool,
}

/// Minimum IT power (MW) for a facility to count toward a portfolio.
pub const MIN_IT_POWER_MW: f64 = 1.0;
/// Minimum floor area (sq ft) for a facility to count toward a portfolio.
pub const MIN_AREA_SQFT: f64 = 10_000.0;
/// Minimum number of offered services for a facility to count toward a portfolio.
pub const MIN_SERVICE_SCORE: u32 = 4;

impl DatacenterRecord {
    /// The eight service-feature flags in canonical order.
    pub fn service_flags(&self) -> [bool; 8] {
        [
            self.full_cabinets,
            self.partial_cabinets,
            self.shared_rackspace,
            self.cages,
            self.suites,
            self.build_to_suit,
            self.footprints,
            self.remote_hands,
        ]
    }

    /// Number of service features offered (0..=8).
    pub fn service_score(&self) -> u32 {
        self.service_flags().iter().filter(|&&f| f).count() as u32
    }

    /// Age of the facility in years relative to `reference_year`.
    pub fn facility_age(&self, reference_year: i32) -> i32 {
        reference_year - self.year_operational
    }

    /// Whether the facility satisfies the portfolio eligibility thresholds.
    pub fn is_eligible(&self) -> bool {
        self.it_power_mw >= MIN_IT_POWER_MW
            && self.area_sqft >= MIN_AREA_SQFT
            && self.service_score() >= MIN_SERVICE_SCORE
    }
}

/// Accepts `1/0`, `true/false`, `yes/no` (any case) and `1.0/0.0`.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid flag `{raw}`")))
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" | "y" => Some(true),
        "0" | "0.0" | "false" | "no" | "n" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(
        name: &str,
        pue: f64,
        ixp: f64,
        year: i32,
        services: u32,
    ) -> DatacenterRecord {
        let mut flags = [false; 8];
        for f in flags.iter_mut().take(services as usize) {
            *f = true;
        }
        DatacenterRecord {
            location: name.into(),
            city: "San Jose".into(),
            state: "California".into(),
            energy_mw: 20.0,
            area_sqft: 50_000.0,
            it_power_mw: 10.0,
            pue,
            ixp_count: ixp,
            year_operational: year,
            full_cabinets: flags[0],
            partial_cabinets: flags[1],
            shared_rackspace: flags[2],
            cages: flags[3],
            suites: flags[4],
            build_to_suit: flags[5],
            footprints: flags[6],
            remote_hands: flags[7],
        }
    }

    #[test]
    fn test_site_table_schema_mismatch() {
        let sites = vec![
            Site::new("A").with("Cost", 1.0).with("Risk", 0.2),
            Site::new("B").with("Cost", 2.0),
        ];
        match SiteTable::new(sites) {
            Err(Error::MissingAttribute { attribute }) => assert_eq!(attribute, "Risk"),
            other => panic!("expected missing attribute, got {other:?}"),
        }
    }

    #[test]
    fn test_site_table_duplicate_names() {
        let sites = vec![Site::new("A").with("Cost", 1.0), Site::new("A").with("Cost", 2.0)];
        assert!(SiteTable::new(sites).is_err());
    }

    #[test]
    fn test_from_columns_length_mismatch() {
        let err = SiteTable::from_columns(&["A", "B"], &[("Cost", &[1.0])]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_column_and_lookup() {
        let table =
            SiteTable::from_columns(&["A", "B", "C"], &[("Cost", &[3.0, 1.0, 2.0])]).unwrap();
        assert_eq!(table.column("Cost").unwrap(), vec![3.0, 1.0, 2.0]);
        assert_eq!(table.index_of("C").unwrap(), 2);
        assert!(table.column("Latency").is_err());
        assert!(table.site("Z").is_err());
        assert_eq!(table.attribute_names(), vec!["Cost"]);
    }

    #[test]
    fn test_service_score_and_age() {
        let r = record("X", 1.4, 2.0, 2015, 5);
        assert_eq!(r.service_score(), 5);
        assert_eq!(r.facility_age(DEFAULT_REFERENCE_YEAR), 10);
        assert!(r.is_eligible());
    }

    #[test]
    fn test_eligibility_thresholds() {
        let mut r = record("X", 1.4, 2.0, 2015, 4);
        assert!(r.is_eligible());
        r.area_sqft = 9_999.0;
        assert!(!r.is_eligible());
        r.area_sqft = 10_000.0;
        r.it_power_mw = 0.9;
        assert!(!r.is_eligible());
        let few = record("Y", 1.4, 2.0, 2015, 3);
        assert!(!few.is_eligible());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("1.0"), Some(true));
        assert_eq!(parse_flag("maybe"), None);
    }
}
