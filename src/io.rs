//! CSV input and output.
//!
//! Site tables are read from a CSV whose first column holds the site name
//! and whose remaining columns are numeric attributes. Typed rows (data
//! center records, listings, portfolio rows) go through `serde`.

use crate::error::{Error, Result};
use crate::record::{DatacenterRecord, Site, SiteTable};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Reads a site table from any reader.
pub fn site_table_from_reader<R: Read>(reader: R) -> Result<SiteTable> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv.headers()?.clone();
    if headers.len() < 2 {
        return Err(Error::invalid_value(
            "site table",
            "expected a name column and at least one attribute column",
        ));
    }

    let mut sites = Vec::new();
    for (row, record) in csv.records().enumerate() {
        let record = record?;
        let mut site = Site::new(record.get(0).unwrap_or_default());
        for (attribute, raw) in headers.iter().zip(record.iter()).skip(1) {
            let value: f64 = raw.parse().map_err(|_| {
                Error::invalid_value(
                    attribute,
                    format!("row {}: `{raw}` is not a number", row + 1),
                )
            })?;
            site = site.with(attribute, value);
        }
        sites.push(site);
    }
    SiteTable::new(sites)
}

/// Reads a site table from a CSV file.
pub fn read_site_table(path: &Path) -> Result<SiteTable> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let table = site_table_from_reader(file)?;
    debug!(path = %path.display(), sites = table.len(), "loaded site table");
    Ok(table)
}

/// Reads the data-center dataset.
pub fn read_records(path: &Path) -> Result<Vec<DatacenterRecord>> {
    read_rows(path)
}

/// Deserializes every row of a CSV file.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let rows = csv.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
    debug!(path = %path.display(), rows = rows.len(), "read rows");
    Ok(rows)
}

/// Writes `rows` with a header line, replacing any existing file.
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut csv = csv::Writer::from_writer(file);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush().map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), rows = rows.len(), "wrote rows");
    Ok(())
}

/// Appends rows to a CSV file one at a time, flushing after each.
///
/// The header is written only when the file is new or empty, so an
/// interrupted crawl can be resumed into the same file.
pub struct CsvAppender<W: Write> {
    csv: csv::Writer<W>,
}

impl CsvAppender<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| Error::io(path, e))?;
        let is_empty = file.metadata().map_err(|e| Error::io(path, e))?.len() == 0;
        Ok(Self::from_writer(file, is_empty))
    }
}

impl<W: Write> CsvAppender<W> {
    pub fn from_writer(writer: W, write_header: bool) -> Self {
        let csv = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(writer);
        Self { csv }
    }

    pub fn append<T: Serialize>(&mut self, row: &T) -> Result<()> {
        self.csv.serialize(row)?;
        self.csv.flush().map_err(|e| Error::io("<csv output>", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::PortfolioRow;
    use crate::scrape::DatacenterListing;

    const SITES: &str = "\
Site,Cost,Connectivity
A, 100, 80
B,150,90
";

    #[test]
    fn test_site_table_from_reader() {
        let table = site_table_from_reader(SITES.as_bytes()).unwrap();
        assert_eq!(table.names(), vec!["A", "B"]);
        assert_eq!(table.column("Cost").unwrap(), vec![100.0, 150.0]);
        assert_eq!(table.attribute_names(), vec!["Connectivity", "Cost"]);
    }

    #[test]
    fn test_site_table_rejects_text() {
        let err = site_table_from_reader("Site,Cost\nA,cheap\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
        assert!(site_table_from_reader("Site\nA\n".as_bytes()).is_err());
    }

    #[test]
    fn test_read_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        std::fs::write(
            &path,
            "LOCATION,CITY,STATE,ENERGY,AREA,IT EQUIPMENT POWER,State_Aggregated_PUE,\
State_Aggregated_IXP_Count,YEAR_OPERATIONAL,FULL_CABINETS,PARTIAL_CABINETS,\
SHARED_RACKSPACE,CAGES,SUITES,BUILD_TO_SUIT,FOOTPRINTS,REMOTE_HANDS\n\
One Wilshire,Los Angeles,California,30,240000,20,1.5,4,1992,1,1,0,yes,True,0,0,1\n",
        )
        .unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.location, "One Wilshire");
        assert_eq!(r.year_operational, 1992);
        assert_eq!(r.service_score(), 5);
        assert!(r.is_eligible());
    }

    #[test]
    fn test_write_and_read_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.csv");
        let rows = vec![PortfolioRow {
            solution: 1,
            location: "One Wilshire".into(),
            city: "Los Angeles".into(),
            state: "California".into(),
            pue: 1.5,
            ixp_count: 4.0,
            service_score: 5,
            facility_age: 33,
            weighted_score: Some(0.25),
        }];
        write_rows(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Solution #,Location,City,State,PUE,IXP Count"));
        let back: Vec<PortfolioRow> = read_rows(&path).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_appender_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("details.csv");
        let listing = DatacenterListing {
            city: "Fresno".into(),
            name: "Valley DC".into(),
            location: "N/A".into(),
            detail_url: "/dc/valley/".into(),
        };

        CsvAppender::open(&path).unwrap().append(&listing).unwrap();
        CsvAppender::open(&path).unwrap().append(&listing).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("Datacenter Name").count(), 1);
        let back: Vec<DatacenterListing> = read_rows(&path).unwrap();
        assert_eq!(back.len(), 2);
    }
}
