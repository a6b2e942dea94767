//! Sequential crawlers for state listings and facility specs.

use super::fetch::{Fetcher, Pacing, RetryPolicy};
use super::parse::{
    parse_city_table, parse_datacenter_cards, parse_specs_page, CityListing, DatacenterListing,
    SpecsPage, NOT_AVAILABLE,
};
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

/// Root of the per-state listing pages.
pub const STATE_BASE_URL: &str = "https://www.datacentermap.com/usa/";
/// Root against which facility detail links are resolved.
pub const SITE_ROOT: &str = "https://www.datacentermap.com";

fn rng_from(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

/// Cities and facility listings of one state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateCrawl {
    pub cities: Vec<CityListing>,
    pub datacenters: Vec<DatacenterListing>,
    /// Cities whose page could not be loaded.
    pub skipped_cities: usize,
}

/// Walks a state page and every city page it links to.
pub struct StateCrawler<'f, F: Fetcher + ?Sized> {
    fetcher: &'f F,
    base: Url,
    retry: RetryPolicy,
    pacing: Pacing,
    rng: StdRng,
}

impl<'f, F: Fetcher + ?Sized> StateCrawler<'f, F> {
    pub fn new(fetcher: &'f F) -> Result<Self> {
        Ok(Self {
            fetcher,
            base: Url::parse(STATE_BASE_URL)?,
            retry: RetryPolicy::default(),
            pacing: Pacing::city_page(),
            rng: rng_from(None),
        })
    }

    pub fn with_base_url(mut self, base: &str) -> Result<Self> {
        self.base = Url::parse(base)?;
        Ok(self)
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = rng_from(Some(seed));
        self
    }

    /// Crawls `state` (the URL slug, e.g. `"california"`).
    ///
    /// # Errors
    ///
    /// Fails only when the state page itself cannot be loaded or has no
    /// city table. City pages that fail are logged and skipped.
    pub fn crawl(&mut self, state: &str) -> Result<StateCrawl> {
        let state_url = self.base.join(&format!("{}/", state.trim_matches('/')))?;
        info!(state, url = %state_url, "opening state page");

        let html = self.retry.fetch_with_retry(self.fetcher, state_url.as_str())?;
        let cities = parse_city_table(&html);
        if cities.is_empty() {
            return Err(Error::PageStructure {
                url: state_url.to_string(),
                reason: "no city table".into(),
            });
        }
        info!(state, cities = cities.len(), "found cities");

        let mut crawl = StateCrawl {
            cities,
            ..StateCrawl::default()
        };
        for city in &crawl.cities {
            match self.crawl_city(city) {
                Ok(cards) => {
                    info!(city = %city.city, datacenters = cards.len(), "processed city");
                    crawl.datacenters.extend(cards);
                }
                Err(e) => {
                    warn!(city = %city.city, error = %e, "skipping city");
                    crawl.skipped_cities += 1;
                }
            }
        }
        Ok(crawl)
    }

    fn crawl_city(&mut self, city: &CityListing) -> Result<Vec<DatacenterListing>> {
        let url = self.base.join(&city.url)?;
        let html = self.retry.fetch_with_retry(self.fetcher, url.as_str())?;
        self.pacing.pause(&mut self.rng);
        let cards = parse_datacenter_cards(&html, &city.city);
        if cards.is_empty() {
            return Err(Error::PageStructure {
                url: url.to_string(),
                reason: "no facility cards".into(),
            });
        }
        Ok(cards)
    }
}

/// Specs of one facility.
#[derive(Debug, Clone, PartialEq)]
pub struct DatacenterSpecs {
    pub name: String,
    pub specs: SpecsPage,
}

/// Flat CSV form of [`DatacenterSpecs`]; categories are a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecsRow {
    #[serde(rename = "Datacenter Name")]
    pub name: String,
    #[serde(rename = "Energy")]
    pub energy: String,
    #[serde(rename = "Area")]
    pub area: String,
    #[serde(rename = "Established")]
    pub established: String,
    #[serde(rename = "Categories")]
    pub categories: String,
}

impl DatacenterSpecs {
    pub fn to_row(&self) -> Result<SpecsRow> {
        Ok(SpecsRow {
            name: self.name.clone(),
            energy: self.specs.energy.clone(),
            area: self.specs.area.clone(),
            established: self.specs.established.clone(),
            categories: serde_json::to_string(&self.specs.categories)?,
        })
    }
}

/// Outcome counts of a specs crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecsSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Visits the specs page of every listed facility.
pub struct SpecsCrawler<'f, F: Fetcher + ?Sized> {
    fetcher: &'f F,
    root: Url,
    retry: RetryPolicy,
    after_load: Pacing,
    between_items: Pacing,
    rng: StdRng,
}

impl<'f, F: Fetcher + ?Sized> SpecsCrawler<'f, F> {
    pub fn new(fetcher: &'f F) -> Result<Self> {
        Ok(Self {
            fetcher,
            root: Url::parse(SITE_ROOT)?,
            retry: RetryPolicy::default(),
            after_load: Pacing::specs_page(),
            between_items: Pacing::between_items(),
            rng: rng_from(None),
        })
    }

    pub fn with_root(mut self, root: &str) -> Result<Self> {
        self.root = Url::parse(root)?;
        Ok(self)
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_pacing(mut self, after_load: Pacing, between_items: Pacing) -> Self {
        self.after_load = after_load;
        self.between_items = between_items;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = rng_from(Some(seed));
        self
    }

    /// Specs page URL of a listing, or `None` when it has no detail link.
    pub fn specs_url(&self, listing: &DatacenterListing) -> Option<Url> {
        if listing.detail_url == NOT_AVAILABLE || listing.detail_url.is_empty() {
            return None;
        }
        let path = format!("{}/specs/", listing.detail_url.trim_end_matches('/'));
        self.root.join(&path).ok()
    }

    /// Crawls every listing and hands each extracted record to `sink`.
    ///
    /// Unreachable pages and pages without energy or area are skipped. An
    /// error returned by `sink` aborts the crawl.
    pub fn crawl<'l, I, S>(&mut self, listings: I, mut sink: S) -> Result<SpecsSummary>
    where
        I: IntoIterator<Item = &'l DatacenterListing>,
        S: FnMut(&DatacenterSpecs) -> Result<()>,
    {
        let mut summary = SpecsSummary::default();
        for listing in listings {
            let Some(url) = self.specs_url(listing) else {
                warn!(name = %listing.name, "no detail link, skipping");
                summary.skipped += 1;
                continue;
            };
            info!(name = %listing.name, url = %url, "processing");

            let html = match self.retry.fetch_with_retry(self.fetcher, url.as_str()) {
                Ok(html) => html,
                Err(e) => {
                    warn!(error = %e, "skipping");
                    summary.skipped += 1;
                    continue;
                }
            };
            self.after_load.pause(&mut self.rng);

            let Some(specs) = parse_specs_page(&html) else {
                warn!(url = %url, "missing key statistics, skipping");
                summary.skipped += 1;
                continue;
            };
            sink(&DatacenterSpecs {
                name: listing.name.clone(),
                specs,
            })?;
            summary.written += 1;

            self.between_items.pause(&mut self.rng);
        }
        info!(written = summary.written, skipped = summary.skipped, "specs crawl complete");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::fetch::tests::FakeFetcher;
    use crate::scrape::parse::tests::{CITY_PAGE, SPECS_PAGE, STATE_PAGE};

    fn quiet_state(fetcher: &FakeFetcher) -> StateCrawler<'_, FakeFetcher> {
        StateCrawler::new(fetcher)
            .unwrap()
            .with_retry(RetryPolicy::immediate(3))
            .with_pacing(Pacing::none())
            .with_seed(1)
    }

    fn quiet_specs(fetcher: &FakeFetcher) -> SpecsCrawler<'_, FakeFetcher> {
        SpecsCrawler::new(fetcher)
            .unwrap()
            .with_retry(RetryPolicy::immediate(3))
            .with_pacing(Pacing::none(), Pacing::none())
            .with_seed(1)
    }

    fn listing(name: &str, detail: &str) -> DatacenterListing {
        DatacenterListing {
            city: "Los Angeles".into(),
            name: name.into(),
            location: NOT_AVAILABLE.into(),
            detail_url: detail.into(),
        }
    }

    // ---- state crawl ----

    #[test]
    fn test_state_crawl() {
        let fetcher = FakeFetcher::new(&[
            ("https://www.datacentermap.com/usa/california/", STATE_PAGE),
            ("https://www.datacentermap.com/usa/california/los-angeles/", CITY_PAGE),
        ]);
        let crawl = quiet_state(&fetcher).crawl("california").unwrap();

        assert_eq!(crawl.cities.len(), 2);
        assert_eq!(crawl.datacenters.len(), 2);
        assert_eq!(crawl.datacenters[0].name, "One Wilshire");
        // Fresno is not served: three attempts, then skipped.
        assert_eq!(crawl.skipped_cities, 1);
        assert_eq!(fetcher.call_count(), 1 + 1 + 3);
    }

    #[test]
    fn test_state_page_unreachable() {
        let fetcher = FakeFetcher::new(&[]);
        let err = quiet_state(&fetcher).crawl("nevada").unwrap_err();
        assert!(matches!(err, Error::RetriesExhausted { attempts: 3, .. }));
    }

    #[test]
    fn test_state_page_without_table() {
        let fetcher = FakeFetcher::new(&[("https://www.datacentermap.com/usa/ohio/", "<p>x</p>")]);
        assert!(matches!(
            quiet_state(&fetcher).crawl("ohio"),
            Err(Error::PageStructure { .. })
        ));
    }

    // ---- specs crawl ----

    #[test]
    fn test_specs_url() {
        let fetcher = FakeFetcher::new(&[]);
        let crawler = quiet_specs(&fetcher);
        let url = crawler.specs_url(&listing("a", "/usa/california/la/one/")).unwrap();
        assert_eq!(url.as_str(), "https://www.datacentermap.com/usa/california/la/one/specs/");
        let url = crawler.specs_url(&listing("a", "/usa/california/la/one")).unwrap();
        assert_eq!(url.as_str(), "https://www.datacentermap.com/usa/california/la/one/specs/");
        assert!(crawler.specs_url(&listing("a", NOT_AVAILABLE)).is_none());
    }

    #[test]
    fn test_specs_crawl_writes_and_skips() {
        let fetcher = FakeFetcher::new(&[
            ("https://www.datacentermap.com/dc/one/specs/", SPECS_PAGE),
            ("https://www.datacentermap.com/dc/empty/specs/", "<p>no stats</p>"),
        ]);
        let listings = vec![
            listing("One", "/dc/one/"),
            listing("Gone", "/dc/gone/"),
            listing("Empty", "/dc/empty/"),
            listing("Nowhere", NOT_AVAILABLE),
        ];

        let mut written = Vec::new();
        let summary = quiet_specs(&fetcher)
            .crawl(&listings, |s| {
                written.push(s.clone());
                Ok(())
            })
            .unwrap();

        assert_eq!(summary, SpecsSummary { written: 1, skipped: 3 });
        assert_eq!(written[0].name, "One");
        assert_eq!(written[0].specs.energy, "30 MW");
        // one + three retries for "Gone" + empty
        assert_eq!(fetcher.call_count(), 5);
    }

    #[test]
    fn test_sink_error_aborts() {
        let fetcher =
            FakeFetcher::new(&[("https://www.datacentermap.com/dc/one/specs/", SPECS_PAGE)]);
        let listings = vec![listing("One", "/dc/one/"), listing("One again", "/dc/one/")];
        let result = quiet_specs(&fetcher)
            .crawl(&listings, |_| Err(Error::Config("disk full".into())));
        assert!(result.is_err());
        assert_eq!(fetcher.call_count(), 1);
    }

    #[test]
    fn test_specs_row() {
        let specs = DatacenterSpecs {
            name: "One".into(),
            specs: parse_specs_page(SPECS_PAGE).unwrap(),
        };
        let row = specs.to_row().unwrap();
        assert_eq!(row.established, "1992");
        assert!(row.categories.starts_with(r#"{"Colocation":{"#));
        assert!(row.categories.contains(r#""Cages":"Yes""#));
    }
}
