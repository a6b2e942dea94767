//! Listing scrapers for a public data-center directory.
//!
//! Two sequential crawls feed the optimization inputs:
//!
//! 1. [`StateCrawler`] opens a state page, reads its city table and collects
//!    the facility cards of every city.
//! 2. [`SpecsCrawler`] visits the specs page of each facility and extracts
//!    the key statistics (energy, area, year established) and the category
//!    tables.
//!
//! Pages are fetched through the [`Fetcher`] trait with a bounded
//! [`RetryPolicy`] and a randomized [`Pacing`] delay between loads. A page
//! that cannot be fetched or parsed is logged and skipped.
//!
//! # Key Types
//!
//! - [`HttpFetcher`]: blocking `reqwest` client with a request timeout
//! - [`CityListing`], [`DatacenterListing`]: rows of the state crawl
//! - [`DatacenterSpecs`], [`SpecsRow`]: specs records and their CSV form

mod crawl;
mod fetch;
mod parse;

pub use crawl::{
    DatacenterSpecs, SpecsCrawler, SpecsRow, SpecsSummary, StateCrawl, StateCrawler, SITE_ROOT,
    STATE_BASE_URL,
};
pub use fetch::{Fetcher, HttpFetcher, Pacing, RetryPolicy};
pub use parse::{
    parse_city_table, parse_datacenter_cards, parse_specs_page, CityListing, DatacenterListing,
    SpecsPage, NOT_AVAILABLE,
};
