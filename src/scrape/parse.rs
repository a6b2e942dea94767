//! HTML extraction for the state, city and specs pages.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder for card fields that are missing on the page.
pub const NOT_AVAILABLE: &str = "N/A";

const CITY_TABLE: &str = ".ui.sortable.striped.very.basic.very.compact.table";
const CARDS: &str = ".ui.centered.cards";
const STATISTICS: &str = ".ui.three.statistics .ui.statistic";
const CATEGORY_COLUMNS: &str = ".ui.stackable.grid .eight.wide.column";
const CATEGORY_HEADER: &str = ".ui.horizontal.divider";

/// One row of a state's city table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityListing {
    #[serde(rename = "City")]
    pub city: String,
    /// Number of facilities, as printed on the page.
    #[serde(rename = "Count")]
    pub count: String,
    /// Link to the city page, usually relative.
    #[serde(rename = "URL")]
    pub url: String,
}

/// One facility card of a city page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatacenterListing {
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Datacenter Name")]
    pub name: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Detail URL")]
    pub detail_url: String,
}

/// Key statistics and category tables of a specs page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecsPage {
    pub energy: String,
    pub area: String,
    pub established: String,
    /// Category header -> (row label -> value).
    pub categories: BTreeMap<String, BTreeMap<String, String>>,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Whitespace-normalized text content of an element.
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(element: ElementRef<'_>, sel: &Selector) -> Option<String> {
    element
        .select(sel)
        .next()
        .map(text_of)
        .filter(|t| !t.is_empty())
}

/// Extracts the city table of a state page.
///
/// The first row is the header. Rows with fewer than two cells or without
/// a link in the first cell are skipped. Returns an empty list when the
/// table is missing.
pub fn parse_city_table(html: &str) -> Vec<CityListing> {
    let document = Html::parse_document(html);
    let (table, row, cell, link) = (
        selector(CITY_TABLE),
        selector("tr"),
        selector("td"),
        selector("a"),
    );

    let Some(table) = document.select(&table).next() else {
        return Vec::new();
    };

    table
        .select(&row)
        .skip(1)
        .filter_map(|tr| {
            let cells: Vec<ElementRef<'_>> = tr.select(&cell).collect();
            if cells.len() < 2 {
                return None;
            }
            let anchor = cells[0].select(&link).next()?;
            Some(CityListing {
                city: text_of(anchor),
                count: text_of(cells[1]),
                url: anchor.value().attr("href").unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Extracts the facility cards of a city page.
pub fn parse_datacenter_cards(html: &str, city: &str) -> Vec<DatacenterListing> {
    let document = Html::parse_document(html);
    let (container, card, header, description) = (
        selector(CARDS),
        selector(".ui.card"),
        selector(".header"),
        selector(".description"),
    );

    let Some(container) = document.select(&container).next() else {
        return Vec::new();
    };

    container
        .select(&card)
        .map(|card| DatacenterListing {
            city: city.to_string(),
            name: first_text(card, &header).unwrap_or_else(|| NOT_AVAILABLE.into()),
            location: first_text(card, &description).unwrap_or_else(|| NOT_AVAILABLE.into()),
            detail_url: card
                .value()
                .attr("href")
                .filter(|h| !h.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
        })
        .collect()
}

/// Extracts a specs page.
///
/// Returns `None` when fewer than three statistics are present or when the
/// energy or area label is empty.
pub fn parse_specs_page(html: &str) -> Option<SpecsPage> {
    let document = Html::parse_document(html);
    let label = selector(".label");

    let stats: Vec<String> = document
        .select(&selector(STATISTICS))
        .map(|stat| first_text(stat, &label).unwrap_or_default())
        .collect();
    if stats.len() < 3 || stats[0].is_empty() || stats[1].is_empty() {
        return None;
    }

    let (header, row, cell) = (selector(CATEGORY_HEADER), selector("tr"), selector("td"));
    let mut categories = BTreeMap::new();
    for column in document.select(&selector(CATEGORY_COLUMNS)) {
        let Some(category) = first_text(column, &header) else {
            continue;
        };
        let entries: BTreeMap<String, String> = column
            .select(&row)
            .filter_map(|tr| {
                let cells: Vec<ElementRef<'_>> = tr.select(&cell).collect();
                match cells.as_slice() {
                    [key, value] => Some((text_of(*key), cell_value(*value))),
                    _ => None,
                }
            })
            .collect();
        categories.insert(category, entries);
    }

    let mut stats = stats.into_iter();
    Some(SpecsPage {
        energy: stats.next().unwrap_or_default(),
        area: stats.next().unwrap_or_default(),
        established: stats.next().unwrap_or_default(),
        categories,
    })
}

/// "Yes"/"No" for checkmark/close icons, the cell text otherwise.
fn cell_value(cell: ElementRef<'_>) -> String {
    let icon = selector("i");
    if let Some(i) = cell.select(&icon).next() {
        let classes = i.value().attr("class").unwrap_or_default();
        if classes.contains("checkmark") {
            return "Yes".into();
        }
        if classes.contains("close") {
            return "No".into();
        }
    }
    text_of(cell)
}
