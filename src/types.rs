use serde::Deserialize;
use tabled::Tabled;

/// Metadata column labels, in table order.
pub const KEY_STATS: [&str; 6] = [
    "City",
    "Country",
    "Continent",
    "Population estimate",
    "Urban area (sqkm)",
    "Pop. per sqkm",
];

/// Destination categories reported, in column order.
pub const CORE_DESTINATIONS: [&str; 3] = [
    "Fresh Food / Market",
    "Convenience",
    "Public transport stop (any)",
];

/// Top-level header grouping the destination count columns.
pub const DESTINATION_GROUP: &str = "Destination Count";

/// Row indices, outermost first.
pub const INDEX_NAMES: [&str; 3] = ["Continent", "Country", "City"];

/// One row of `urban_dest_summary`. Columns are mapped by position, so the
/// field order here must follow the table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummaryRow {
    pub study_region: String,
    pub dest_name_full: String,
    pub count: i64,
    pub pop_est: i64,
    pub area_sqkm: f64,
    pub pop_per_sqkm: f64,
    pub dest_per_sqkm: f64,
    pub dest_per_sqkm_per_10kpop: f64,
}

/// Country and continent for the study region; not stored in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMeta {
    pub country: String,
    pub continent: String,
}

/// A summary row after renaming and attaching region metadata, restricted to
/// the columns that feed the pivot.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledRow {
    pub city: String,
    pub country: String,
    pub continent: String,
    pub population: i64,
    pub area_sqkm: f64,
    pub pop_per_sqkm: f64,
    pub destination: String,
    pub count: i64,
}

/// One pivoted row: a city with its counts per core destination.
///
/// `counts[i]` belongs to `CORE_DESTINATIONS[i]`; `None` marks a city with no
/// row for that category.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRecord {
    pub continent: String,
    pub country: String,
    pub city: String,
    pub population: i64,
    pub area_sqkm: f64,
    pub pop_per_sqkm: f64,
    pub counts: Vec<Option<i64>>,
}

/// Console rendering of a [`CityRecord`], used for the debug preview.
#[derive(Debug, Clone, Tabled)]
pub struct CityPreviewRow {
    #[tabled(rename = "Continent")]
    pub continent: String,
    #[tabled(rename = "Country")]
    pub country: String,
    #[tabled(rename = "City")]
    pub city: String,
    #[tabled(rename = "Population estimate")]
    pub population: String,
    #[tabled(rename = "Urban area (sqkm)")]
    pub area_sqkm: String,
    #[tabled(rename = "Pop. per sqkm")]
    pub pop_per_sqkm: String,
    #[tabled(rename = "Fresh Food / Market")]
    pub fresh_food: String,
    #[tabled(rename = "Convenience")]
    pub convenience: String,
    #[tabled(rename = "Public transport stop (any)")]
    pub public_transport: String,
}
