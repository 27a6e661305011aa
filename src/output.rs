use crate::error::ReportError;
use crate::types::{CityPreviewRow, CityRecord};
use crate::util::{format_count, format_int, format_number};
use log::{debug, log_enabled, Level};
use std::path::Path;
use tabled::{settings::Style, Table};

/// Write the rendered table, replacing any previous file.
pub fn write_tex(path: &Path, content: &str) -> Result<(), ReportError> {
    std::fs::write(path, content).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn preview_rows(records: &[CityRecord], max_rows: usize) -> Vec<CityPreviewRow> {
    records
        .iter()
        .take(max_rows)
        .map(|r| {
            let count = |i: usize| format_count(r.counts.get(i).copied().flatten());
            CityPreviewRow {
                continent: r.continent.clone(),
                country: r.country.clone(),
                city: r.city.clone(),
                population: format_int(r.population),
                area_sqkm: format_number(r.area_sqkm, 1),
                pop_per_sqkm: format_number(r.pop_per_sqkm, 1),
                fresh_food: count(0),
                convenience: count(1),
                public_transport: count(2),
            }
        })
        .collect()
}

/// Log the first `max_rows` cities as a markdown table at debug level.
pub fn preview_table_rows(records: &[CityRecord], max_rows: usize) {
    if !log_enabled!(Level::Debug) {
        return;
    }
    let slice = preview_rows(records, max_rows);
    if slice.is_empty() {
        debug!("(no rows)");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    debug!("pivoted cities ({} total):\n{}", records.len(), table_str);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CityRecord {
        CityRecord {
            continent: "Testonia".into(),
            country: "Exampleland".into(),
            city: "Springfield".into(),
            population: 50_000,
            area_sqkm: 120.4,
            pop_per_sqkm: 415.28,
            counts: vec![Some(12), Some(340), None],
        }
    }

    #[test]
    fn preview_formats_like_the_report() {
        let rows = preview_rows(&[record(), record()], 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].population, "50,000");
        assert_eq!(rows[0].pop_per_sqkm, "415.3");
        assert_eq!(rows[0].public_transport, "--");
        let table = Table::new(rows).with(Style::markdown()).to_string();
        assert!(table.contains("| Springfield |"));
    }

    #[test]
    fn write_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities_data.tex");
        write_tex(&path, "old content that is longer").unwrap();
        write_tex(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("cities_data.tex");
        let err = write_tex(&path, "x").unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
