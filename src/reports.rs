use crate::error::ReportError;
use crate::latex::{render_city_table, TableOptions};
use crate::loader::{SummarySource, SUMMARY_TABLE};
use crate::output::preview_table_rows;
use crate::types::{CityRecord, LabelledRow, RegionMeta, SummaryRow, CORE_DESTINATIONS};
use log::debug;
use std::collections::HashMap;

/// Load the summary from `source`, reshape it and render the LaTeX table.
///
/// The source is disposed exactly once before this returns, on success as
/// well as on failure. Load and reshape errors come back wrapped as
/// [`ReportError::Generation`].
pub fn generate_city_table<S: SummarySource>(
    mut source: S,
    region: &RegionMeta,
) -> Result<String, ReportError> {
    let shaped = load_and_shape(&mut source, region);
    source.dispose();
    let records = shaped.map_err(ReportError::wrap)?;

    preview_table_rows(&records, 5);
    let tex = render_city_table(&records, &TableOptions::cities());
    Ok(apply_fixups(&tex))
}

fn load_and_shape<S: SummarySource>(
    source: &mut S,
    region: &RegionMeta,
) -> Result<Vec<CityRecord>, ReportError> {
    let rows = source.load_summary(SUMMARY_TABLE)?;
    let labelled = label_rows(rows, region);
    let restricted = restrict_categories(labelled, &CORE_DESTINATIONS)?;
    let mut records = pivot_counts(restricted, &CORE_DESTINATIONS)?;
    sort_records(&mut records);
    Ok(records)
}

/// Attach the region's country and continent and keep the pivot columns.
pub fn label_rows(rows: Vec<SummaryRow>, region: &RegionMeta) -> Vec<LabelledRow> {
    rows.into_iter()
        .map(|r| LabelledRow {
            city: r.study_region,
            country: region.country.clone(),
            continent: region.continent.clone(),
            population: r.pop_est,
            area_sqkm: r.area_sqkm,
            pop_per_sqkm: r.pop_per_sqkm,
            destination: r.dest_name_full,
            count: r.count,
        })
        .collect()
}

/// Keep only rows for `categories`. Every category must occur at least once.
pub fn restrict_categories(
    rows: Vec<LabelledRow>,
    categories: &[&str],
) -> Result<Vec<LabelledRow>, ReportError> {
    if let Some(missing) = categories
        .iter()
        .find(|c| !rows.iter().any(|r| r.destination == **c))
    {
        return Err(ReportError::MissingCategory(missing.to_string()));
    }
    let before = rows.len();
    let kept: Vec<LabelledRow> = rows
        .into_iter()
        .filter(|r| categories.contains(&r.destination.as_str()))
        .collect();
    debug!("kept {} of {} summary rows", kept.len(), before);
    Ok(kept)
}

// Pivot key: every metadata column, floats compared bitwise.
type CityKey = (String, String, String, i64, u64, u64);

/// One record per distinct metadata combination, counts laid out in
/// `categories` order. A (city, category) pair seen twice is an error.
pub fn pivot_counts(
    rows: Vec<LabelledRow>,
    categories: &[&str],
) -> Result<Vec<CityRecord>, ReportError> {
    let mut order: Vec<CityKey> = Vec::new();
    let mut map: HashMap<CityKey, CityRecord> = HashMap::new();
    for r in rows {
        let Some(col) = categories.iter().position(|c| *c == r.destination) else {
            continue;
        };
        let key = (
            r.city.clone(),
            r.country.clone(),
            r.continent.clone(),
            r.population,
            r.area_sqkm.to_bits(),
            r.pop_per_sqkm.to_bits(),
        );
        let e = map.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            CityRecord {
                continent: r.continent,
                country: r.country,
                city: r.city.clone(),
                population: r.population,
                area_sqkm: r.area_sqkm,
                pop_per_sqkm: r.pop_per_sqkm,
                counts: vec![None; categories.len()],
            }
        });
        if e.counts[col].is_some() {
            return Err(ReportError::DuplicateEntry {
                city: r.city,
                category: r.destination,
            });
        }
        e.counts[col] = Some(r.count);
    }
    Ok(order.into_iter().filter_map(|k| map.remove(&k)).collect())
}

/// Ascending by (continent, country, city); the remaining metadata breaks ties.
pub fn sort_records(records: &mut [CityRecord]) {
    records.sort_by(|a, b| {
        a.continent
            .cmp(&b.continent)
            .then_with(|| a.country.cmp(&b.country))
            .then_with(|| a.city.cmp(&b.city))
            .then_with(|| a.population.cmp(&b.population))
            .then_with(|| a.area_sqkm.total_cmp(&b.area_sqkm))
            .then_with(|| a.pop_per_sqkm.total_cmp(&b.pop_per_sqkm))
    });
}

/// Text fix-ups for things the table renderer cannot express: padding the
/// category sub-header with blank index cells, shorter category labels,
/// right-aligned bordered columns and a smaller font.
pub fn apply_fixups(tex: &str) -> String {
    let first = CORE_DESTINATIONS[0];
    tex.replace(
        first,
        &format!(
            "{}&{}&{}& {}",
            " ".repeat(20),
            " ".repeat(19),
            " ".repeat(15),
            first
        ),
    )
    .replace("Convenience", "Con-venience")
    .replace("Public transport stop (any)", "Public transport (any)")
    .replace("|p{", "|>{\\raggedleft\\arraybackslash}p{")
    .replace("\\begin{table}", "\\begin{table}\n\\small")
}
