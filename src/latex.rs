// LaTeX rendering of the pivoted city table.
//
// Produces a booktabs `table` float: three header rows (grouped top-level
// labels, category labels, index names), then one row per city. The
// category header row only carries cells for the data columns; callers pad it
// afterwards (see `reports::apply_fixups`).
use crate::types::{CityRecord, CORE_DESTINATIONS, DESTINATION_GROUP, INDEX_NAMES, KEY_STATS};
use crate::util::{escape_latex, format_count, format_int, format_number};

pub const CITIES_CAPTION: &str = "Destination counts by cities.";
pub const CITIES_LABEL: &str = "cities_table";
pub const CITIES_COLUMN_FORMAT: &str =
    "p{2cm}|p{2.2cm}|p{2cm}|p{1.5cm}|p{1.2cm}|p{1.3cm}|p{1.2cm}|p{1.2cm}|p{1.2cm}";

#[derive(Debug, Clone)]
pub struct TableOptions {
    pub caption: String,
    pub label: String,
    pub column_format: String,
    pub multicolumn_format: String,
}

impl TableOptions {
    pub fn cities() -> Self {
        Self {
            caption: CITIES_CAPTION.to_string(),
            label: CITIES_LABEL.to_string(),
            column_format: CITIES_COLUMN_FORMAT.to_string(),
            multicolumn_format: "c".to_string(),
        }
    }
}

const N_INDEX: usize = INDEX_NAMES.len();
const N_META: usize = 3;
const N_COLS: usize = N_INDEX + N_META + CORE_DESTINATIONS.len();

pub fn render_city_table(records: &[CityRecord], opts: &TableOptions) -> String {
    let group_header: Vec<String> = std::iter::repeat(String::new())
        .take(N_INDEX)
        .chain(KEY_STATS[N_INDEX..].iter().map(|s| escape_latex(s)))
        .collect();
    let multicolumn = format!(
        "\\multicolumn{{{}}}{{{}}}{{{}}}",
        CORE_DESTINATIONS.len(),
        opts.multicolumn_format,
        escape_latex(DESTINATION_GROUP)
    );
    let category_header: Vec<String> = std::iter::repeat(String::new())
        .take(N_META)
        .chain(CORE_DESTINATIONS.iter().map(|s| escape_latex(s)))
        .collect();
    let index_header: Vec<String> = INDEX_NAMES
        .iter()
        .map(|s| s.to_string())
        .chain(std::iter::repeat(String::new()).take(N_COLS - N_INDEX))
        .collect();
    let body = body_cells(records);

    let mut widths = [0usize; N_COLS];
    let mut widen = |offset: usize, cells: &[String]| {
        for (i, c) in cells.iter().enumerate() {
            let w = &mut widths[offset + i];
            *w = (*w).max(c.chars().count());
        }
    };
    widen(0, &group_header);
    widen(N_INDEX, &category_header);
    widen(0, &index_header);
    for row in &body {
        widen(0, row);
    }

    let mut out = String::new();
    out.push_str("\\begin{table}\n");
    out.push_str("\\centering\n");
    out.push_str(&format!("\\caption{{{}}}\n", opts.caption));
    out.push_str(&format!("\\label{{{}}}\n", opts.label));
    out.push_str(&format!("\\begin{{tabular}}{{{}}}\n", opts.column_format));
    out.push_str("\\toprule\n");

    let mut first = join_padded(&group_header, &widths[..N_INDEX + N_META]);
    first.push_str(" & ");
    first.push_str(&multicolumn);
    push_row(&mut out, &first);
    push_row(&mut out, &join_padded(&category_header, &widths[N_INDEX..]));
    push_row(&mut out, &join_padded(&index_header, &widths));
    out.push_str("\\midrule\n");
    for row in &body {
        push_row(&mut out, &join_padded(row, &widths));
    }
    out.push_str("\\bottomrule\n");
    out.push_str("\\end{tabular}\n");
    out.push_str("\\end{table}\n");
    out
}

/// Formatted data cells, with repeated outer index labels left blank.
fn body_cells(records: &[CityRecord]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(records.len());
    let mut prev: Option<&CityRecord> = None;
    for r in records {
        let same_continent = prev.is_some_and(|p| p.continent == r.continent);
        let same_country = same_continent && prev.is_some_and(|p| p.country == r.country);
        let mut cells = Vec::with_capacity(N_COLS);
        cells.push(if same_continent {
            String::new()
        } else {
            escape_latex(&r.continent)
        });
        cells.push(if same_country {
            String::new()
        } else {
            escape_latex(&r.country)
        });
        cells.push(escape_latex(&r.city));
        cells.push(format_int(r.population));
        cells.push(format_number(r.area_sqkm, 1));
        cells.push(format_number(r.pop_per_sqkm, 1));
        for i in 0..CORE_DESTINATIONS.len() {
            cells.push(format_count(r.counts.get(i).copied().flatten()));
        }
        rows.push(cells);
        prev = Some(r);
    }
    rows
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<w$}", c, w = *w))
        .collect::<Vec<_>>()
        .join(" & ")
}

fn push_row(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push_str(" \\\\\n");
}
