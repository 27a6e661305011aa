use crate::error::ReportError;
use crate::types::SummaryRow;
use csv::ReaderBuilder;
use log::{debug, info, warn};
use postgres::{Client, NoTls, Row};
use std::path::PathBuf;

pub const SUMMARY_TABLE: &str = "urban_dest_summary";

/// Somewhere the per-city destination summary can be read from.
///
/// A source is owned by a single run and consumed by [`SummarySource::dispose`]
/// once that run is over, whatever its outcome.
pub trait SummarySource {
    fn load_summary(&mut self, table: &str) -> Result<Vec<SummaryRow>, ReportError>;

    /// Release whatever the source holds. Dropping is enough by default.
    fn dispose(self)
    where
        Self: Sized,
    {
    }
}

pub struct PgSource {
    client: Client,
}

impl PgSource {
    pub fn connect(conn_str: &str) -> Result<Self, ReportError> {
        let client = Client::connect(conn_str, NoTls)?;
        debug!("connected to postgres");
        Ok(Self { client })
    }
}

impl SummarySource for PgSource {
    fn load_summary(&mut self, table: &str) -> Result<Vec<SummaryRow>, ReportError> {
        let sql = format!("SELECT * FROM {}", quote_ident(table));
        let rows = self.client.query(sql.as_str(), &[])?;
        info!("Loaded {} rows from {}", rows.len(), table);
        rows.iter().map(row_to_summary).collect()
    }

    fn dispose(self) {
        match self.client.close() {
            Ok(()) => debug!("postgres connection closed"),
            Err(e) => warn!("error while closing postgres connection: {}", e),
        }
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn row_to_summary(row: &Row) -> Result<SummaryRow, ReportError> {
    Ok(SummaryRow {
        study_region: row.try_get(0)?,
        dest_name_full: row.try_get(1)?,
        count: get_int(row, 2)?,
        pop_est: get_int(row, 3)?,
        area_sqkm: get_float(row, 4)?,
        pop_per_sqkm: get_float(row, 5)?,
        dest_per_sqkm: get_float(row, 6)?,
        dest_per_sqkm_per_10kpop: get_float(row, 7)?,
    })
}

// Integer columns may come back as int8 (aggregates), int4 or a float type
// depending on how the summary table was built.
fn get_int(row: &Row, idx: usize) -> Result<i64, ReportError> {
    if let Ok(v) = row.try_get::<_, i64>(idx) {
        return Ok(v);
    }
    if let Ok(v) = row.try_get::<_, i32>(idx) {
        return Ok(i64::from(v));
    }
    let v: f64 = row.try_get(idx)?;
    Ok(v.round() as i64)
}

// NULLs become NaN, like a missing measurement.
fn get_float(row: &Row, idx: usize) -> Result<f64, ReportError> {
    if let Ok(v) = row.try_get::<_, Option<f64>>(idx) {
        return Ok(v.unwrap_or(f64::NAN));
    }
    if let Ok(v) = row.try_get::<_, Option<f32>>(idx) {
        return Ok(v.map(f64::from).unwrap_or(f64::NAN));
    }
    if let Ok(v) = row.try_get::<_, Option<i32>>(idx) {
        return Ok(v.map(f64::from).unwrap_or(f64::NAN));
    }
    let v: Option<i64> = row.try_get(idx)?;
    Ok(v.map(|x| x as f64).unwrap_or(f64::NAN))
}

/// A CSV export of the summary table: one header row, then the eight
/// columns in table order.
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SummarySource for CsvSource {
    fn load_summary(&mut self, table: &str) -> Result<Vec<SummaryRow>, ReportError> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_path(&self.path)?;
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            // Positional: the export's header names are not relied on.
            let row: SummaryRow = record.deserialize(None)?;
            rows.push(row);
        }
        info!(
            "Loaded {} rows of {} from {}",
            rows.len(),
            table,
            self.path.display()
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn csv_rows_are_mapped_by_position() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a,b,c,d,e,f,g,h").unwrap();
        writeln!(file, "Springfield,Convenience,340,50000,120.4,415.28,2.82,68.0").unwrap();
        writeln!(file, "Springfield,\"Fresh Food / Market\",12,50000,120.4,415.28,0.1,2.4").unwrap();

        let mut source = CsvSource::new(file.path());
        let rows = source.load_summary(SUMMARY_TABLE).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            SummaryRow {
                study_region: "Springfield".into(),
                dest_name_full: "Convenience".into(),
                count: 340,
                pop_est: 50000,
                area_sqkm: 120.4,
                pop_per_sqkm: 415.28,
                dest_per_sqkm: 2.82,
                dest_per_sqkm_per_10kpop: 68.0,
            }
        );
        assert_eq!(rows[1].dest_name_full, "Fresh Food / Market");
    }

    #[test]
    fn malformed_csv_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a,b,c,d,e,f,g,h").unwrap();
        writeln!(file, "Springfield,Convenience,lots,50000,120.4,415.28,2.82,68.0").unwrap();

        let mut source = CsvSource::new(file.path());
        let err = source.load_summary(SUMMARY_TABLE).unwrap_err();
        assert!(matches!(err, ReportError::Csv(_)));
    }

    #[test]
    fn missing_csv_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = CsvSource::new(dir.path().join("absent.csv"));
        assert!(source.load_summary(SUMMARY_TABLE).is_err());
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("urban_dest_summary"), "\"urban_dest_summary\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
