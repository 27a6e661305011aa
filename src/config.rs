//! Project and study region configuration.

use crate::error::ReportError;
use crate::types::RegionMeta;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_ENV_VAR: &str = "CITY_SUMMARY_CONFIG";
pub const DEFAULT_OUTPUT_PATH: &str = "../collaborator_report/_static/cities_data.tex";

/// Connection parameters and region metadata for a single run.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub study_region: String,
    pub db: String,
    pub db_host: String,
    #[serde(default = "default_port")]
    pub db_port: u16,
    pub db_user: String,
    pub db_pwd: String,
    pub country: String,
    pub continent: String,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Read the summary from a CSV export instead of the database.
    #[serde(default)]
    pub summary_csv: Option<PathBuf>,
}

fn default_port() -> u16 {
    5432
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

impl ProjectConfig {
    pub fn from_file(path: &Path) -> Result<Self, ReportError> {
        let text = fs::read_to_string(path).map_err(|e| ReportError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text).map_err(|message| ReportError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Config path from the environment, falling back to `config.toml`.
    pub fn resolve_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// libpq-style key/value connection string.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            quote_conn_value(&self.db_host),
            self.db_port,
            quote_conn_value(&self.db_user),
            quote_conn_value(&self.db_pwd),
            quote_conn_value(&self.db),
        )
    }

    pub fn region_meta(&self) -> RegionMeta {
        RegionMeta {
            country: self.country.clone(),
            continent: self.continent.clone(),
        }
    }
}

// Values with spaces, quotes or backslashes must be single-quoted.
fn quote_conn_value(v: &str) -> String {
    if !v.is_empty() && !v.contains([' ', '\'', '\\']) {
        return v.to_string();
    }
    let escaped = v.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
study_region = "Springfield"
db = "springfield_2023"
db_host = "localhost"
db_user = "postgres"
db_pwd = "p@ss word"
country = "Exampleland"
continent = "Testonia"
"#;

    #[test]
    fn defaults_fill_optional_keys() {
        let cfg = ProjectConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(cfg.db_port, 5432);
        assert_eq!(cfg.output, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert!(cfg.summary_csv.is_none());
        assert_eq!(
            cfg.region_meta(),
            RegionMeta {
                country: "Exampleland".into(),
                continent: "Testonia".into()
            }
        );
    }

    #[test]
    fn connection_string_quotes_awkward_values() {
        let cfg = ProjectConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(
            cfg.connection_string(),
            "host=localhost port=5432 user=postgres password='p@ss word' dbname=springfield_2023"
        );
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}\ndb_port = 6543\n", SAMPLE).unwrap();
        let cfg = ProjectConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.db_port, 6543);
        assert_eq!(cfg.study_region, "Springfield");
    }

    #[test]
    fn missing_key_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "study_region = \"x\"\n").unwrap();
        let err = ProjectConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ReportError::Config { .. }));
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ReportError::Config { .. }));
    }
}
