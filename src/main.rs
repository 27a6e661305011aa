// Entry point for the city summary table.
//
// One straight run, no arguments:
// - read the project configuration (config.toml, or $CITY_SUMMARY_CONFIG),
// - load `urban_dest_summary` from the study region database,
// - pivot the core destination counts per city and render a LaTeX table,
// - write it for inclusion in the collaborator report.
mod config;
mod error;
mod latex;
mod loader;
mod output;
mod reports;
mod types;
mod util;

use anyhow::{Context, Result};
use config::ProjectConfig;
use loader::{CsvSource, PgSource};
use log::info;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = ProjectConfig::resolve_path();
    let cfg = ProjectConfig::from_file(&config_path)?;
    info!("Using configuration {}", config_path.display());

    println!(
        "\nPreparing LaTeX summary table files for all cities defined in the project configuration file, drawing on results from the following databases:\n{}",
        cfg.db
    );
    println!("{}", cfg.study_region);

    let region = cfg.region_meta();
    let tex = match &cfg.summary_csv {
        Some(path) => {
            info!("Reading summary from CSV export {}", path.display());
            reports::generate_city_table(CsvSource::new(path), &region)?
        }
        None => {
            // Connection failures are wrapped the same way as load errors.
            let source = PgSource::connect(&cfg.connection_string())
                .map_err(error::ReportError::wrap)?;
            reports::generate_city_table(source, &region)?
        }
    };

    output::write_tex(&cfg.output, &tex)
        .with_context(|| format!("could not save table to {}", cfg.output.display()))?;
    println!(
        "\nSaved main city comparison table to {}.\n",
        cfg.output.display()
    );
    Ok(())
}
