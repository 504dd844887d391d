// Small dev utility: run one production-volume query against the configured sources.
//
// Usage:
//   cargo run --bin fetch_volume -- <start-date> <end-date> [config_path]
//
// Dates are ISO (YYYY-MM-DD). Prints the resulting series as JSON; this is a
// debugging stand-in for the dashboard endpoint, not a server.

use chrono::NaiveDate;
use pd_volume::api::ProductionVolumeApi;
use pd_volume::config::DataSourceConfig;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pd_volume::logging::init();

    let mut args = std::env::args().skip(1);
    let start = NaiveDate::parse_from_str(
        &args.next().ok_or("missing <start-date> argument")?,
        "%Y-%m-%d",
    )?;
    let end = NaiveDate::parse_from_str(
        &args.next().ok_or("missing <end-date> argument")?,
        "%Y-%m-%d",
    )?;

    let config_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(DataSourceConfig::default_config_path);
    let config = DataSourceConfig::from_file(&config_path)?;

    let api = ProductionVolumeApi::new(Arc::new(config));
    let records = api.get_production_data(start, end).await?;

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
