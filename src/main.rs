use std::path::PathBuf;
use color_eyre::eyre::{eyre, WrapErr};
use door_to_door::config::Settings;
use door_to_door::export::save_records;
use door_to_door::geocode::{GeocodingPipeline, NominatimClient};
use door_to_door::session::Session;
use door_to_door::Tracker;
use log::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_OUT_FILE: &str = "result/addresses.csv";

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = color_eyre::install() {
        log::error!("cannot install error report handler: {:?}", e);
    }

    if let Err(e) = run().await {
        log::error!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(ErrorLayer::default())
        .init();
}

async fn run() -> color_eyre::Result<()> {
    let mut args = std::env::args().skip(1);
    let input = args.next()
        .map(PathBuf::from)
        .ok_or_else(|| eyre!("usage: door-to-door <input.csv> [output.csv]"))?;
    let output = args.next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_FILE));

    let settings = Settings::from_env();
    let pipeline = GeocodingPipeline::new(NominatimClient::new(&settings)?, settings.country.clone());

    let text = std::fs::read_to_string(&input)
        .wrap_err_with(|| format!("cannot read [{}]", input.display()))?;
    let mut tracker = Tracker::new();
    let summary = tracker.import(&text, &pipeline).await?;
    info!(
        "geocoded [{}] addresses: [{}] resolved, [{}] without match, [{}] failed",
        summary.total, summary.resolved, summary.unmatched, summary.failed,
    );

    info!("saving records to [{}]", output.display());
    save_records(tracker.records(), &output)?;

    let mut session = Session::new(tracker, output);
    session.run(tokio::io::BufReader::new(tokio::io::stdin())).await
}
