//! Spiritbox replay entry point.

use std::error::Error;
use std::sync::Arc;

use spiritbox_content::application::ingest::load_scenario;
use spiritbox_core::clock::SystemClock;
use spiritbox_core::rng::{DeterministicRng, SeededRng};
use spiritbox_replay::replay;
use spiritbox_replay::script::Script;
use spiritbox_replay::settings::ReplaySettings;
use spiritbox_session::domain::config::SessionConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let settings = ReplaySettings::from_env()?;
    tracing::info!(?settings, "Starting spirit box replay");

    let scenario = load_scenario(&settings.scenario_path)?;
    let config = match &settings.config_path {
        Some(path) => SessionConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SessionConfig::default(),
    };
    let script = Script::load(&settings.script_path)?;
    let rng: Box<dyn DeterministicRng> = match settings.seed {
        Some(seed) => Box::new(SeededRng::from_seed(seed)),
        None => Box::new(SeededRng::from_entropy()),
    };

    let report = replay::run(scenario, config, &script, rng, Arc::new(SystemClock)).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
