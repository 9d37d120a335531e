//! Segue - headless transition demo
//!
//! Loads configuration, then cycles a director through a ring of scenes,
//! logging each handover.

use segue::{AppConfig, Demo};

fn main() {
    // Load configuration before logging so the configured level applies
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting Segue");

    if let Some(e) = load_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let result = Demo::new(config).and_then(|mut demo| demo.run());
    match result {
        Ok(report) => log::info!(
            "Demo finished: {} handovers in {} frames",
            report.handovers,
            report.frames
        ),
        Err(e) => {
            log::error!("Demo failed: {}", e);
            std::process::exit(1);
        }
    }
}
