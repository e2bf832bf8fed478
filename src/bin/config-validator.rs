//! Validates the grievance configuration files for the current environment
//! and prints the effective settings. Exits non-zero on invalid config so CI
//! and deploy hooks can gate on it.

use anyhow::Context;
use grievance_core::config::ConfigManager;
use grievance_core::logging::init_structured_logging;

fn main() -> anyhow::Result<()> {
    init_structured_logging();

    let manager = ConfigManager::load().context("configuration failed validation")?;
    let config = manager.config();

    println!("environment: {}", manager.environment());
    println!(
        "database: {} (pool {})",
        config
            .database
            .url
            .as_deref()
            .unwrap_or("<in-memory adapter>"),
        config.database.pool
    );
    println!(
        "workflow: default warning threshold {}%",
        config.workflow.default_warning_threshold
    );
    println!(
        "points: low={} medium={} high={}",
        config.points.low, config.points.medium, config.points.high
    );
    println!(
        "events: publisher capacity {}",
        config.events.publisher_capacity
    );
    println!("configuration OK");

    Ok(())
}
