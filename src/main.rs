//! Civic Ledger
//!
//! Declarative forms for local-government accounting.
//!
//! This is the main entry point for the Dioxus Desktop application.
//! Set `CIVIC_LEDGER_CONFIG` to a TOML file to override the engine defaults.

use civic_forms::EngineConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the engine configuration file
const CONFIG_ENV: &str = "CIVIC_LEDGER_CONFIG";

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .pretty()
        .init();

    println!();
    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║                                                           ║");
    println!("║   🏛️  Civic Ledger v{:<39}║", civic_ui::VERSION);
    println!("║   Local Government Accounting Forms                       ║");
    println!("║                                                           ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();

    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "could not load engine config, using defaults");
                EngineConfig::default()
            }
        },
        None => EngineConfig::default(),
    };

    // Launch the Dioxus desktop application
    civic_ui::launch_with_config(config);
}
