//! `sbtig`: writes the planet scene description for the external ray tracer.
//!
//! Run with `cargo run -p sbtig-cli -- --output -` to print the scene.
//! Run with `cargo run -p sbtig-cli -- --scattering false` to leave the haze shell out.

mod generate;

use clap::Parser;
use sbtig_config::{CONF_FILE_ENV_VAR, CliArgs};
use tracing::{error, info, warn};

fn main() {
    let args = CliArgs::parse();

    // Missing configuration is fatal before anything is built
    let loaded = generate::load_config(&args, std::env::vars()).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {e}");
        std::process::exit(1);
    });

    sbtig_log::init_logging(
        args.log_dir.as_deref(),
        cfg!(debug_assertions),
        Some(&loaded.config),
    );

    if loaded.from_template {
        warn!(
            template = %loaded.source.display(),
            "no user configuration found, using the bundled template; set {} or create ~/.sbtig/configuration.ron",
            CONF_FILE_ENV_VAR
        );
    } else {
        info!(source = %loaded.source.display(), "configuration loaded");
    }

    if let Err(e) = generate::run(&args, &loaded.config) {
        error!("{e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
