mod cli;
mod demo;

use std::path::Path;
use std::process::ExitCode;

use framelink_config::FramelinkConfig;
use tracing_subscriber::EnvFilter;

use cli::Command;

fn main() -> ExitCode {
    let args = cli::parse();

    // Config first: it supplies the default log level.
    let loaded = match args.config.as_deref() {
        Some(path) => framelink_config::toml_loader::load_from_path(Path::new(path)),
        None => framelink_config::load_config(),
    };
    let (config, load_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (FramelinkConfig::default(), Some(e)),
    };

    // Initialize logging
    let log_directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| format!("framelink={}", config.logging.level.as_directive()));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "framelink=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("Framelink v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {path}");
    }
    if let Some(e) = load_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    match args.command {
        Command::Config => {
            println!("{}", framelink_config::config_to_json(&config));
            ExitCode::SUCCESS
        }
        Command::ChildScript => {
            println!(
                "{}",
                framelink_bridge::envelope::child_init_script(&config.transport.target_origin)
            );
            ExitCode::SUCCESS
        }
        Command::Demo { windows, requests } => match demo::run(&config, windows, requests) {
            Ok(report) => {
                print!("{report}");
                if report.crossed() > 0 {
                    tracing::error!("{} replies reached the wrong window", report.crossed());
                    ExitCode::FAILURE
                } else {
                    ExitCode::SUCCESS
                }
            }
            Err(e) => {
                tracing::error!("Demo failed: {e}");
                ExitCode::FAILURE
            }
        },
    }
}
