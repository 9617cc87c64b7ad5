use clap::{Parser, Subcommand};

/// Framelink: host-side messaging bridge for sandboxed frames.
#[derive(Parser, Debug)]
#[command(name = "framelink", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log level override (an EnvFilter directive, e.g. `framelink=debug`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the bridge headless with simulated frames and report.
    Demo {
        /// Number of framed windows.
        #[arg(long, default_value_t = 2)]
        windows: u32,

        /// Correlated round trips per window, in each direction.
        #[arg(long, default_value_t = 3)]
        requests: u32,
    },
    /// Print the effective configuration as JSON.
    Config,
    /// Print the JavaScript shim embedded pages load.
    ChildScript,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_defaults() {
        let args = Args::try_parse_from(["framelink", "demo"]).unwrap();
        match args.command {
            Command::Demo { windows, requests } => {
                assert_eq!(windows, 2);
                assert_eq!(requests, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "framelink",
            "config",
            "--config",
            "/tmp/f.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert!(matches!(args.command, Command::Config));
        assert_eq!(args.config.as_deref(), Some("/tmp/f.toml"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Args::try_parse_from(["framelink"]).is_err());
    }
}
