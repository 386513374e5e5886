//! Command-line interface components.

use crate::config::ProcessorConfig;
use crate::constants::{DEFAULT_INPUT_DIR, INPUT_FILE_PATTERN};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "gpcp")]
#[command(about = "Convert GPCP One-Degree-Daily precipitation files to monthly-mean NumPy arrays")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directory containing the gpcp_1dd_v1.2_p1d.* files
    #[arg(value_name = "INPUT_DIR", default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Output directory for arrays and the catalog table (default: INPUT_DIR/numpy_arrays)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Glob pattern selecting input files inside INPUT_DIR
    #[arg(long, default_value = INPUT_FILE_PATTERN)]
    pub pattern: String,

    /// Number of files decoded concurrently (default: number of CPUs)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Log failed files and continue with the rest
    #[arg(long)]
    pub keep_going: bool,

    /// Do not remove an existing output directory before writing
    #[arg(long)]
    pub no_clean: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the processor configuration from command-line arguments
    pub fn to_config(&self) -> ProcessorConfig {
        let mut config =
            ProcessorConfig::for_input(&self.input_dir).with_file_pattern(self.pattern.clone());

        if let Some(output_dir) = &self.output_dir {
            config = config.with_output_dir(output_dir.clone());
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if self.keep_going {
            config = config.with_keep_going();
        }
        if self.no_clean {
            config = config.without_clean_output();
        }

        config
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// Set up structured logging on stderr, honouring `RUST_LOG` when set
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gpcp_processor={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["gpcp"]);
        let config = args.to_config();

        assert_eq!(config.input_dir, PathBuf::from("data"));
        assert_eq!(config.output_dir, PathBuf::from("data/numpy_arrays"));
        assert_eq!(config.file_pattern, "gpcp_1dd_v1.2_p1d.*");
        assert!(config.clean_output);
        assert!(!config.keep_going);
        assert_eq!(args.log_level(), "info");
    }

    #[test]
    fn test_all_options() {
        let args = Args::parse_from([
            "gpcp",
            "/archive/1dd",
            "--output-dir",
            "/tmp/means",
            "--pattern",
            "gpcp_1dd_v1.2_p1d.1997*",
            "--workers",
            "3",
            "--keep-going",
            "--no-clean",
            "--verbose",
        ]);
        let config = args.to_config();

        assert_eq!(config.input_dir, PathBuf::from("/archive/1dd"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/means"));
        assert_eq!(config.file_pattern, "gpcp_1dd_v1.2_p1d.1997*");
        assert_eq!(config.workers, 3);
        assert!(config.keep_going);
        assert!(!config.clean_output);
        assert_eq!(args.log_level(), "debug");
    }
}
