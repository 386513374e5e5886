use anyhow::{Context, Result};
use clap::Parser;
use gpcp_processor::cli::{Args, setup_logging};
use gpcp_processor::processor::BatchProcessor;
use std::process;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    match run(&args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let processor =
        BatchProcessor::new(args.to_config()).context("Failed to set up batch processor")?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

    runtime.block_on(async {
        tokio::select! {
            result = processor.process() => {
                result.map(|_stats| ()).context("Processing failed")
            }
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(anyhow::anyhow!("Processing interrupted by user"))
            }
        }
    })
}
