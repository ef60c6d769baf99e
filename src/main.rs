use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sqlcrew::config::Config;
use sqlcrew::inputs;
use sqlcrew::pipeline::{self, Layout, PipelineError, PipelineReport};

/// Analyze, rewrite and test a SQL stored procedure with a crew of LLM agents.
#[derive(Debug, Parser)]
#[command(name = "sqlcrew", version, about)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, value_name = "PATH")]
    config: PathBuf,

    /// Directory holding the procedure and test query `.sql` files.
    #[arg(long, value_name = "DIR", default_value = "inputs")]
    inputs_dir: PathBuf,

    /// Directory the three reports are written to.
    #[arg(long, value_name = "DIR", default_value = "outputs")]
    outputs_dir: PathBuf,
}

const USAGE: &str = "Usage: sqlcrew --config config.yaml";

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_for_parse_error(error),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(execute(cli)) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(error) => {
            match error.downcast_ref::<PipelineError>() {
                Some(e) if e.is_missing_procedure() => println!("{e}"),
                _ => eprintln!("error: {error:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<PipelineReport> {
    let config = Config::load(&cli.config)?;
    let layout = Layout {
        inputs_dir: cli.inputs_dir,
        outputs_dir: cli.outputs_dir,
    };

    let inputs = inputs::discover(&layout.inputs_dir).map_err(PipelineError::from)?;
    let agent_runtime = pipeline::llm_runtime(&config)?;
    let report = pipeline::run(&config, &layout, &inputs, &agent_runtime)
        .await
        .context("pipeline run failed")?;
    Ok(report)
}

fn print_report(report: &PipelineReport) {
    println!("Analysis complete. See {}", report.analysis_report.display());
    println!(
        "Optimization complete. See {}",
        report.optimized_procedure.display()
    );
    println!("Testing complete. See {}", report.test_report.display());
    if let Some(dir) = report.test_report.parent() {
        println!(
            "\nWorkflow complete. All outputs saved in {}/ directory.",
            dir.display()
        );
    }
}

fn exit_for_parse_error(error: clap::Error) -> ExitCode {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            ExitCode::SUCCESS
        }
        _ => {
            println!("{USAGE}");
            ExitCode::FAILURE
        }
    }
}
