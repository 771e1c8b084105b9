//! Trace UML Studio CLI
//!
//! Generates UML diagrams (PlantUML) from Jaeger distributed traces:
//! sequence diagrams per trace, plus aggregate component and deployment views.

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use trace_uml_studio::commands::{
    display_schema, display_version, execute_generate, validate_args, validate_report_file,
    DiagramSelection, GenerateArgs,
};
use trace_uml_studio::utils::config::{DEFAULT_OUTPUT_DIR, MAX_TRACE_LIMIT};

/// Trace UML Studio - UML diagrams from Jaeger traces
#[derive(Parser, Debug)]
#[command(name = "trace-uml")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate diagrams from traces
    #[command(group(
        ArgGroup::new("input")
            .required(true)
            .args(["input_file", "input_dir", "jaeger_url"]),
    ))]
    Generate {
        /// Jaeger JSON export file
        #[arg(short = 'f', long)]
        input_file: Option<PathBuf>,

        /// Directory of Jaeger JSON exports
        #[arg(short = 'd', long)]
        input_dir: Option<PathBuf>,

        /// Jaeger query service URL (e.g. http://localhost:16686)
        #[arg(short = 'j', long)]
        jaeger_url: Option<String>,

        /// Only fetch traces for this service
        #[arg(short, long)]
        service: Option<String>,

        /// Only fetch traces for this operation
        #[arg(long)]
        operation: Option<String>,

        /// Maximum number of traces to fetch
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=MAX_TRACE_LIMIT as u64))]
        limit: Option<u64>,

        /// Lookback window for the API query (e.g. 1h, 24h)
        #[arg(long)]
        lookback: Option<String>,

        /// Output directory for .puml files
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,

        /// Diagram type: sequence, component, deployment or all
        #[arg(short = 't', long, default_value = "all")]
        diagram_type: DiagramSelection,

        /// Title printed on every diagram
        #[arg(long)]
        title: Option<String>,

        /// Write a JSON topology report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a topology report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display report schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Generate {
            input_file,
            input_dir,
            jaeger_url,
            service,
            operation,
            limit,
            lookback,
            output_dir,
            diagram_type,
            title,
            report,
            config,
            summary,
        } => {
            let args = GenerateArgs {
                input_file,
                input_dir,
                jaeger_url,
                service,
                operation,
                limit: limit.map(|l| l as usize),
                lookback,
                output_dir,
                diagram_type,
                title,
                report,
                config,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            let outcome = execute_generate(args)?;
            log::info!(
                "Generated {} file(s) from {} trace(s) covering {} service(s)",
                outcome.written.len(),
                outcome.trace_count,
                outcome.service_count
            );
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
