//! Generate command implementation.
//!
//! The generate command:
//! 1. Resolves configuration (TOML file, then CLI overrides)
//! 2. Reads traces from files or the Jaeger API
//! 3. Generates the requested diagrams
//! 4. Writes `.puml` files and the optional topology report
//! 5. Optionally prints a terminal summary

use crate::aggregator::TraceAggregator;
use crate::commands::models::{GenerateArgs, GenerateOutcome};
use crate::diagram::{generators_for, Diagram};
use crate::input::{JaegerApiClient, JsonFileReader, TraceReader};
use crate::model::Trace;
use crate::output::{render_summary, write_diagrams, write_report, TopologyReport};
use crate::utils::config::{load_config, UmlConfig, MAX_TRACE_LIMIT};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the generate command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Config file or trace input cannot be read
/// * No traces were found
/// * Output files cannot be written
///
/// # Example
/// ```ignore
/// let args = GenerateArgs {
///     input_file: Some(PathBuf::from("trace.json")),
///     ..GenerateArgs::default()
/// };
/// execute_generate(args)?;
/// ```
pub fn execute_generate(args: GenerateArgs) -> Result<GenerateOutcome> {
    let start_time = Instant::now();

    let config = resolve_config(&args)?;
    debug!("Effective configuration: {:?}", config);

    let traces = read_input(&args, &config)?;
    if traces.is_empty() {
        anyhow::bail!("No traces found");
    }
    info!("Loaded {} trace(s)", traces.len());

    let diagrams = generate_diagrams(&args, &config, &traces)?;
    if diagrams.is_empty() {
        warn!("No diagrams were generated");
    }

    let written = write_diagrams(&diagrams, &args.output_dir).with_context(|| {
        format!(
            "Failed to write diagrams to {}",
            args.output_dir.display()
        )
    })?;

    let report = TopologyReport::from_aggregator(TraceAggregator::new(&traces));

    if let Some(report_path) = &args.report {
        write_report(&report, report_path).context("Failed to write topology report")?;
        info!("✓ Report written to: {}", report_path.display());
    }

    if args.print_summary {
        println!("{}", render_summary(&report, &written));
    }

    info!(
        "Generation completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(GenerateOutcome {
        trace_count: traces.len(),
        service_count: report.service_count(),
        written,
    })
}

/// Load the config file (if any) and apply CLI overrides
///
/// **Public** - also useful to inspect the effective configuration
pub fn resolve_config(args: &GenerateArgs) -> Result<UmlConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => UmlConfig::default(),
    };

    if let Some(url) = &args.jaeger_url {
        config.jaeger.url = url.clone();
    }
    if args.service.is_some() {
        config.jaeger.service = args.service.clone();
    }
    if args.operation.is_some() {
        config.jaeger.operation = args.operation.clone();
    }
    if let Some(limit) = args.limit {
        config.jaeger.limit = limit;
    }
    if let Some(lookback) = &args.lookback {
        config.jaeger.lookback = lookback.clone();
    }
    if args.title.is_some() {
        config.diagram.title = args.title.clone();
    }

    Ok(config)
}

/// Read traces from whichever input the user selected
///
/// **Private** - internal helper for execute_generate
fn read_input(args: &GenerateArgs, config: &UmlConfig) -> Result<Vec<Trace>> {
    let reader: Box<dyn TraceReader> = if let Some(file) = &args.input_file {
        Box::new(JsonFileReader::new(file))
    } else if let Some(dir) = &args.input_dir {
        Box::new(JsonFileReader::new(dir))
    } else if args.jaeger_url.is_some() {
        Box::new(
            JaegerApiClient::new(config.jaeger.clone())
                .context("Failed to create Jaeger API client")?,
        )
    } else {
        anyhow::bail!("No input specified");
    };

    reader.read_traces().context("Failed to read traces")
}

/// Run every selected generator
///
/// **Private** - internal helper for execute_generate
fn generate_diagrams(
    args: &GenerateArgs,
    config: &UmlConfig,
    traces: &[Trace],
) -> Result<Vec<Diagram>> {
    let mut diagrams = Vec::new();
    for generator in generators_for(&args.diagram_type.kinds(), &config.diagram) {
        info!("Generating {} diagram...", generator.diagram_type());
        let generated = generator
            .generate(traces)
            .with_context(|| format!("Failed to generate {} diagram", generator.diagram_type()))?;
        diagrams.extend(generated);
    }
    Ok(diagrams)
}

/// Validate generate arguments
///
/// **Public** - can be called before execute_generate for early validation
pub fn validate_args(args: &GenerateArgs) -> Result<()> {
    let inputs = [
        args.input_file.is_some(),
        args.input_dir.is_some(),
        args.jaeger_url.is_some(),
    ]
    .iter()
    .filter(|set| **set)
    .count();

    if inputs == 0 {
        anyhow::bail!("One of --input-file, --input-dir or --jaeger-url is required");
    }
    if inputs > 1 {
        anyhow::bail!("Only one of --input-file, --input-dir or --jaeger-url may be given");
    }

    if let Some(url) = &args.jaeger_url {
        if url.is_empty() {
            anyhow::bail!("Jaeger URL cannot be empty");
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("Jaeger URL must start with http:// or https://");
        }
    }

    if let Some(limit) = args.limit {
        if limit == 0 {
            anyhow::bail!("limit must be greater than 0");
        }
        if limit > MAX_TRACE_LIMIT {
            anyhow::bail!("limit is too large (max {})", MAX_TRACE_LIMIT);
        }
    }

    if let Some(lookback) = &args.lookback {
        if lookback.trim().is_empty() {
            anyhow::bail!("lookback cannot be empty");
        }
    }

    if args.output_dir.as_os_str().is_empty() {
        anyhow::bail!("Output directory cannot be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file_args() -> GenerateArgs {
        GenerateArgs {
            input_file: Some(PathBuf::from("trace.json")),
            ..GenerateArgs::default()
        }
    }

    #[test]
    fn test_validate_requires_one_input() {
        assert!(validate_args(&GenerateArgs::default()).is_err());
        assert!(validate_args(&file_args()).is_ok());

        let both = GenerateArgs {
            input_dir: Some(PathBuf::from("traces")),
            ..file_args()
        };
        assert!(validate_args(&both).is_err());
    }

    #[test]
    fn test_validate_jaeger_url_scheme() {
        let args = GenerateArgs {
            jaeger_url: Some("localhost:16686".into()),
            ..GenerateArgs::default()
        };
        assert!(validate_args(&args).is_err());

        let args = GenerateArgs {
            jaeger_url: Some("http://localhost:16686".into()),
            ..GenerateArgs::default()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_limit_bounds() {
        for (limit, ok) in [(0, false), (1, true), (10_000, true), (10_001, false)] {
            let args = GenerateArgs {
                limit: Some(limit),
                ..file_args()
            };
            assert_eq!(validate_args(&args).is_ok(), ok, "limit {}", limit);
        }
    }

    #[test]
    fn test_resolve_config_overrides() {
        let args = GenerateArgs {
            jaeger_url: Some("http://jaeger:16686".into()),
            service: Some("frontend".into()),
            limit: Some(7),
            title: Some("Shop".into()),
            ..GenerateArgs::default()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.jaeger.url, "http://jaeger:16686");
        assert_eq!(config.jaeger.service.as_deref(), Some("frontend"));
        assert_eq!(config.jaeger.limit, 7);
        assert_eq!(config.jaeger.lookback, "24h");
        assert_eq!(config.diagram.title.as_deref(), Some("Shop"));
    }
}
