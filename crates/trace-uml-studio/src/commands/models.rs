use crate::diagram::DiagramType;
use crate::utils::config::DEFAULT_OUTPUT_DIR;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which diagrams to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramSelection {
    Sequence,
    Component,
    Deployment,
    #[default]
    All,
}

impl DiagramSelection {
    pub fn kinds(&self) -> Vec<DiagramType> {
        match self {
            DiagramSelection::Sequence => vec![DiagramType::Sequence],
            DiagramSelection::Component => vec![DiagramType::Component],
            DiagramSelection::Deployment => vec![DiagramType::Deployment],
            DiagramSelection::All => DiagramType::ALL.to_vec(),
        }
    }
}

impl FromStr for DiagramSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(DiagramSelection::All);
        }
        s.parse::<DiagramType>().map(|kind| match kind {
            DiagramType::Sequence => DiagramSelection::Sequence,
            DiagramType::Component => DiagramSelection::Component,
            DiagramType::Deployment => DiagramSelection::Deployment,
        })
    }
}

impl fmt::Display for DiagramSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagramSelection::Sequence => "sequence",
            DiagramSelection::Component => "component",
            DiagramSelection::Deployment => "deployment",
            DiagramSelection::All => "all",
        };
        f.write_str(s)
    }
}

/// Arguments for the generate command
///
/// **Public** - used by main.rs to construct from CLI args
///
/// Exactly one of `input_file`, `input_dir`, `jaeger_url` must be set.
/// `None` query options fall back to the config file, then to defaults.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// Single Jaeger JSON export
    pub input_file: Option<PathBuf>,

    /// Directory of Jaeger JSON exports
    pub input_dir: Option<PathBuf>,

    /// Jaeger query service base URL
    pub jaeger_url: Option<String>,

    /// Filter API traces by service
    pub service: Option<String>,

    /// Filter API traces by operation
    pub operation: Option<String>,

    /// Maximum number of traces to fetch
    pub limit: Option<usize>,

    /// API lookback window (e.g. "1h", "24h")
    pub lookback: Option<String>,

    /// Directory receiving `.puml` files
    pub output_dir: PathBuf,

    pub diagram_type: DiagramSelection,

    /// Optional title for every diagram
    pub title: Option<String>,

    /// Path to write the topology report JSON
    pub report: Option<PathBuf>,

    /// Optional TOML configuration file
    pub config: Option<PathBuf>,

    /// Print a human-readable summary to the terminal
    pub print_summary: bool,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            input_file: None,
            input_dir: None,
            jaeger_url: None,
            service: None,
            operation: None,
            limit: None,
            lookback: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            diagram_type: DiagramSelection::All,
            title: None,
            report: None,
            config: None,
            print_summary: false,
        }
    }
}

/// Result of a generate run, for callers that want more than the files
#[derive(Debug, Clone, Default)]
pub struct GenerateOutcome {
    pub trace_count: usize,
    pub service_count: usize,
    pub written: Vec<PathBuf>,
}
