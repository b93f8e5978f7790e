//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use impact_analysis::RouteEventKind;

/// impact — measure how a policy change affected the agents it touched.
///
/// Typical workflow:
///   impact affected --before base/events.csv --links 4711,4712
///   impact routes   --before base/events.csv --after policy/events.csv
///   impact distance --before base/events.csv --after policy/events.csv --network links.csv
///   impact travel-time --before base/events.csv --after policy/events.csv
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    ///
    /// If not specified, impact.toml in the current directory is used when present.
    #[arg(short, long, global = true, value_name = "FILE", env = "IMPACT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Report format
    #[arg(long, global = true, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Directory for CSV reports
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Prefix stripped from vehicle ids by the prefix identity strategy
    #[arg(long, global = true, value_name = "PREFIX")]
    pub vehicle_prefix: Option<String>,

    /// Fail on unresolvable vehicles and overlapping departures instead of
    /// skipping them
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Find the agents whose vehicles left an affected link in the baseline
    /// run and write them to the agents file.
    Affected(AffectedArgs),

    /// Compare the link sequences of the affected agents.
    Routes(RouteArgs),

    /// Compare the total distance driven by the affected agents.
    Distance(DistanceArgs),

    /// Compare the total trip time of the affected agents.
    TravelTime(TraceArgs),

    /// Write a default configuration file.
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Event traces and the affected-agents file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct TraceArgs {
    /// Baseline event trace (CSV)
    #[arg(long, value_name = "FILE")]
    pub before: Option<PathBuf>,

    /// Policy event trace (CSV)
    #[arg(long, value_name = "FILE")]
    pub after: Option<PathBuf>,

    /// Affected-agents file, one id per line
    #[arg(long, value_name = "FILE")]
    pub agents: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct AffectedArgs {
    /// Baseline event trace (CSV)
    #[arg(long, value_name = "FILE")]
    pub before: Option<PathBuf>,

    /// Affected link ids (comma-separated)
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub links: Option<Vec<String>>,

    /// File of affected link ids, one per line
    #[arg(long, value_name = "FILE")]
    pub links_file: Option<PathBuf>,

    /// Where to write the affected-agents file
    #[arg(long, value_name = "FILE")]
    pub agents: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct RouteArgs {
    #[command(flatten)]
    pub traces: TraceArgs,

    /// Link event that extends a route: link-leave or link-enter
    #[arg(long, value_name = "KIND", value_parser = parse_route_event)]
    pub route_event: Option<RouteEventKind>,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct DistanceArgs {
    #[command(flatten)]
    pub traces: TraceArgs,

    /// Network file (CSV: link_id,length_m)
    #[arg(long, value_name = "FILE")]
    pub network: Option<PathBuf>,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Plain text on stdout (default)
    #[default]
    Text,
    /// CSV files in the output directory
    Csv,
}

fn parse_route_event(s: &str) -> Result<RouteEventKind, String> {
    match s {
        "link-leave" | "leave" => Ok(RouteEventKind::LinkLeave),
        "link-enter" | "enter" => Ok(RouteEventKind::LinkEnter),
        other => Err(format!("unknown route event '{other}' (expected link-leave or link-enter)")),
    }
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }
        if let Some(prefix) = &self.vehicle_prefix {
            if prefix.is_empty() {
                return Err("Vehicle prefix must not be empty".to_string());
            }
        }
        if let Command::Affected(a) = &self.command {
            if let Some(path) = &a.links_file {
                if !path.is_file() {
                    return Err(format!("Links file does not exist: {}", path.display()));
                }
            }
        }
        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
