//! Configuration file handling.
//!
//! Settings come from `impact.toml` (or the file named by `--config`) and are
//! then overridden by whatever the command line sets explicitly.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use impact_analysis::{DeparturePolicy, IdentityStrategy, RouteEventKind, UnresolvedPolicy};

use crate::cli::{Args, Command, ReportFormat, TraceArgs};

pub const DEFAULT_CONFIG_FILE: &str = "impact.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inputs: InputConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Input files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Baseline event trace.
    #[serde(default = "default_before")]
    pub before: PathBuf,

    /// Policy event trace.
    #[serde(default = "default_after")]
    pub after: PathBuf,

    /// Link lengths, needed by `distance` only.
    #[serde(default = "default_network")]
    pub network: PathBuf,

    /// Affected-agents file: written by `affected`, read by the comparisons.
    #[serde(default = "default_agents")]
    pub agents: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            before:  default_before(),
            after:   default_after(),
            network: default_network(),
            agents:  default_agents(),
        }
    }
}

fn default_before() -> PathBuf {
    PathBuf::from("before/output_events.csv")
}

fn default_after() -> PathBuf {
    PathBuf::from("after/output_events.csv")
}

fn default_network() -> PathBuf {
    PathBuf::from("network.csv")
}

fn default_agents() -> PathBuf {
    PathBuf::from("affected_agents.txt")
}

/// Which links the policy touched.  Both sources are merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default)]
    pub affected_links: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links_file: Option<PathBuf>,
}

/// How each pass turns a vehicle id into an agent id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Literal prefix removed by the `prefix` strategy.
    #[serde(default = "default_vehicle_prefix")]
    pub vehicle_prefix: String,

    #[serde(default = "StrategyKind::binding")]
    pub selector: StrategyKind,

    #[serde(default = "StrategyKind::prefix")]
    pub routes: StrategyKind,

    #[serde(default = "StrategyKind::binding")]
    pub distance: StrategyKind,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            vehicle_prefix: default_vehicle_prefix(),
            selector:       StrategyKind::Binding,
            routes:         StrategyKind::Prefix,
            distance:       StrategyKind::Binding,
        }
    }
}

impl IdentityConfig {
    pub fn strategy(&self, kind: StrategyKind) -> IdentityStrategy {
        match kind {
            StrategyKind::Binding => IdentityStrategy::Binding,
            StrategyKind::Prefix  => IdentityStrategy::Prefix(self.vehicle_prefix.clone()),
        }
    }
}

fn default_vehicle_prefix() -> String {
    IdentityStrategy::DEFAULT_VEHICLE_PREFIX.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Binding,
    Prefix,
}

impl StrategyKind {
    fn binding() -> Self {
        StrategyKind::Binding
    }

    fn prefix() -> Self {
        StrategyKind::Prefix
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub route_event: RouteEventKind,

    #[serde(default)]
    pub unresolved: UnresolvedPolicy,

    #[serde(default)]
    pub departure: DeparturePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,

    /// Where CSV reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { format: ReportFormat::default(), output_dir: default_output_dir() }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("impact_report")
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load the file named by `--config`, else `impact.toml` if it exists,
    /// else the defaults.
    pub fn resolve(args: &Args) -> Result<Self> {
        if let Some(path) = &args.config {
            return Self::load(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values the command line sets explicitly override the file.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(dir) = &args.output_dir {
            self.report.output_dir = dir.clone();
        }
        if let Some(prefix) = &args.vehicle_prefix {
            self.identity.vehicle_prefix = prefix.clone();
        }
        if args.strict {
            self.policy.unresolved = UnresolvedPolicy::Reject;
            self.policy.departure = DeparturePolicy::Reject;
        }

        match &args.command {
            Command::Affected(a) => {
                if let Some(before) = &a.before {
                    self.inputs.before = before.clone();
                }
                if let Some(agents) = &a.agents {
                    self.inputs.agents = agents.clone();
                }
                // Links given on the command line replace the configured set.
                if a.links.is_some() || a.links_file.is_some() {
                    self.selection.affected_links = a.links.clone().unwrap_or_default();
                    self.selection.links_file = a.links_file.clone();
                }
            }
            Command::Routes(r) => {
                self.merge_traces(&r.traces);
                if let Some(kind) = r.route_event {
                    self.policy.route_event = kind;
                }
            }
            Command::Distance(d) => {
                self.merge_traces(&d.traces);
                if let Some(network) = &d.network {
                    self.inputs.network = network.clone();
                }
            }
            Command::TravelTime(t) => self.merge_traces(t),
            Command::InitConfig { .. } => {}
        }
    }

    fn merge_traces(&mut self, traces: &TraceArgs) {
        if let Some(before) = &traces.before {
            self.inputs.before = before.clone();
        }
        if let Some(after) = &traces.after {
            self.inputs.after = after.clone();
        }
        if let Some(agents) = &traces.agents {
            self.inputs.agents = agents.clone();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Config::default()).context("Failed to serialize default config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.identity.vehicle_prefix, "veh_");
        assert_eq!(config.identity.selector, StrategyKind::Binding);
        assert_eq!(config.identity.routes, StrategyKind::Prefix);
        assert_eq!(config.policy.route_event, RouteEventKind::LinkLeave);
        assert_eq!(config.policy.unresolved, UnresolvedPolicy::Drop);
        assert_eq!(config.policy.departure, DeparturePolicy::LastDepartureWins);
        assert_eq!(config.report.format, ReportFormat::Text);
        assert!(config.selection.affected_links.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[inputs]
before = "base/events.csv"
after = "policy/events.csv"

[selection]
affected_links = ["4711", "4712"]

[identity]
vehicle_prefix = "car_"
routes = "binding"

[policy]
route_event = "link-enter"
departure = "reject"

[report]
format = "csv"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.inputs.before, PathBuf::from("base/events.csv"));
        assert_eq!(config.inputs.agents, PathBuf::from("affected_agents.txt"));
        assert_eq!(config.selection.affected_links, ["4711", "4712"]);
        assert_eq!(config.identity.strategy(config.identity.routes), IdentityStrategy::Binding);
        assert_eq!(
            config.identity.strategy(StrategyKind::Prefix),
            IdentityStrategy::Prefix("car_".to_string())
        );
        assert_eq!(config.policy.route_event, RouteEventKind::LinkEnter);
        assert_eq!(config.policy.departure, DeparturePolicy::Reject);
        assert_eq!(config.policy.unresolved, UnresolvedPolicy::Drop);
        assert_eq!(config.report.format, ReportFormat::Csv);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = toml::from_str::<Config>("[policy]\nunresolved = \"ignore\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml().unwrap();
        assert!(toml_str.contains("[inputs]"));
        assert!(toml_str.contains("[identity]"));
        assert!(toml_str.contains("[policy]"));
        let back: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.identity.vehicle_prefix, "veh_");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("impact.toml");
        std::fs::write(&path, "[identity]\nvehicle_prefix = \"v\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.identity.vehicle_prefix, "v");

        assert!(Config::load(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = Config::default();
        config.selection.affected_links = vec!["old".to_string()];
        config.merge_with_args(&args(&[
            "impact", "--strict", "--vehicle-prefix", "car_", "affected", "--before", "b.csv",
            "--links", "L1,L2",
        ]));
        assert_eq!(config.inputs.before, PathBuf::from("b.csv"));
        assert_eq!(config.selection.affected_links, ["L1", "L2"]);
        assert_eq!(config.identity.vehicle_prefix, "car_");
        assert_eq!(config.policy.unresolved, UnresolvedPolicy::Reject);
        assert_eq!(config.policy.departure, DeparturePolicy::Reject);
    }

    #[test]
    fn test_unset_flags_keep_file_values() {
        let mut config = Config::default();
        config.inputs.after = PathBuf::from("from_file.csv");
        config.selection.affected_links = vec!["kept".to_string()];
        config.merge_with_args(&args(&["impact", "routes", "--before", "x.csv"]));
        assert_eq!(config.inputs.before, PathBuf::from("x.csv"));
        assert_eq!(config.inputs.after, PathBuf::from("from_file.csv"));
        assert_eq!(config.selection.affected_links, ["kept"]);
        assert_eq!(config.policy.route_event, RouteEventKind::LinkLeave);
    }
}
