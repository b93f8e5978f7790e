//! Subcommand execution: load inputs, run the passes, render the report.
//!
//! Every input is read and every pass finished before the report is opened,
//! so a failing run prints nothing and leaves no report files behind.

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use impact_analysis::{
    AffectedLinks, AffectedSelector, DistanceAggregator, Metric, Population, RouteAggregator,
    RouteComparison, RunPair, ScalarComparison, Selection, TravelTimeAggregator, compare_routes,
    compare_totals, load_links, load_population, run_pass, write_population,
};
use impact_core::LinkId;
use impact_events::CsvEventSource;
use impact_network::load_network_csv;
use impact_report::{CsvReport, ReportWriter, TextReport};

use crate::cli::{Command, ReportFormat};
use crate::config::Config;

/// What one subcommand found.
enum Findings {
    Selection(Selection),
    Routes(RouteComparison),
    Scalars(ScalarComparison),
}

/// Run one analysis subcommand with the merged configuration.
pub fn run(command: &Command, config: &Config) -> Result<()> {
    let findings = match command {
        Command::Affected(_)   => Findings::Selection(affected(config)?),
        Command::Routes(_)     => Findings::Routes(routes(config)?),
        Command::Distance(_)   => Findings::Scalars(distance(config)?),
        Command::TravelTime(_) => Findings::Scalars(travel_time(config)?),
        Command::InitConfig { .. } => bail!("init-config does not run an analysis"),
    };

    let mut report = open_report(config)?;
    match &findings {
        Findings::Selection(selection) => report.write_selection(selection)?,
        Findings::Routes(comparison)   => report.write_routes(comparison)?,
        Findings::Scalars(comparison)  => report.write_scalars(comparison)?,
    }
    report.finish().context("Failed to write report")?;
    Ok(())
}

fn open_report(config: &Config) -> Result<Box<dyn ReportWriter>> {
    Ok(match config.report.format {
        ReportFormat::Text => Box::new(TextReport::stdout()),
        ReportFormat::Csv => {
            let dir = &config.report.output_dir;
            info!("Writing CSV reports to {}", dir.display());
            let report = CsvReport::new(dir)
                .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;
            Box::new(report)
        }
    })
}

fn affected_links(config: &Config) -> Result<AffectedLinks> {
    let mut links = match &config.selection.links_file {
        Some(path) => load_links(path)
            .with_context(|| format!("Failed to load links file: {}", path.display()))?,
        None => AffectedLinks::default(),
    };
    links.extend(config.selection.affected_links.iter().map(|l| LinkId::from(l.as_str())));
    if links.is_empty() {
        warn!("No affected links configured; the affected population will be empty");
    }
    Ok(links)
}

fn population(config: &Config) -> Result<Population> {
    let path = &config.inputs.agents;
    load_population(path)
        .with_context(|| format!("Failed to load affected agents: {}", path.display()))
}

/// Select the affected agents and persist them to the agents file.
fn affected(config: &Config) -> Result<Selection> {
    let links = affected_links(config)?;
    let source = CsvEventSource::new(&config.inputs.before);
    let strategy = config.identity.strategy(config.identity.selector);

    let selection = run_pass(&source, AffectedSelector::new(&links, strategy))
        .with_context(|| format!("Failed to select affected agents from {}", source.path().display()))?;
    if !selection.unresolved.is_empty() {
        warn!(
            "{} affected vehicles could not be resolved to an agent",
            selection.unresolved.len()
        );
    }

    write_population(&config.inputs.agents, &selection.population).with_context(|| {
        format!("Failed to write affected agents: {}", config.inputs.agents.display())
    })?;
    info!(
        "Wrote {} affected agents to {}",
        selection.population.len(),
        config.inputs.agents.display()
    );
    Ok(selection)
}

fn routes(config: &Config) -> Result<RouteComparison> {
    let population = population(config)?;
    let strategy = config.identity.strategy(config.identity.routes);
    let policy = &config.policy;

    let (before, after) = trace_pair(config, |pair| {
        pair.run(|| {
            RouteAggregator::new(&population)
                .strategy(strategy.clone())
                .event_kind(policy.route_event)
                .unresolved_policy(policy.unresolved)
        })
    })?;

    Ok(compare_routes(&population, &before, &after))
}

fn distance(config: &Config) -> Result<ScalarComparison> {
    let population = population(config)?;
    let path = &config.inputs.network;
    let network = load_network_csv(path)
        .with_context(|| format!("Failed to load network: {}", path.display()))?;
    let strategy = config.identity.strategy(config.identity.distance);
    let unresolved = config.policy.unresolved;

    let (before, after) = trace_pair(config, |pair| {
        pair.run(|| {
            DistanceAggregator::new(&population, &network)
                .strategy(strategy.clone())
                .unresolved_policy(unresolved)
        })
    })?;

    Ok(compare_totals(Metric::Distance, &population, &before, &after))
}

fn travel_time(config: &Config) -> Result<ScalarComparison> {
    let population = population(config)?;
    let departure = config.policy.departure;

    let (before, after) = trace_pair(config, |pair| {
        pair.run(|| TravelTimeAggregator::new(&population).departure_policy(departure))
    })?;

    Ok(compare_totals(Metric::TravelTime, &population, &before, &after))
}

/// Open both traces and run `f` on them as a pair.
fn trace_pair<T>(
    config: &Config,
    f: impl FnOnce(&RunPair<'_>) -> impact_analysis::AnalysisResult<T>,
) -> Result<T> {
    let before = CsvEventSource::new(&config.inputs.before);
    let after = CsvEventSource::new(&config.inputs.after);
    f(&RunPair::new(&before, &after)).with_context(|| {
        format!(
            "Failed to analyse {} against {}",
            before.path().display(),
            after.path().display()
        )
    })
}
