//! small — smallest end-to-end policy-impact study.
//!
//! Six commuters drive to an office park.  The baseline run lets them use a
//! river bridge; the policy run closes it.  The demo finds who used the
//! bridge, then compares their routes, distances and travel times between
//! the two runs.  Traces are built in memory; a production study reads the
//! simulation's CSV event logs with `impact_events::CsvEventSource`.

mod network;

use std::path::Path;

use anyhow::Result;

use impact_analysis::{
    AffectedLinks, AffectedSelector, DistanceAggregator, IdentityStrategy, Metric, RouteAggregator,
    RunPair, TravelTimeAggregator, compare_routes, compare_totals, run_pass,
};
use impact_core::{Event, LinkId};
use impact_events::{EventCounter, EventSource, MemorySource};
use impact_network::{LinkNetwork, Network};
use impact_report::{CsvReport, ReportWriter, TextReport};

use network::{DETOUR, DIRECT, SPEED_MPS, WESTERN, build_network};

// ── Trips ─────────────────────────────────────────────────────────────────────

/// (person, departure seconds after midnight, route)
type Trip = (&'static str, f64, &'static [&'static str]);

const BASELINE: &[Trip] = &[
    ("1", 7.0 * 3600.0,          DIRECT),
    ("2", 7.0 * 3600.0 + 300.0,  DIRECT),
    ("3", 7.5 * 3600.0,          DIRECT),
    ("4", 8.0 * 3600.0,          DETOUR),
    ("5", 7.0 * 3600.0 + 600.0,  WESTERN),
    ("6", 8.0 * 3600.0 + 900.0,  WESTERN),
];

// Bridge closed.  Agents 1–3 take the ring road, agent 4 leaves earlier.
const POLICY: &[Trip] = &[
    ("1", 7.0 * 3600.0,          DETOUR),
    ("2", 7.0 * 3600.0 + 300.0,  DETOUR),
    ("3", 7.5 * 3600.0,          DETOUR),
    ("4", 7.75 * 3600.0,         DETOUR),
    ("5", 7.0 * 3600.0 + 600.0,  WESTERN),
    ("6", 8.0 * 3600.0 + 900.0,  WESTERN),
];

/// Expand trips into a time-ordered event trace.
fn trace(name: &str, trips: &[Trip], network: &LinkNetwork) -> MemorySource {
    let mut events = Vec::new();
    for &(person, depart, route) in trips {
        let vehicle = format!("veh_{person}");
        let mut t = depart;
        events.push(Event::departure(t, person));
        events.push(Event::enters_traffic(t, &vehicle, person));
        for &link in route {
            events.push(Event::link_enter(t, &vehicle, link));
            t += network.link_length(&LinkId::from(link)).unwrap_or(0.0) / SPEED_MPS;
            events.push(Event::link_leave(t, &vehicle, link));
        }
        events.push(Event::arrival(t, person));
    }
    // Stable: a trip's own events keep their order at equal times.
    events.sort_by(|a, b| a.time().secs().total_cmp(&b.time().secs()));
    MemorySource::new(name, events)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== small — bridge closure study ===");

    // 1. Network and traces.
    let network = build_network()?;
    println!("Network: {} links, {:.0} m", network.link_count(), network.total_length_m());

    let before = trace("baseline", BASELINE, &network);
    let after = trace("bridge-closed", POLICY, &network);

    let mut counts = EventCounter::default();
    before.replay(&mut counts)?;
    println!(
        "Baseline trace: {} events ({} link leaves, {} trips)",
        counts.total(),
        counts.link_leave,
        counts.person_departure
    );
    println!();

    // 2. Affected population: everyone who crossed the bridge in the baseline.
    let links: AffectedLinks = [LinkId::from("bridge")].into_iter().collect();
    let selection = run_pass(&before, AffectedSelector::new(&links, IdentityStrategy::Binding))?;
    let population = &selection.population;

    let mut out = TextReport::stdout();
    out.write_selection(&selection)?;
    println!();

    // 3. Compare.
    let pair = RunPair::new(&before, &after);

    let (r0, r1) = pair.run(|| RouteAggregator::new(population))?;
    let routes = compare_routes(population, &r0, &r1);
    out.write_routes(&routes)?;
    println!();

    let (d0, d1) = pair.run(|| DistanceAggregator::new(population, &network))?;
    let distances = compare_totals(Metric::Distance, population, &d0, &d1);
    out.write_scalars(&distances)?;
    println!();

    let (t0, t1) = pair.run(|| TravelTimeAggregator::new(population))?;
    let times = compare_totals(Metric::TravelTime, population, &t0, &t1);
    out.write_scalars(&times)?;
    out.finish()?;

    // 4. CSV copies.
    let mut csv = CsvReport::new(Path::new("output/small"))?;
    csv.write_selection(&selection)?;
    csv.write_routes(&routes)?;
    csv.write_scalars(&distances)?;
    csv.write_scalars(&times)?;
    csv.finish()?;

    println!();
    for file in csv.files() {
        println!("  wrote {}", file.display());
    }

    Ok(())
}
