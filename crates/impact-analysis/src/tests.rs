//! Unit tests for impact-analysis.
//!
//! Traces are built in memory with the `Event` fixture constructors.

use impact_core::{AgentId, Event, LinkId};
use impact_events::MemorySource;

use crate::Population;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn population(ids: &[&str]) -> Population {
    ids.iter().map(|id| AgentId::from(*id)).collect()
}

fn links(ids: &[&str]) -> Vec<LinkId> {
    ids.iter().map(|id| LinkId::from(*id)).collect()
}

fn source(events: Vec<Event>) -> MemorySource {
    MemorySource::new("fixture", events)
}

/// `err` followed by each of its sources, joined as `{:#}` would print them.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut next = err.source();
    while let Some(e) = next {
        parts.push(e.to_string());
        next = e.source();
    }
    parts.join(": ")
}

// ── Identity resolver ─────────────────────────────────────────────────────────

#[cfg(test)]
mod resolver {
    use impact_core::{AgentId, VehicleId};

    use crate::{IdentityResolver, IdentityStrategy};

    #[test]
    fn binding_unknown_until_entry() {
        let mut r = IdentityResolver::new(IdentityStrategy::Binding);
        let v = VehicleId::from("car_7");
        assert_eq!(r.resolve(&v), None);
        r.observe_entry(&v, &AgentId::from("alice"));
        assert_eq!(r.resolve(&v), Some("alice"));
    }

    #[test]
    fn binding_persists_and_re_entry_replaces() {
        let mut r = IdentityResolver::new(IdentityStrategy::Binding);
        let v = VehicleId::from("car_7");
        r.observe_entry(&v, &AgentId::from("alice"));
        r.observe_entry(&v, &AgentId::from("alice"));
        assert_eq!(r.binding_count(), 1);
        r.observe_entry(&v, &AgentId::from("bob"));
        assert_eq!(r.resolve(&v), Some("bob"));
    }

    #[test]
    fn prefix_strips_or_passes_through() {
        let r = IdentityResolver::new(IdentityStrategy::default_prefix());
        assert_eq!(r.resolve(&VehicleId::from("veh_1001")), Some("1001"));
        assert_eq!(r.resolve(&VehicleId::from("bus_12")), Some("bus_12"));
        // Only the leading prefix is removed.
        assert_eq!(r.resolve(&VehicleId::from("veh_veh_3")), Some("veh_3"));
    }

    #[test]
    fn prefix_strategy_ignores_entries() {
        let mut r = IdentityResolver::new(IdentityStrategy::Prefix("p_".into()));
        r.observe_entry(&VehicleId::from("p_1"), &AgentId::from("someone_else"));
        assert_eq!(r.binding_count(), 0);
        assert_eq!(r.resolve(&VehicleId::from("p_1")), Some("1"));
    }
}

// ── Population file ───────────────────────────────────────────────────────────

#[cfg(test)]
mod population_file {
    use std::io::Cursor;

    use crate::{load_population, load_population_reader, write_population};

    #[test]
    fn trims_and_skips_blank_lines() {
        let text = "1001\n  1002 \n\n\t\nfreight_17\n1001\n";
        let pop = load_population_reader(Cursor::new(text)).unwrap();
        assert_eq!(pop.len(), 3);
        assert!(pop.contains("1002"));
        assert!(!pop.contains(""));
    }

    #[test]
    fn iteration_is_sorted() {
        let pop = load_population_reader(Cursor::new("b\na\nc\n")).unwrap();
        let ids: Vec<_> = pop.iter().map(|a| a.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn written_file_loads_back() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("affected.txt");
        let pop = super::population(&["2", "1", "-27"]);
        write_population(&path, &pop).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "-27\n1\n2\n");
        assert_eq!(load_population(&path).unwrap(), pop);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_population(std::path::Path::new("/nonexistent/affected.txt")).unwrap_err();
        assert!(matches!(err, crate::AnalysisError::Io(_)), "got {err:?}");
        let chain = super::error_chain(&err);
        assert_eq!(chain.matches("os error").count(), 1, "{chain}");
    }

    #[test]
    fn wrapped_trace_error_prints_cause_once() {
        use impact_events::CsvEventSource;

        use crate::{AffectedLinks, AffectedSelector, IdentityStrategy, run_pass};

        let links = AffectedLinks::default();
        let src = CsvEventSource::new("/nonexistent/events.csv");
        let err = run_pass(&src, AffectedSelector::new(&links, IdentityStrategy::Binding)).unwrap_err();
        assert!(matches!(err, crate::AnalysisError::Events(_)), "got {err:?}");
        let chain = super::error_chain(&err);
        assert_eq!(chain.matches("os error").count(), 1, "{chain}");
    }
}

// ── Affected-population selector ──────────────────────────────────────────────

#[cfg(test)]
mod selector {
    use std::io::Cursor;

    use super::*;
    use crate::{AffectedLinks, AffectedSelector, IdentityStrategy, load_links_reader, run_pass};

    fn sensitive() -> AffectedLinks {
        links(&["27392395#1", "-27392253"]).into_iter().collect()
    }

    fn trace() -> MemorySource {
        source(vec![
            Event::enters_traffic(1.0, "veh_1", "1"),
            Event::link_leave(2.0, "veh_1", "27392395#1"),
            Event::link_leave(3.0, "veh_1", "27392395#1"),
            Event::link_leave(4.0, "veh_1", "-27392253"),
            Event::link_enter(4.0, "veh_2", "27392395#1"),
            Event::link_leave(5.0, "veh_3", "other"),
            Event::link_leave(6.0, "veh_4", "-27392253"),
        ])
    }

    #[test]
    fn duplicates_collapse_and_only_link_leave_counts() {
        let links = sensitive();
        let sel = run_pass(&trace(), AffectedSelector::new(&links, IdentityStrategy::default_prefix()))
            .unwrap();
        let vehicles: Vec<_> = sel.vehicles.iter().map(|v| v.as_str()).collect();
        assert_eq!(vehicles, ["veh_1", "veh_4"]);
        let agents: Vec<_> = sel.population.iter().map(|a| a.as_str()).collect();
        assert_eq!(agents, ["1", "4"]);
        assert!(sel.unresolved.is_empty());
    }

    #[test]
    fn recomputation_is_identical() {
        let links = sensitive();
        let src = trace();
        let a = run_pass(&src, AffectedSelector::new(&links, IdentityStrategy::default_prefix())).unwrap();
        let b = run_pass(&src, AffectedSelector::new(&links, IdentityStrategy::default_prefix())).unwrap();
        assert_eq!(a.vehicles, b.vehicles);
        assert_eq!(a.population, b.population);
    }

    #[test]
    fn binding_strategy_reports_unbound_vehicles() {
        let links = sensitive();
        let sel = run_pass(&trace(), AffectedSelector::new(&links, IdentityStrategy::Binding)).unwrap();
        assert_eq!(sel.vehicles.len(), 2);
        assert_eq!(sel.population, population(&["1"]));
        let unresolved: Vec<_> = sel.unresolved.iter().map(|v| v.as_str()).collect();
        assert_eq!(unresolved, ["veh_4"]);
    }

    #[test]
    fn no_matches_is_empty_not_error() {
        let links: AffectedLinks = links(&["nowhere"]).into_iter().collect();
        let sel = run_pass(&trace(), AffectedSelector::new(&links, IdentityStrategy::Binding)).unwrap();
        assert!(sel.vehicles.is_empty());
        assert!(sel.population.is_empty());
    }

    #[test]
    fn links_file_keeps_hash_in_ids() {
        let links = load_links_reader(Cursor::new("27392395#1\n\n 8599767 \n")).unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.contains(&LinkId::from("27392395#1")));
        assert!(links.contains(&LinkId::from("8599767")));
    }
}

// ── Route aggregator ──────────────────────────────────────────────────────────

#[cfg(test)]
mod route {
    use super::*;
    use crate::{
        AnalysisError, IdentityStrategy, RouteAggregator, RouteEventKind, UnresolvedPolicy, run_pass,
    };

    fn trace() -> MemorySource {
        source(vec![
            Event::link_enter(1.0, "veh_A", "L1"),
            Event::link_leave(2.0, "veh_A", "L1"),
            Event::link_enter(2.0, "veh_A", "L2"),
            Event::link_leave(3.0, "veh_B", "L7"),
            Event::link_leave(4.0, "veh_A", "L2"),
            Event::link_enter(4.0, "veh_A", "L3"),
            Event::link_leave(5.0, "veh_A", "L3"),
            Event::link_leave(6.0, "veh_Z", "L9"),
        ])
    }

    #[test]
    fn link_leave_routes_in_event_order() {
        let pop = population(&["A", "B"]);
        let routes = run_pass(&trace(), RouteAggregator::new(&pop)).unwrap();
        assert_eq!(routes.route("A"), links(&["L1", "L2", "L3"]).as_slice());
        assert_eq!(routes.route("B"), links(&["L7"]).as_slice());
    }

    #[test]
    fn link_enter_mode() {
        let pop = population(&["A"]);
        let agg = RouteAggregator::new(&pop).event_kind(RouteEventKind::LinkEnter);
        let routes = run_pass(&trace(), agg).unwrap();
        assert_eq!(routes.route("A"), links(&["L1", "L2", "L3"]).as_slice());
        assert!(routes.route("B").is_empty());
    }

    #[test]
    fn deterministic_over_identical_traces() {
        let pop = population(&["A", "B"]);
        let src = trace();
        let first = run_pass(&src, RouteAggregator::new(&pop)).unwrap();
        let second = run_pass(&src, RouteAggregator::new(&pop)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn output_stays_inside_population() {
        let pop = population(&["B"]);
        let routes = run_pass(&trace(), RouteAggregator::new(&pop)).unwrap();
        assert!(routes.agents().all(|a| pop.contains(a.as_str())));
        assert_eq!(routes.agent_count(), 1);
        assert!(routes.route("Z").is_empty());
    }

    #[test]
    fn binding_strategy_drops_events_before_entry() {
        let src = source(vec![
            Event::link_leave(1.0, "car", "L0"),
            Event::enters_traffic(2.0, "car", "A"),
            Event::link_leave(3.0, "car", "L1"),
        ]);
        let pop = population(&["A"]);
        let agg = RouteAggregator::new(&pop).strategy(IdentityStrategy::Binding);
        let routes = run_pass(&src, agg).unwrap();
        assert_eq!(routes.route("A"), links(&["L1"]).as_slice());
    }

    #[test]
    fn reject_policy_fails_on_unbound_vehicle() {
        let src = source(vec![Event::link_leave(1.0, "car", "L0")]);
        let pop = population(&["A"]);
        let agg = RouteAggregator::new(&pop)
            .strategy(IdentityStrategy::Binding)
            .unresolved_policy(UnresolvedPolicy::Reject);
        let err = run_pass(&src, agg).unwrap_err();
        assert!(matches!(err, AnalysisError::UnresolvedVehicle(ref v) if v.as_str() == "car"));
    }
}

// ── Distance aggregator ───────────────────────────────────────────────────────

#[cfg(test)]
mod distance {
    use impact_network::{LinkNetwork, LinkNetworkBuilder};

    use super::*;
    use crate::{Aggregator, DistanceAggregator, IdentityStrategy, run_pass};

    fn network() -> LinkNetwork {
        let mut b = LinkNetworkBuilder::new();
        b.add_link("L1", 100.0);
        b.add_link("L3", 40.5);
        b.build()
    }

    #[test]
    fn unknown_link_contributes_nothing() {
        let net = network();
        let pop = population(&["A"]);
        let src = source(vec![
            Event::enters_traffic(0.0, "car_1", "A"),
            Event::link_leave(1.0, "car_1", "L1"),
            Event::link_leave(2.0, "car_1", "L2"),
        ]);
        let mut agg = DistanceAggregator::new(&pop, &net);
        for e in src.events() {
            impact_events::EventHandler::handle(&mut agg, e);
        }
        assert_eq!(agg.stats().unknown_links, 1);
        let totals = agg.finish().unwrap();
        assert_eq!(totals.get("A"), 100.0);
    }

    #[test]
    fn unbound_vehicle_events_are_dropped() {
        let net = network();
        let pop = population(&["A"]);
        let src = source(vec![
            Event::link_leave(1.0, "car_1", "L1"),
            Event::enters_traffic(2.0, "car_1", "A"),
            Event::link_leave(3.0, "car_1", "L3"),
            Event::link_enter(3.0, "car_1", "L1"),
        ]);
        let totals = run_pass(&src, DistanceAggregator::new(&pop, &net)).unwrap();
        assert_eq!(totals.get("A"), 40.5);
    }

    #[test]
    fn agents_outside_population_are_ignored() {
        let net = network();
        let pop = population(&["A"]);
        let src = source(vec![
            Event::enters_traffic(0.0, "car_2", "B"),
            Event::link_leave(1.0, "car_2", "L1"),
        ]);
        let totals = run_pass(&src, DistanceAggregator::new(&pop, &net)).unwrap();
        assert_eq!(totals.agent_count(), 0);
        assert_eq!(totals.get("A"), 0.0);
        assert_eq!(totals.get("B"), 0.0);
    }

    #[test]
    fn prefix_strategy_needs_no_entry_event() {
        let net = network();
        let pop = population(&["A"]);
        let src = source(vec![Event::link_leave(1.0, "veh_A", "L1")]);
        let agg = DistanceAggregator::new(&pop, &net).strategy(IdentityStrategy::default_prefix());
        assert_eq!(run_pass(&src, agg).unwrap().get("A"), 100.0);
    }
}

// ── Travel-time aggregator ────────────────────────────────────────────────────

#[cfg(test)]
mod travel_time {
    use super::*;
    use crate::{AnalysisError, DeparturePolicy, TravelTimeAggregator, run_pass};

    #[test]
    fn departure_arrival_pair() {
        let pop = population(&["A"]);
        let src = source(vec![Event::departure(10.0, "A"), Event::arrival(25.0, "A")]);
        assert_eq!(run_pass(&src, TravelTimeAggregator::new(&pop)).unwrap().get("A"), 15.0);
    }

    #[test]
    fn stray_arrival_contributes_nothing() {
        let pop = population(&["A"]);
        let src = source(vec![
            Event::departure(10.0, "A"),
            Event::arrival(25.0, "A"),
            Event::arrival(40.0, "A"),
        ]);
        assert_eq!(run_pass(&src, TravelTimeAggregator::new(&pop)).unwrap().get("A"), 15.0);
    }

    #[test]
    fn last_departure_wins() {
        let pop = population(&["A"]);
        let src = source(vec![
            Event::departure(5.0, "A"),
            Event::departure(8.0, "A"),
            Event::arrival(20.0, "A"),
        ]);
        assert_eq!(run_pass(&src, TravelTimeAggregator::new(&pop)).unwrap().get("A"), 12.0);
    }

    #[test]
    fn trips_accumulate() {
        let pop = population(&["A", "B"]);
        let src = source(vec![
            Event::departure(100.0, "A"),
            Event::departure(110.0, "B"),
            Event::arrival(160.0, "A"),
            Event::departure(300.0, "A"),
            Event::arrival(330.0, "A"),
            Event::departure(400.0, "C"),
            Event::arrival(500.0, "C"),
        ]);
        let totals = run_pass(&src, TravelTimeAggregator::new(&pop)).unwrap();
        assert_eq!(totals.get("A"), 90.0);
        // B never arrives.
        assert_eq!(totals.get("B"), 0.0);
        assert_eq!(totals.get("C"), 0.0);
        assert_eq!(totals.agent_count(), 1);
    }

    #[test]
    fn reject_policy_fails_on_overlap() {
        let pop = population(&["A"]);
        let src = source(vec![Event::departure(5.0, "A"), Event::departure(8.0, "A")]);
        let agg = TravelTimeAggregator::new(&pop).departure_policy(DeparturePolicy::Reject);
        let err = run_pass(&src, agg).unwrap_err();
        assert!(matches!(err, AnalysisError::OverlappingDeparture { .. }), "got {err:?}");
    }
}

// ── Comparator ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod compare {
    use super::*;
    use crate::{
        AgentTotals, Direction, Metric, RouteAggregator, RouteLog, RunPair, TravelTimeAggregator,
        compare_routes, compare_totals,
    };

    #[test]
    fn route_change_detection() {
        let pop = population(&["A", "B"]);
        let before: RouteLog = [
            (AgentId::from("A"), links(&["L1", "L2", "L3"])),
            (AgentId::from("B"), links(&["L1", "L2"])),
        ]
        .into_iter()
        .collect();
        let after: RouteLog = [
            (AgentId::from("A"), links(&["L1", "L4", "L3"])),
            (AgentId::from("B"), links(&["L1", "L2"])),
        ]
        .into_iter()
        .collect();

        let cmp = compare_routes(&pop, &before, &after);
        assert_eq!(cmp.population_size(), 2);
        assert_eq!(cmp.changed_count(), 1);
        assert_eq!(cmp.changed().next().unwrap().agent.as_str(), "A");
    }

    #[test]
    fn missing_route_is_empty_route() {
        let pop = population(&["A", "B"]);
        let before: RouteLog = [(AgentId::from("A"), links(&["L1"]))].into_iter().collect();
        let cmp = compare_routes(&pop, &before, &RouteLog::default());
        // A lost its route; B is empty in both runs.
        assert_eq!(cmp.changed_count(), 1);
        assert!(!cmp.rows[1].changed());
    }

    #[test]
    fn zero_default_equivalence() {
        let pop = population(&["A"]);
        let explicit: AgentTotals = [(AgentId::from("A"), 0.0)].into_iter().collect();
        let absent = AgentTotals::default();

        for (before, after) in [(&explicit, &absent), (&absent, &explicit), (&absent, &absent)] {
            let cmp = compare_totals(Metric::Distance, &pop, before, after);
            assert_eq!(cmp.rows[0].diff(), 0.0);
            assert_eq!(cmp.rows[0].direction(), Direction::NoChange);
            assert_eq!(cmp.rows[0].direction().marker(), '=');
        }
    }

    #[test]
    fn scalar_directions_and_counts() {
        let pop = population(&["A", "B", "C"]);
        let before: AgentTotals =
            [(AgentId::from("A"), 100.0), (AgentId::from("B"), 50.0)].into_iter().collect();
        let after: AgentTotals =
            [(AgentId::from("A"), 80.0), (AgentId::from("B"), 75.5)].into_iter().collect();

        let cmp = compare_totals(Metric::TravelTime, &pop, &before, &after);
        let markers: String = cmp.rows.iter().map(|r| r.direction().marker()).collect();
        assert_eq!(markers, "↓↑=");
        assert_eq!(cmp.rows[1].diff(), 25.5);
        assert_eq!(cmp.count(Direction::Increase), 1);
        assert_eq!(cmp.count(Direction::Decrease), 1);
        assert_eq!(cmp.count(Direction::NoChange), 1);
        assert_eq!(cmp.total_before(), 150.0);
        assert_eq!(cmp.total_after(), 155.5);
    }

    #[test]
    fn run_pair_uses_independent_passes() {
        let pop = population(&["A"]);
        let before = source(vec![Event::departure(0.0, "A")]);
        // An arrival in the after trace must not close the before trip.
        let after = source(vec![Event::arrival(30.0, "A")]);
        let (b, a) = RunPair::new(&before, &after)
            .run(|| TravelTimeAggregator::new(&pop))
            .unwrap();
        assert_eq!(b.get("A"), 0.0);
        assert_eq!(a.get("A"), 0.0);
    }

    #[test]
    fn end_to_end_route_study() {
        let pop = population(&["1", "2"]);
        let before = source(vec![
            Event::link_leave(1.0, "veh_1", "L1"),
            Event::link_leave(2.0, "veh_1", "L2"),
            Event::link_leave(3.0, "veh_2", "L5"),
        ]);
        let after = source(vec![
            Event::link_leave(1.0, "veh_1", "L1"),
            Event::link_leave(2.0, "veh_1", "L9"),
            Event::link_leave(3.0, "veh_2", "L5"),
        ]);
        let (b, a) = RunPair::new(&before, &after).run(|| RouteAggregator::new(&pop)).unwrap();
        let cmp = compare_routes(&pop, &b, &a);
        assert_eq!(cmp.changed_count(), 1);
        assert_eq!(cmp.rows[0].after, links(&["L1", "L9"]));
    }
}
