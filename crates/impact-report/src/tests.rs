//! Tests for impact-report.

#[cfg(test)]
mod fixtures {
    use impact_analysis::{
        AgentTotals, Metric, Population, RouteComparison, RouteLog, ScalarComparison, Selection,
        compare_routes, compare_totals,
    };
    use impact_core::{AgentId, LinkId, VehicleId};

    fn route(ids: &[&str]) -> Vec<LinkId> {
        ids.iter().map(|&l| LinkId::from(l)).collect()
    }

    pub fn population() -> Population {
        ["1", "2", "3"].into_iter().map(AgentId::from).collect()
    }

    /// Agent 1 reroutes, agent 2 keeps its route, agent 3 never drives.
    pub fn routes() -> RouteComparison {
        let before: RouteLog = [
            (AgentId::from("1"), route(&["L1", "L2"])),
            (AgentId::from("2"), route(&["L5"])),
        ]
        .into_iter()
        .collect();
        let after: RouteLog = [
            (AgentId::from("1"), route(&["L1", "L4"])),
            (AgentId::from("2"), route(&["L5"])),
        ]
        .into_iter()
        .collect();
        compare_routes(&population(), &before, &after)
    }

    pub fn distances() -> ScalarComparison {
        let before: AgentTotals =
            [(AgentId::from("1"), 100.0), (AgentId::from("2"), 50.0)].into_iter().collect();
        let after: AgentTotals =
            [(AgentId::from("1"), 80.0), (AgentId::from("2"), 75.5)].into_iter().collect();
        compare_totals(Metric::Distance, &population(), &before, &after)
    }

    pub fn selection() -> Selection {
        Selection {
            vehicles:   ["veh_1", "veh_2", "bus_9"].into_iter().map(VehicleId::from).collect(),
            population: ["1", "2"].into_iter().map(AgentId::from).collect(),
            unresolved: [VehicleId::from("bus_9")].into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod text_tests {
    use super::fixtures;
    use crate::text::TextReport;
    use crate::writer::{ReportWriter, format_route};
    use impact_core::LinkId;

    fn render(f: impl FnOnce(&mut TextReport<Vec<u8>>)) -> String {
        let mut report = TextReport::new(Vec::new());
        f(&mut report);
        report.finish().unwrap();
        String::from_utf8(report.into_inner()).unwrap()
    }

    #[test]
    fn format_route_brackets() {
        assert_eq!(format_route(&[]), "[]");
        assert_eq!(format_route(&[LinkId::from("L1"), LinkId::from("L2")]), "[L1, L2]");
    }

    #[test]
    fn routes_list_only_changed_agents() {
        let text = render(|r| r.write_routes(&fixtures::routes()).unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Agent 1 path changed: before=[L1, L2] after=[L1, L4]",
                "Number of affected agents: 3",
                "Number of agents whose paths have changed: 1",
            ]
        );
    }

    #[test]
    fn scalars_list_every_agent() {
        let text = render(|r| r.write_scalars(&fixtures::distances()).unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "=== Change in distance traveled (in meters) ===");
        assert_eq!(lines[1], "1: before=100.0, after=80.0, diff=-20.0 ↓");
        assert_eq!(lines[2], "2: before=50.0, after=75.5, diff=25.5 ↑");
        assert_eq!(lines[3], "3: before=0.0, after=0.0, diff=0.0 =");
        assert_eq!(lines[4], "Agents: 3, increased: 1, decreased: 1, unchanged: 1");
        assert_eq!(lines[5], "Total: before=150.0, after=155.5");
    }

    #[test]
    fn selection_lists_agents_and_unresolved() {
        let text = render(|r| r.write_selection(&fixtures::selection()).unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "The total number of agents directly affected: 2");
        assert_eq!(&lines[1..3], ["1", "2"]);
        assert_eq!(lines[3], "Vehicles on affected links with no known driver: 1");
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::fixtures;
    use crate::csv::CsvReport;
    use crate::writer::ReportWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read_all(path: &std::path::Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = rdr
            .records()
            .map(|r| r.unwrap().iter().map(str::to_owned).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tmp();
        let out = dir.path().join("nested").join("reports");
        let report = CsvReport::new(&out).unwrap();
        assert!(out.is_dir());
        assert!(report.files().is_empty());
    }

    #[test]
    fn route_changes_file() {
        let dir = tmp();
        let mut w = CsvReport::new(dir.path()).unwrap();
        w.write_routes(&fixtures::routes()).unwrap();
        w.finish().unwrap();

        let (headers, rows) = read_all(&dir.path().join("route_changes.csv"));
        assert_eq!(headers, ["agent_id", "changed", "before_links", "after_links", "before", "after"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ["1", "1", "2", "2", "[L1, L2]", "[L1, L4]"]);
        assert_eq!(rows[1][1], "0");
        assert_eq!(rows[2], ["3", "0", "0", "0", "[]", "[]"]);
    }

    #[test]
    fn scalar_file_named_after_metric() {
        let dir = tmp();
        let mut w = CsvReport::new(dir.path()).unwrap();
        w.write_scalars(&fixtures::distances()).unwrap();
        w.finish().unwrap();
        assert_eq!(w.files(), [dir.path().join("distance_deltas.csv")]);

        let (headers, rows) = read_all(&dir.path().join("distance_deltas.csv"));
        assert_eq!(headers, ["agent_id", "before", "after", "diff", "direction"]);
        assert_eq!(rows[0], ["1", "100", "80", "-20", "↓"]);
        assert_eq!(rows[1][3], "25.5");
        assert_eq!(rows[2][4], "=");
    }

    #[test]
    fn selection_file() {
        let dir = tmp();
        let mut w = CsvReport::new(dir.path()).unwrap();
        w.write_selection(&fixtures::selection()).unwrap();
        w.finish().unwrap();

        let (headers, rows) = read_all(&dir.path().join("affected_agents.csv"));
        assert_eq!(headers, ["agent_id"]);
        assert_eq!(rows, [["1"], ["2"]]);
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvReport::new(dir.path()).unwrap();
        w.write_routes(&fixtures::routes()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}
