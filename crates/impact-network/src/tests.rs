//! Unit tests for impact-network.
//!
//! All tests use hand-written CSV text or a builder, no files from disk
//! except where the file path itself is under test.

#[cfg(test)]
mod builder {
    use impact_core::LinkId;

    use crate::{LinkNetworkBuilder, Network};

    #[test]
    fn empty_network_finds_nothing() {
        let net = LinkNetworkBuilder::new().build();
        assert!(net.is_empty());
        assert_eq!(net.link_length(&LinkId::from("L1")), None);
    }

    #[test]
    fn lookup_distinguishes_unknown_from_zero() {
        let mut b = LinkNetworkBuilder::with_capacity(2);
        b.add_link("stub", 0.0);
        b.add_link("L1", 100.0);
        let net = b.build();
        assert_eq!(net.link_length(&LinkId::from("stub")), Some(0.0));
        assert_eq!(net.link_length(&LinkId::from("nope")), None);
        assert_eq!(net.link_count(), 2);
        assert_eq!(net.total_length_m(), 100.0);
    }

    #[test]
    fn add_link_replaces_and_reports_previous() {
        let mut b = LinkNetworkBuilder::new();
        assert_eq!(b.add_link("L1", 10.0), None);
        assert_eq!(b.add_link("L1", 12.0), Some(10.0));
        assert_eq!(b.build().link_length(&LinkId::from("L1")), Some(12.0));
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use impact_core::LinkId;

    use crate::{Network, NetworkError, load_network_csv, load_network_reader};

    const NETWORK_CSV: &str = "\
link_id,from_node,to_node,length_m
27392395#1,n17,n18,84.3
-27392253,n18,n17,84.3
L3,n1,n2,1200
";

    #[test]
    fn loads_lengths_and_ignores_extra_columns() {
        let net = load_network_reader(Cursor::new(NETWORK_CSV)).unwrap();
        assert_eq!(net.link_count(), 3);
        assert_eq!(net.link_length(&LinkId::from("-27392253")), Some(84.3));
        assert_eq!(net.link_length(&LinkId::from("L3")), Some(1200.0));
    }

    #[test]
    fn negative_length_rejected() {
        let csv = "link_id,length_m\nL1,-5\n";
        let err = load_network_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidLength { .. }), "got {err:?}");
    }

    #[test]
    fn duplicate_link_rejected() {
        let csv = "link_id,length_m\nL1,5\nL1,6\n";
        let err = load_network_reader(Cursor::new(csv)).unwrap_err();
        match err {
            NetworkError::DuplicateLink(id) => assert_eq!(id.as_str(), "L1"),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_network_csv(std::path::Path::new("/nonexistent/network.csv")).unwrap_err();
        assert!(matches!(err, NetworkError::Io(_)), "got {err:?}");
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("network.csv");
        std::fs::write(&path, NETWORK_CSV).unwrap();
        let net = load_network_csv(&path).unwrap();
        assert_eq!(net.link_count(), 3);
    }
}
