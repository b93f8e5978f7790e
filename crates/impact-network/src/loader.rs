//! CSV network loader.
//!
//! # CSV format
//!
//! One row per directed link.  Extra columns (node ids, capacity, free
//! speed, ...) are ignored.
//!
//! ```csv
//! link_id,from_node,to_node,length_m
//! 27392395#1,n17,n18,84.3
//! -27392253,n18,n17,84.3
//! ```
//!
//! Lengths must be finite and non-negative; a link id appearing twice is
//! rejected.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use impact_core::LinkId;

use crate::{LinkNetwork, LinkNetworkBuilder, NetworkError, NetworkResult};

#[derive(Deserialize)]
struct LinkRecord {
    link_id:  String,
    length_m: f64,
}

/// Load a [`LinkNetwork`] from a CSV file.
pub fn load_network_csv(path: &Path) -> NetworkResult<LinkNetwork> {
    let file = std::fs::File::open(path)?;
    let network = load_network_reader(file)?;
    info!(
        path  = %path.display(),
        links = network.link_count(),
        "loaded network"
    );
    Ok(network)
}

/// Like [`load_network_csv`] but accepts any `Read` source.
pub fn load_network_reader<R: Read>(reader: R) -> NetworkResult<LinkNetwork> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut builder = LinkNetworkBuilder::new();

    for result in csv_reader.deserialize::<LinkRecord>() {
        let row = result?;
        let link = LinkId::from(row.link_id);

        if !row.length_m.is_finite() || row.length_m < 0.0 {
            return Err(NetworkError::InvalidLength { link, length_m: row.length_m });
        }
        if builder.contains(link.as_str()) {
            return Err(NetworkError::DuplicateLink(link));
        }
        builder.add_link(link, row.length_m);
    }

    Ok(builder.build())
}
