//! Road network for the river-crossing study.
//!
//! Six links between a residential district and an office park.  The direct
//! route crosses `bridge`; the alternative runs south over `ring_s1` and
//! `ring_s2`.  The west side reaches the park over `west_arterial` and is
//! never near the bridge.

use std::io::Cursor;

use impact_network::{LinkNetwork, NetworkResult, load_network_reader};

const NETWORK_CSV: &str = "\
link_id,from_node,to_node,length_m\n\
home_access,residential,river_n,400\n\
bridge,river_n,river_s,650\n\
ring_s1,river_n,ring,1800\n\
ring_s2,ring,river_s,1200\n\
park_access,river_s,park,500\n\
west_arterial,west,park,2300\n\
";

/// Free-flow speed on every link, m/s (~50 km/h).
pub const SPEED_MPS: f64 = 13.9;

pub fn build_network() -> NetworkResult<LinkNetwork> {
    load_network_reader(Cursor::new(NETWORK_CSV))
}

pub const DIRECT:  &[&str] = &["home_access", "bridge", "park_access"];
pub const DETOUR:  &[&str] = &["home_access", "ring_s1", "ring_s2", "park_access"];
pub const WESTERN: &[&str] = &["west_arterial"];
