//! CSV event-log reader.
//!
//! # CSV format
//!
//! One row per event, in log order.  Fields a given event type does not use
//! are left empty.
//!
//! ```csv
//! time,type,vehicle,person,link
//! 21600,departure,,1001,
//! 21600,vehicle enters traffic,veh_1001,1001,
//! 21631.5,left link,veh_1001,,27392395#1
//! 21631.5,entered link,veh_1001,,27392316
//! 21700,arrival,,1001,
//! ```
//!
//! `type` takes the tags of [`EventKind::tag`].  Rows of any other type
//! (activity starts, teleportation, ...) have no callback and are skipped.
//! Timestamps must be non-decreasing; a trace that goes backwards is rejected
//! rather than analysed out of order.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use impact_core::{Event, EventKind, SimTime};

use crate::{EventError, EventHandler, EventResult, EventSource};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct EventRecord {
    time:    f64,
    #[serde(rename = "type")]
    kind:    String,
    #[serde(default)]
    vehicle: Option<String>,
    #[serde(default)]
    person:  Option<String>,
    #[serde(default)]
    link:    Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// An [`EventSource`] backed by a CSV file on disk.
///
/// The file is opened afresh on every [`replay`](EventSource::replay), so a
/// missing or unreadable file surfaces as [`EventError::Io`] from the pass
/// that needed it.
#[derive(Debug, Clone)]
pub struct CsvEventSource {
    path: PathBuf,
}

impl CsvEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSource for CsvEventSource {
    fn replay(&self, handler: &mut dyn EventHandler) -> EventResult<u64> {
        let file = File::open(&self.path)?;
        let n = read_events_reader(BufReader::new(file), handler)?;
        debug!(path = %self.path.display(), events = n, "replayed event log");
        Ok(n)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Replay CSV events from any `Read` source into `handler`.
///
/// Useful for testing (pass a `std::io::Cursor`).  Returns the number of
/// events delivered.  Stops at the first malformed row; events before it have
/// already been delivered, so callers must discard the handler on error.
pub fn read_events_reader<R: Read>(reader: R, handler: &mut dyn EventHandler) -> EventResult<u64> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut record = csv::StringRecord::new();
    let mut previous = f64::NEG_INFINITY;
    let mut count = 0u64;
    let mut skipped = 0u64;

    while csv_reader.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: EventRecord = record.deserialize(Some(&headers))?;

        if row.time.is_nan() {
            return Err(EventError::Parse { line, message: "time is NaN".into() });
        }
        if row.time < previous {
            return Err(EventError::OutOfOrder { line, time: row.time, previous });
        }
        previous = row.time;

        let Ok(kind) = row.kind.parse::<EventKind>() else {
            skipped += 1;
            continue;
        };
        let event = to_event(kind, row, line)?;
        handler.handle(&event);
        count += 1;
    }

    if skipped > 0 {
        debug!(skipped, "skipped events of unhandled types");
    }
    Ok(count)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn to_event(kind: EventKind, row: EventRecord, line: u64) -> EventResult<Event> {
    let time = SimTime(row.time);

    let field = |value: Option<String>, name: &str| {
        value.filter(|v| !v.is_empty()).ok_or_else(|| EventError::Parse {
            line,
            message: format!("{kind} event is missing the {name} field"),
        })
    };

    Ok(match kind {
        EventKind::VehicleEntersTraffic => Event::VehicleEntersTraffic {
            time,
            vehicle: field(row.vehicle, "vehicle")?.into(),
            person:  field(row.person, "person")?.into(),
        },
        EventKind::LinkEnter => Event::LinkEnter {
            time,
            vehicle: field(row.vehicle, "vehicle")?.into(),
            link:    field(row.link, "link")?.into(),
        },
        EventKind::LinkLeave => Event::LinkLeave {
            time,
            vehicle: field(row.vehicle, "vehicle")?.into(),
            link:    field(row.link, "link")?.into(),
        },
        EventKind::PersonDeparture => Event::PersonDeparture {
            time,
            person: field(row.person, "person")?.into(),
        },
        EventKind::PersonArrival => Event::PersonArrival {
            time,
            person: field(row.person, "person")?.into(),
        },
    })
}
