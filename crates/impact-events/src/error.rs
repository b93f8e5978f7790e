use thiserror::Error;

/// Errors produced while replaying a trace.
#[derive(Debug, Error)]
pub enum EventError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("event log line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("event log line {line}: time {time} precedes previous event at {previous}")]
    OutOfOrder { line: u64, time: f64, previous: f64 },
}

pub type EventResult<T> = Result<T, EventError>;
