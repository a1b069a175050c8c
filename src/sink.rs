use async_trait::async_trait;
use thiserror::Error;

use crate::record::DecodedRecord;

/// Why a sink intentionally did not write a record. A skip is a routing
/// decision, not an attempted write that errored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("missing key: {0}")]
    MissingKey(&'static str),
    #[error("no numeric value field")]
    NoNumericValue,
    #[error("no product identifier")]
    NoProductInfo,
    /// The sink's client never initialized at startup; the sink is disabled
    /// for the process lifetime and never attempted.
    #[error("sink disabled at startup")]
    SinkDisabled,
}

#[derive(Debug, Error)]
pub enum SinkError {
    /// A per-sink routing/transform condition surfaced after routing.
    /// The dispatcher records this as a skip, not a failure.
    #[error(transparent)]
    Skip(#[from] SkipReason),
    #[error("store error: {0}")]
    Store(String),
    #[error("store responded {status}: {body}")]
    Response { status: u16, body: String },
    #[error("write timed out")]
    Timeout,
}

impl From<sqlx::Error> for SinkError {
    fn from(e: sqlx::Error) -> Self {
        SinkError::Store(e.to_string())
    }
}

impl From<reqwest::Error> for SinkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SinkError::Timeout
        } else {
            SinkError::Store(e.to_string())
        }
    }
}

pub type SinkResult<T> = Result<T, SinkError>;

/// The per-sink result of one dispatch.
#[derive(Debug)]
pub enum SinkOutcome {
    Written,
    Skipped(SkipReason),
    Failed(SinkError),
}

impl SinkOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, SinkOutcome::Written)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, SinkOutcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SinkOutcome::Failed(_))
    }
}

impl std::fmt::Display for SinkOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkOutcome::Written => write!(f, "written"),
            SinkOutcome::Skipped(reason) => write!(f, "skipped ({reason})"),
            SinkOutcome::Failed(err) => write!(f, "failed ({err})"),
        }
    }
}

/// A downstream store plus its write model and write call.
///
/// `route` is the pure applicability check; `write` transforms the record
/// into the sink's write model and commits it. Implementations must never
/// let a store error escape as anything but a [`SinkError`]; the dispatcher
/// relies on that to isolate failures per sink.
#[async_trait]
pub trait EventSink: Send + Sync {
    fn name(&self) -> &'static str;

    /// Decide whether this record carries the data the sink needs.
    /// Must not perform I/O.
    fn route(&self, record: &DecodedRecord) -> Result<(), SkipReason>;

    /// Transform and persist one record. Called only after `route` accepted
    /// the record.
    async fn write(&self, record: &DecodedRecord) -> SinkResult<()>;
}
