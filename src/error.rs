use thiserror::Error;

/// Stage-level error taxonomy for a pipeline run. Any variant aborts the
/// current run; the scheduler owns retries at run granularity.
#[derive(Debug, Error)]
pub enum EtlError {
    /// Upstream match/event provider unreachable or returned malformed data.
    #[error("input fetch failed: {0}")]
    InputFetch(#[source] anyhow::Error),

    /// Location reference table empty or unreadable. Fatal before any row
    /// processing starts.
    #[error("location reference unusable: {0}")]
    ResolutionInput(String),

    /// Weather provider failure for one (city, time) pair. A single bad
    /// lookup aborts the whole batch.
    #[error("weather fetch failed for {city} at {when}: {source}")]
    WeatherFetch {
        city: String,
        when: String,
        #[source]
        source: anyhow::Error,
    },

    /// Write/transaction failure against the store. The transaction is
    /// rolled back; prior table contents survive.
    #[error("persistence failed: {0}")]
    Persistence(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, EtlError>;
