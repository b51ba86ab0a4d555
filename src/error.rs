use std::fmt;

/// Everything the routing core can fail with, per the error table in the
/// routing contract: invalid input snapshots, unresolvable endpoints, and
/// invariant violations that indicate a bug rather than bad input.
#[derive(thiserror::Error, Debug)]
pub enum RouteError {
    #[error("invalid map snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("could not resolve station {0:?}")]
    UnknownStation(String),

    #[error("origin and destination resolve to the same station")]
    SameStation,

    #[error("no route exists between the requested stations under the active filters")]
    NoPath,

    #[error("request was cancelled")]
    Cancelled,

    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    #[error("malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type RouteResult<T> = Result<T, RouteError>;

/// Cooperative cancellation token, checked by `GraphBuilder` before each
/// route-inclusion iteration and by `Router` before the shortest-path search.
#[derive(Clone, Default)]
pub struct CancellationToken(std::sync::Arc<std::sync::atomic::AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(std::sync::atomic::Ordering::Relaxed)
    }

    pub fn check(&self) -> RouteResult<()> {
        if self.is_cancelled() {
            Err(RouteError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CancellationToken({})", self.is_cancelled())
    }
}
