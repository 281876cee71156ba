use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A source of wall-clock time, in milliseconds since the Unix epoch.
///
/// Planners read the clock once per plan call (audit stamps, window
/// boundaries). Injecting it as a trait object lets tests pin time to a
/// fixed or stepped value and assert exact stamped output.
///
/// Implementations must be `Send` and `Sync` because many planner
/// invocations may read the clock concurrently.
pub trait Clock: Send + Sync {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// The production clock, backed by [`SystemTime`].
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as i64
    }
}
