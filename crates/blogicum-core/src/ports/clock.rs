use chrono::{DateTime, Utc};

/// Source of "now" for publication-date checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
