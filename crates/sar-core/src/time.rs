use chrono::{DateTime, Utc};

/// Milliseconds since the Unix epoch.
pub type EpochMillis = u64;
pub type Timestamp = DateTime<Utc>;

pub fn now() -> Timestamp {
    Utc::now()
}

pub fn now_epoch_millis() -> EpochMillis {
    u64::try_from(now().timestamp_millis()).unwrap_or_default()
}
