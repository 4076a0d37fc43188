use mockall::automock;
use time::OffsetDateTime;

pub type Timestamp = OffsetDateTime;

#[automock]
pub trait Clock: Sync + Send + 'static {
    fn now(&self) -> Timestamp;
}

#[derive(Clone, Debug, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn now(&self) -> Timestamp {
        OffsetDateTime::now_utc()
    }
}

/// Milliseconds elapsed since the Unix epoch
pub fn unix_millis(timestamp: Timestamp) -> i64 {
    (timestamp.unix_timestamp_nanos() / 1_000_000) as i64
}
