//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time as Unix epoch milliseconds
///
/// Stored timestamps (`createdAt`, `addedAt`, cookie expiry) all use this unit.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_now_millis_matches_now() {
        let millis = now_millis();
        let stamp = now().timestamp_millis();
        assert!((stamp - millis).abs() < 1_000);
    }

    #[test]
    fn test_now_millis_is_recent() {
        // After 2020-01-01, before 2100-01-01
        let millis = now_millis();
        assert!(millis > 1_577_836_800_000);
        assert!(millis < 4_102_444_800_000);
    }

    #[tokio::test]
    async fn test_now_millis_advances() {
        let first = now_millis();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(now_millis() > first);
    }
}
