use chrono::{DateTime, Duration, Utc};

/// Days counted as "recent" for view totals.
pub const RECENT_WINDOW_DAYS: i64 = 30;

// Start of a trailing window of `days` ending at `now`.
pub fn window_start(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

// RFC3339 with a literal Z, the shape the Data API expects for publishedAfter.
pub fn api_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn published_after_recent() -> String {
    api_timestamp(window_start(Utc::now(), RECENT_WINDOW_DAYS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_is_thirty_days_back() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 5).unwrap();
        let start = window_start(now, RECENT_WINDOW_DAYS);
        assert_eq!(api_timestamp(start), "2024-02-14T12:30:05Z");
    }
}
