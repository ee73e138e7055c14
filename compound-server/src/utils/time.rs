//! Time helpers for the order query surface

use chrono::{DateTime, NaiveDate, Utc};

/// One day in epoch millis
pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Parse an RFC 3339 datetime or a plain `YYYY-MM-DD` date into epoch millis
pub fn parse_datetime_millis(input: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).timestamp_millis());
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }
    None
}

/// Widen an inclusive formation-date range by one day on each side
///
/// The lower bound moves one day back (>=), the upper bound one day forward
/// and stays exclusive (<). This absorbs timezone/precision skew between the
/// stored timestamps and the caller's date inputs; the query layer must only
/// ever go through this function so the heuristic stays in one place.
pub fn widen_formation_range(
    start: Option<i64>,
    end: Option<i64>,
) -> (Option<i64>, Option<i64>) {
    (
        start.map(|s| s - DAY_MILLIS),
        end.map(|e| e + DAY_MILLIS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let millis = parse_datetime_millis("2025-03-01T12:00:00Z").unwrap();
        assert_eq!(millis, 1_740_830_400_000);
    }

    #[test]
    fn test_parse_plain_date() {
        let millis = parse_datetime_millis("2025-03-01").unwrap();
        assert_eq!(millis, 1_740_787_200_000);
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_datetime_millis("yesterday").is_none());
        assert!(parse_datetime_millis("").is_none());
    }

    #[test]
    fn test_widen_range_pads_both_sides() {
        let t = 1_740_787_200_000;
        let (from, until) = widen_formation_range(Some(t), Some(t));
        assert_eq!(from, Some(t - DAY_MILLIS));
        assert_eq!(until, Some(t + DAY_MILLIS));
    }

    #[test]
    fn test_widen_range_keeps_missing_bounds_open() {
        assert_eq!(widen_formation_range(None, None), (None, None));
        let (from, until) = widen_formation_range(Some(0), None);
        assert_eq!(from, Some(-DAY_MILLIS));
        assert_eq!(until, None);
    }

    /// 同日查询（start == end == T）必须命中 date_formation == T：
    /// 下界 T-1d <= T，上界 T+1d > T。三天之后则不再命中。
    #[test]
    fn test_same_day_query_is_inclusive() {
        let t = 1_740_787_200_000;
        let (from, until) = widen_formation_range(Some(t), Some(t));
        assert!(from.unwrap() <= t && t < until.unwrap());

        let shifted = t + 3 * DAY_MILLIS;
        let (from, until) = widen_formation_range(Some(shifted), Some(shifted));
        assert!(!(from.unwrap() <= t && t < until.unwrap()));
    }
}
