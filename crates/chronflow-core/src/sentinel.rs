//! Missing-value sentinels.
//!
//! Timestamps and durations can be undefined — the first observation in a
//! series has no preceding point to take a delta against, a raw reading can
//! arrive without a timestamp at all. Rather than smuggling that through
//! `Option`, the rest of the crate follows the convention the data model
//! already uses for measurements (`f64::NAN`) and gives timestamps and
//! durations their own sentinel values that propagate the same way.

use chrono::{DateTime, Utc};

/// Sentinel for "Not-a-Duration" (NaD): the most negative representable
/// nanosecond count. Any arithmetic that would need a duration derived from
/// an undefined or missing timestamp should produce this instead of an
/// arbitrary number.
pub const NOT_A_DURATION: i64 = i64::MIN;

/// Returns true if `d` is the Not-a-Duration sentinel.
pub fn is_not_a_duration(d: i64) -> bool {
    d == NOT_A_DURATION
}

/// Sentinel for "Not-a-Date": the canonical "no valid timestamp" marker.
/// Uses the minimum representable `DateTime<Utc>` rather than the Unix
/// epoch, since midnight 1970-01-01 is itself a perfectly legitimate
/// telemetry timestamp.
pub fn not_a_date() -> DateTime<Utc> {
    DateTime::<Utc>::MIN_UTC
}

/// Returns true if `t` should be interpreted as "Not-a-Date".
pub fn is_not_a_date(t: DateTime<Utc>) -> bool {
    t == not_a_date()
}

/// Subtracts `b` from `a`, in nanoseconds, unless either side is
/// Not-a-Date — in which case the result is `NOT_A_DURATION`.
///
/// This is the one place NaD propagation into durations happens; callers
/// computing `dchron` should always go through this instead of calling
/// `DateTime::signed_duration_since` directly.
pub fn safe_sub(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    if is_not_a_date(a) || is_not_a_date(b) {
        return NOT_A_DURATION;
    }
    (a - b).num_nanoseconds().unwrap_or(NOT_A_DURATION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn not_a_date_is_distinguishable_from_real_timestamps() {
        let real = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(!is_not_a_date(real));
        assert!(is_not_a_date(not_a_date()));
    }

    #[test]
    fn safe_sub_propagates_not_a_date() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(safe_sub(a, b), 60_000_000_000);
        assert_eq!(safe_sub(a, not_a_date()), NOT_A_DURATION);
        assert_eq!(safe_sub(not_a_date(), b), NOT_A_DURATION);
    }

    #[test]
    fn is_not_a_duration_detects_sentinel() {
        assert!(is_not_a_duration(NOT_A_DURATION));
        assert!(!is_not_a_duration(0));
        assert!(!is_not_a_duration(60_000_000_000));
    }
}
