//! Expiry evaluation.
//!
//! Every expiry decision in the crate (sync, renewal, sweep, views) goes through
//! [`is_expired`].

use chrono::{DateTime, Utc};

use crate::database::time::{datetime_to_ms, ms_to_datetime};

/// A credential is expired strictly after its expiry instant.
#[inline]
pub fn is_expired(expiry: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > expiry
}

/// Absolute expiry for a credential reported to have `lifetime_secs` left at `now`.
///
/// Millisecond precision, saturating at chrono's representable range.
pub fn expiry_from_lifetime(now: DateTime<Utc>, lifetime_secs: u64) -> DateTime<Utc> {
    let lifetime_ms = i64::try_from(lifetime_secs)
        .unwrap_or(i64::MAX)
        .saturating_mul(1000);
    ms_to_datetime(datetime_to_ms(now).saturating_add(lifetime_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_boundary_is_not_expired() {
        let t = now();
        assert!(!is_expired(t, t));
    }

    #[test]
    fn test_past_and_future() {
        let t = now();
        assert!(is_expired(t - Duration::seconds(1), t));
        assert!(is_expired(t - Duration::milliseconds(1), t));
        assert!(!is_expired(t + Duration::seconds(3600), t));
    }

    #[test]
    fn test_matches_strict_comparison() {
        let t = now();
        for offset in [-86_400i64, -1, 0, 1, 86_400] {
            let e = t + Duration::seconds(offset);
            assert_eq!(is_expired(e, t), t > e, "offset {offset}");
        }
    }

    #[test]
    fn test_expiry_from_lifetime() {
        let t = now();
        assert_eq!(expiry_from_lifetime(t, 3600), t + Duration::hours(1));
        assert_eq!(expiry_from_lifetime(t, 0), t);
    }

    #[test]
    fn test_expiry_from_lifetime_truncates_to_ms() {
        let t = now() + Duration::nanoseconds(999_999);
        assert_eq!(expiry_from_lifetime(t, 60), now() + Duration::seconds(60));
    }

    #[test]
    fn test_expiry_from_huge_lifetime_saturates() {
        assert_eq!(expiry_from_lifetime(now(), u64::MAX), DateTime::<Utc>::MAX_UTC);
    }
}
