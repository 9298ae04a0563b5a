//! Time utilities for astronomical calculations

use chrono::{DateTime, Duration, Timelike, Utc};
use hifitime::Epoch;

use crate::utils::config::{MJD_JD_OFFSET, TT_TAI_SECONDS};

/// TAI-UTC assumed when hifitime has no leap second entry for the date
const FALLBACK_TAI_UTC: f64 = 37.0;

/// Julian Date in the TT time scale, as a single float.
///
/// TT-UTC comes from hifitime's leap second table.
pub fn datetime_to_jd_tt(dt: &DateTime<Utc>) -> f64 {
    let nanos = dt.timestamp() as i128 * 1_000_000_000 + dt.timestamp_subsec_nanos() as i128;
    let epoch = Epoch::from_unix_duration(hifitime::Duration::from_total_nanoseconds(nanos));
    let tai_utc = epoch.leap_seconds(true).unwrap_or(FALLBACK_TAI_UTC);
    MJD_JD_OFFSET + epoch.to_mjd_utc_days() + (TT_TAI_SECONDS + tai_utc) / 86400.0
}

/// Round a time to the nearest multiple of `round_to` seconds past midnight.
///
/// Sub-second precision is dropped before rounding and an exact half
/// rounds up, so with `round_to = 60` 12:00:29.9 becomes 12:00:00 and
/// 12:00:30 becomes 12:01:00.
pub fn round_time(dt: &DateTime<Utc>, round_to: i64) -> DateTime<Utc> {
    if round_to <= 0 {
        return *dt;
    }
    let seconds = dt.num_seconds_from_midnight() as i64;
    let rounding = (seconds + round_to / 2) / round_to * round_to;
    let truncated = *dt - Duration::nanoseconds(dt.timestamp_subsec_nanos() as i64);
    truncated + Duration::seconds(rounding - seconds)
}
