//! Helpers for credential resolution and time window handling.

use crate::credentials::Credentials;
use crate::options::TimeRange;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};

/// Window used when the caller gives neither `from` nor a range.
pub const DEFAULT_RANGE: &str = "1day";

/// Source from which the credentials were obtained (for diagnostics).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    OnePassword,
    Bitwarden,
    Keepassxc,
}

/// Get credentials from a secret backend only (1Password, Bitwarden, KeePassXC).
///
/// Plain-text credentials (env vars or CLI flags) are not supported.
/// Configure one backend via its env vars (see [secret](crate::secret) module):
/// - 1Password: `PINGDOM_OP_ENTRY_PATH` (op://Vault/Item) or `PINGDOM_OP_VAULT` + `PINGDOM_OP_ITEM`.
/// - Bitwarden: `PINGDOM_BW_ITEM_ID` (login item UUID); optional `PINGDOM_BW_SESSION`.
/// - KeePassXC: `PINGDOM_KPXC_DB`, `PINGDOM_KPXC_ENTRY`.
pub fn get_credentials() -> Result<(Credentials, CredentialSource), String> {
    if let Some(c) = crate::secret::one_password() {
        return Ok((c, CredentialSource::OnePassword));
    }
    if let Some(c) = crate::secret::bitwarden() {
        return Ok((c, CredentialSource::Bitwarden));
    }
    if let Some(c) = crate::secret::keepassxc() {
        return Ok((c, CredentialSource::Keepassxc));
    }
    Err(
        "Pingdom credentials not found. Configure a secret backend: PINGDOM_OP_ENTRY_PATH (1Password), \
         PINGDOM_BW_ITEM_ID (Bitwarden), or PINGDOM_KPXC_DB+PINGDOM_KPXC_ENTRY (KeePassXC). Plain-text credentials are not supported."
            .to_string(),
    )
}

/// Parse a point in time: UNIX seconds or ISO 8601 (a trailing `Z` is optional).
pub fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<i64>() {
        return Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| format!("Timestamp out of range: {}", s));
    }
    let s = s.trim_end_matches('Z').trim_end_matches('z');
    let parsed = DateTime::parse_from_rfc3339(&format!("{}Z", s))
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .map_err(|e| format!("Invalid time {:?}: {}", s, e))?;
    Ok(parsed.with_timezone(&Utc))
}

/// Parse range string (e.g. "30min", "6hours", "7days", "2weeks") into seconds.
pub fn parse_range(range_str: &str) -> Result<u64, String> {
    let s = range_str.trim().to_lowercase().replace(' ', "");
    let num_end = s.chars().take_while(|c| c.is_ascii_digit()).count();
    let num: u64 = s[..num_end]
        .parse()
        .map_err(|_| format!("Invalid range: {}", range_str))?;
    let unit_secs: u64 = match &s[num_end..] {
        u if u.starts_with("min") => 60,
        u if u.starts_with('h') => 3600,
        u if u.starts_with('d') => 86400,
        u if u.starts_with('w') => 7 * 86400,
        _ => return Err(format!("Unknown time unit in range: {}", range_str)),
    };
    num.checked_mul(unit_secs)
        .ok_or_else(|| format!("Range too large: {}", range_str))
}

/// Compute a window of length `range` ending at `to` (or now).
pub fn calculate_range(range: &str, to: Option<&str>) -> Result<TimeRange, String> {
    let end_time = match to {
        Some(t) => parse_time(t)?,
        None => Utc::now(),
    };
    let too_large = || format!("Range too large: {}", range);
    let secs = i64::try_from(parse_range(range)?).map_err(|_| too_large())?;
    let span = TimeDelta::try_seconds(secs).ok_or_else(too_large)?;
    let start_time = end_time.checked_sub_signed(span).ok_or_else(too_large)?;
    Ok(TimeRange::new(start_time.timestamp(), end_time.timestamp()))
}

/// Resolve CLI-style window arguments into a [`TimeRange`].
///
/// `range` wins over `from`; with neither, the last [`DEFAULT_RANGE`] is used.
/// Rejects windows where `from` is not before `to`.
pub fn resolve_window(
    from: Option<&str>,
    to: Option<&str>,
    range: Option<&str>,
) -> Result<TimeRange, String> {
    let window = match (range, from) {
        (Some(r), _) => calculate_range(r, to)?,
        (None, None) => calculate_range(DEFAULT_RANGE, to)?,
        (None, Some(f)) => {
            let to = match to {
                Some(t) => parse_time(t)?,
                None => Utc::now(),
            };
            TimeRange::new(parse_time(f)?.timestamp(), to.timestamp())
        }
    };
    if window.from >= window.to {
        return Err("from must be before to".to_string());
    }
    Ok(window)
}

/// Format a UNIX timestamp for display. If `use_utc` is true, shows UTC; otherwise converts to local timezone.
/// Out-of-range values are returned as plain numbers.
pub fn format_timestamp_display(ts: i64, use_utc: bool) -> String {
    let dt = match Utc.timestamp_opt(ts, 0).single() {
        Some(d) => d,
        None => return ts.to_string(),
    };
    if use_utc {
        dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    } else {
        dt.with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string()
    }
}
