//! Parsing of timeout values written as .NET `TimeSpan` text.
//!
//! Appender configuration files traditionally express the request
//! timeout as `hh:mm:ss` (for example `00:00:01` for one second). The
//! accepted grammar is `d` or `[d.]hh:mm[:ss[.fffffff]]`; negative spans
//! are rejected.

use std::time::Duration;

use super::HandlerBuildError;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;
const MAX_FRACTION_DIGITS: usize = 7;

/// Parse `input` into a [`Duration`].
///
/// # Errors
///
/// Returns [`HandlerBuildError::InvalidConfig`] when the text does not
/// match the grammar, a component is out of range, or the span overflows.
pub fn parse_timespan(input: &str) -> Result<Duration, HandlerBuildError> {
    let invalid = || HandlerBuildError::InvalidConfig(format!("invalid timespan {input:?}"));
    let text = input.trim();
    let fields: Vec<&str> = text.split(':').collect();

    let (days, hours, minutes, seconds) = match fields.as_slice() {
        [days] => (component(days, u64::MAX).ok_or_else(invalid)?, 0, 0, ""),
        [head, minutes] => {
            let (days, hours) = days_and_hours(head).ok_or_else(invalid)?;
            (days, hours, component(minutes, 59).ok_or_else(invalid)?, "")
        }
        [head, minutes, seconds] => {
            let (days, hours) = days_and_hours(head).ok_or_else(invalid)?;
            (days, hours, component(minutes, 59).ok_or_else(invalid)?, *seconds)
        }
        _ => return Err(invalid()),
    };

    let (whole_seconds, nanos) = if seconds.is_empty() && fields.len() < 3 {
        (0, 0)
    } else {
        seconds_and_nanos(seconds).ok_or_else(invalid)?
    };

    let total = days
        .checked_mul(SECS_PER_DAY)
        .and_then(|s| s.checked_add(hours * SECS_PER_HOUR))
        .and_then(|s| s.checked_add(minutes * SECS_PER_MINUTE))
        .and_then(|s| s.checked_add(whole_seconds))
        .ok_or_else(invalid)?;
    Ok(Duration::new(total, nanos))
}

fn component(text: &str, max: u64) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok().filter(|value| *value <= max)
}

fn days_and_hours(text: &str) -> Option<(u64, u64)> {
    match text.split_once('.') {
        Some((days, hours)) => Some((component(days, u64::MAX)?, component(hours, 23)?)),
        None => Some((0, component(text, 23)?)),
    }
}

fn seconds_and_nanos(text: &str) -> Option<(u64, u32)> {
    let (seconds, fraction) = text.split_once('.').unwrap_or((text, ""));
    let seconds = component(seconds, 59)?;
    if fraction.is_empty() {
        return (!text.ends_with('.')).then_some((seconds, 0));
    }
    if fraction.len() > MAX_FRACTION_DIGITS {
        return None;
    }
    let digits = component(fraction, u64::MAX)?;
    let scale = 10u64.pow(u32::try_from(9 - fraction.len()).ok()?);
    let nanos = u32::try_from(digits * scale).ok()?;
    Some((seconds, nanos))
}
