//! Polling interval parsing.
//!
//! Intervals are written as duration strings such as `30s`, `1m`, `1h30m`,
//! `1.5h`, or `250ms`: one or more decimal numbers, each followed by a unit
//! (`ns`, `us`/`µs`, `ms`, `s`, `m`, `h`).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::ConfigError;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Fractional digits beyond this are ignored; they are below nanosecond
/// resolution for every supported unit.
const MAX_FRACTION_DIGITS: usize = 18;

/// A strictly positive polling interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollInterval(Duration);

impl PollInterval {
    /// Parse a duration string, rejecting zero, negative, or malformed input.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidInterval`] describing why the input was
    /// rejected.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidInterval {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (negative, nanos) = parse_duration_nanos(input.trim()).map_err(|r| invalid(&r))?;
        if negative && nanos > 0 {
            return Err(invalid("negative durations are not allowed"));
        }
        if nanos == 0 {
            return Err(invalid("interval must be greater than zero"));
        }
        let nanos = u64::try_from(nanos).map_err(|_| invalid("interval is too large"))?;

        Ok(Self(Duration::from_nanos(nanos)))
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        self.0
    }
}

impl FromStr for PollInterval {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PollInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Returns `(is_negative, total_nanoseconds)`.
fn parse_duration_nanos(s: &str) -> Result<(bool, u128), String> {
    let (negative, mut rest) = if let Some(r) = s.strip_prefix('-') {
        (true, r)
    } else if let Some(r) = s.strip_prefix('+') {
        (false, r)
    } else {
        (false, s)
    };

    if rest.is_empty() {
        return Err("empty duration".to_string());
    }
    // A bare zero is the only unit-less value accepted.
    if rest == "0" {
        return Ok((negative, 0));
    }

    let overflow = || "interval is too large".to_string();
    let mut total: u128 = 0;

    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let int_part = &rest[..int_len];
        rest = &rest[int_len..];

        let mut frac_part = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            frac_part = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(format!("expected a number at \"{rest}\""));
        }

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        if unit.is_empty() {
            return Err("missing unit (expected one of ns, us, ms, s, m, h)".to_string());
        }
        let scale = unit_nanos(unit).ok_or_else(|| format!("unknown unit \"{unit}\""))?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| overflow())?
        };
        let mut value = whole.checked_mul(scale).ok_or_else(overflow)?;

        if !frac_part.is_empty() {
            let digits = &frac_part[..frac_part.len().min(MAX_FRACTION_DIGITS)];
            let frac: u128 = digits.parse().map_err(|_| overflow())?;
            let exponent = u32::try_from(digits.len()).map_err(|_| overflow())?;
            let fractional_nanos = frac * scale / 10u128.pow(exponent);
            value = value.checked_add(fractional_nanos).ok_or_else(overflow)?;
        }

        total = total.checked_add(value).ok_or_else(overflow)?;
    }

    Ok((negative, total))
}
