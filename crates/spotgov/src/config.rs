// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of SpotGov.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Runtime configuration
//!
//! Built once at process entry from environment variables and passed by
//! reference to every component.

use chrono::TimeDelta;
use spotgov_ote::DEFAULT_ENDPOINT;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_LOOKBACK_HOURS: i64 = -3;
/// Longest accepted lookback; each day in the window costs one request.
pub const MAX_LOOKBACK_HOURS: i64 = 7 * 24;
pub const DEFAULT_TIMEZONE: &str = "Europe/Budapest";
pub const DEFAULT_SYSFS_CPU_ROOT: &str = "/sys/devices/system/cpu";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Signed offset from now to the start of the price window (`HOURS`)
    pub lookback: TimeDelta,

    /// SOAP endpoint of the public data service (`WSDL`)
    pub service_url: String,

    /// Reference time zone the market quotes hours in (`TIMEZONE`)
    pub timezone: String,

    /// Optional per-request deadline (`REQUEST_TIMEOUT_SECS`)
    pub request_timeout: Option<Duration>,

    /// Root of the per-core cpufreq control tree (`SYSFS_CPU_ROOT`)
    pub sysfs_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lookback: TimeDelta::hours(DEFAULT_LOOKBACK_HOURS),
            service_url: DEFAULT_ENDPOINT.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            request_timeout: None,
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_CPU_ROOT),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Unset or blank variables take their default. An unusable `HOURS` value
    /// falls back to the default lookback with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let lookback = match get("HOURS") {
            None => defaults.lookback,
            Some(raw) => match parse_lookback(&raw) {
                Some(offset) if offset > TimeDelta::zero() => {
                    warn!(
                        "HOURS={raw} points into the future, using {DEFAULT_LOOKBACK_HOURS}h"
                    );
                    defaults.lookback
                }
                Some(offset) if offset >= -TimeDelta::hours(MAX_LOOKBACK_HOURS) => offset,
                Some(_) => {
                    warn!(
                        "HOURS={raw} exceeds {MAX_LOOKBACK_HOURS}h, using {DEFAULT_LOOKBACK_HOURS}h"
                    );
                    defaults.lookback
                }
                None => {
                    warn!("Error parsing HOURS={raw}, using {DEFAULT_LOOKBACK_HOURS}h");
                    defaults.lookback
                }
            },
        };

        let request_timeout = get("REQUEST_TIMEOUT_SECS").and_then(|raw| {
            match raw.parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    warn!("Ignoring invalid REQUEST_TIMEOUT_SECS={raw}");
                    None
                }
            }
        });

        Self {
            lookback,
            service_url: get("WSDL").unwrap_or(defaults.service_url),
            timezone: get("TIMEZONE").unwrap_or(defaults.timezone),
            request_timeout,
            sysfs_root: get("SYSFS_CPU_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.sysfs_root),
        }
    }
}

/// Parse a signed lookback such as `-2`, `-2h`, `-90m` or `-1h30m`.
///
/// A bare number is read as hours. Supported units are `h`, `m` and `s`.
pub fn parse_lookback(raw: &str) -> Option<TimeDelta> {
    let raw = raw.trim();
    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if body.is_empty() {
        return None;
    }

    let magnitude = if body.bytes().all(|b| b.is_ascii_digit()) {
        TimeDelta::try_hours(body.parse().ok()?)?
    } else {
        let mut total = TimeDelta::zero();
        let mut digits = String::new();
        for c in body.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            if digits.is_empty() {
                return None;
            }
            let value: i64 = digits.parse().ok()?;
            let part = match c {
                'h' => TimeDelta::try_hours(value)?,
                'm' => TimeDelta::try_minutes(value)?,
                's' => TimeDelta::try_seconds(value)?,
                _ => return None,
            };
            total = total.checked_add(&part)?;
            digits.clear();
        }
        if !digits.is_empty() {
            return None;
        }
        total
    };

    Some(if negative { -magnitude } else { magnitude })
}
