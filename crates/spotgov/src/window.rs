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

//! Time window resolution
//!
//! The window is the half-open interval `[now + offset, now)` expressed in the
//! market's reference time zone as calendar dates and hours of day.

use crate::error::{Result, SpotGovError};
use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Timelike};
use chrono_tz::Tz;
use std::fmt;
use tracing::warn;

/// Resolve an IANA zone name. Failure here is fatal for the run.
pub fn resolve_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| SpotGovError::UnknownTimezone(name.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl TimeWindow {
    /// Window ending at `now` and starting `offset` away from it, in the zone
    /// `now` carries. An offset that leaves chrono's range collapses the
    /// window onto `now`.
    pub fn ending_at<Z: TimeZone>(now: &DateTime<Z>, offset: TimeDelta) -> Self {
        let before = now.clone().checked_add_signed(offset).unwrap_or_else(|| {
            warn!("Lookback {offset} is out of range, using an empty window");
            now.clone()
        });
        Self {
            start_date: before.date_naive(),
            end_date: now.date_naive(),
            start_hour: before.hour(),
            end_hour: now.hour(),
        }
    }

    /// True when the window crosses at least one midnight.
    pub fn spans_days(&self) -> bool {
        self.start_date != self.end_date
    }

    /// Calendar dates covered by the window, oldest first.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.start_date
            .iter_days()
            .take_while(|d| *d <= self.end_date)
            .collect()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:00 .. {} {:02}:00",
            self.start_date, self.start_hour, self.end_date, self.end_hour
        )
    }
}
