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

//! One complete run: window -> prices -> scaling decision

use crate::config::Config;
use crate::cpufreq::SysfsFrequencyStore;
use crate::error::Result;
use crate::prices::{PriceSeries, fetch_price_series};
use crate::report::report_day_ahead;
use crate::scaler::{ScaleOutcome, Scaler, detect_core_count};
use crate::window::{TimeWindow, resolve_timezone};
use chrono::{DateTime, Utc};
use spotgov_ote::OteClient;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub day_ahead: bool,
    /// Overrides the detected core count
    pub core_count: Option<usize>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub window: TimeWindow,
    pub series: PriceSeries,
    pub outcome: ScaleOutcome,
}

/// Run once against the current time.
pub fn run(config: &Config, options: &RunOptions) -> Result<RunSummary> {
    run_at(config, options, Utc::now())
}

/// Run once as if the current time were `now`.
pub fn run_at(config: &Config, options: &RunOptions, now: DateTime<Utc>) -> Result<RunSummary> {
    let tz = resolve_timezone(&config.timezone)?;
    let window = TimeWindow::ending_at(&now.with_timezone(&tz), config.lookback);
    info!("Price window: {window} ({})", config.timezone);

    let client = OteClient::with_timeout(&config.service_url, config.request_timeout)?;

    if options.day_ahead {
        report_day_ahead(&client, &window);
    }

    let series = fetch_price_series(&client, &window);

    let store = SysfsFrequencyStore::new(&config.sysfs_root);
    let core_count = options.core_count.unwrap_or_else(detect_core_count);
    let outcome = Scaler::new(&store, core_count)
        .dry_run(options.dry_run)
        .scale(&series.prices())?;

    Ok(RunSummary {
        window,
        series,
        outcome,
    })
}
