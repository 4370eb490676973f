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

//! SpotGov - electricity price driven CPU frequency governor
//!
//! Looks back over the most recent intraday market hours, decides whether
//! prices are rising, and caps the CPU frequency ceiling accordingly.

pub mod cli;
pub mod config;
pub mod cpufreq;
pub mod error;
pub mod prices;
pub mod report;
pub mod runner;
pub mod scaler;
pub mod window;

pub use config::Config;
pub use cpufreq::{FrequencyRange, FrequencyStore, SysfsFrequencyStore};
pub use error::{Result, SpotGovError};
pub use prices::{IntradayQuery, IntradaySource, PriceSeries, fetch_price_series, plan_queries};
pub use runner::{RunOptions, RunSummary, run, run_at};
pub use scaler::{ScaleOutcome, ScaleReport, Scaler, Trend, TrendTally};
pub use window::{TimeWindow, resolve_timezone};
