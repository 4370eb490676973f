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

//! Command line arguments

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "spotgov",
    version,
    about = "Cap CPU frequencies while electricity prices are rising",
    long_about = "Fetches recent intraday electricity prices from the OTE public data service,\n\
    counts hour-over-hour increases and decreases, and writes the lowest available\n\
    frequency as scaling_max_freq of every core but the last when prices are rising,\n\
    or the highest available frequency otherwise.\n\
    \nEnvironment:\n  \
    HOURS                 lookback, e.g. -3 or -90m (default -3h)\n  \
    WSDL                  service endpoint\n  \
    TIMEZONE              reference time zone (default Europe/Budapest)\n  \
    REQUEST_TIMEOUT_SECS  per-request deadline (default none)\n  \
    SYSFS_CPU_ROOT        cpufreq tree root (default /sys/devices/system/cpu)"
)]
pub struct Cli {
    /// Decide and log, but do not write any control file
    #[arg(long)]
    pub dry_run: bool,

    /// Also fetch and log day-ahead prices and the day-ahead index
    #[arg(long)]
    pub day_ahead: bool,

    /// Number of cores to consider (defaults to the detected count)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub cores: Option<u16>,

    /// Root of the cpufreq control tree, overrides SYSFS_CPU_ROOT
    #[arg(long, value_name = "PATH")]
    pub sysfs_root: Option<PathBuf>,
}
