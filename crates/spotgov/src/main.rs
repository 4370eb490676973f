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

//! SpotGov - entry point
//!
//! Single linear batch run, meant to be triggered periodically (cron, systemd
//! timer). Exits non-zero only when the configuration is unusable or the
//! available frequencies cannot be determined.

use anyhow::Context;
use clap::Parser;
use spotgov::cli::Cli;
use spotgov::{Config, RunOptions, ScaleOutcome};
use tracing::info;
use tracing_subscriber::fmt::writer::MakeWriterExt;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Warnings and errors to stderr, everything else to stdout
    let writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .or_else(std::io::stdout);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(writer)
        .init();

    let mut config = Config::from_env();
    if let Some(root) = cli.sysfs_root {
        config.sysfs_root = root;
    }
    info!(
        "Starting SpotGov: lookback={}m, service={}, timezone={}",
        config.lookback.num_minutes(),
        config.service_url,
        config.timezone
    );

    let options = RunOptions {
        dry_run: cli.dry_run,
        day_ahead: cli.day_ahead,
        core_count: cli.cores.map(usize::from),
    };

    let summary = spotgov::run(&config, &options).context("SpotGov run failed")?;
    match summary.outcome {
        ScaleOutcome::Skipped { samples } => {
            info!("No scaling decision ({samples} prices in {})", summary.window);
        }
        ScaleOutcome::Applied(report) => {
            info!(
                "Done: {} trend, {} kHz applied to {} cores, {} failed{}",
                report.trend,
                report.target,
                report.applied.len(),
                report.failed.len(),
                if report.dry_run { " (dry run)" } else { "" }
            );
        }
    }

    Ok(())
}
