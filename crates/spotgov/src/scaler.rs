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

//! Trend-based frequency scaling
//!
//! Every hour-over-hour step of the price series is counted as an increase or
//! a decrease (a flat step counts as a decrease). Only when increases strictly
//! outnumber decreases are the cores capped at the lowest available
//! frequency; otherwise they are released to the highest.

use crate::cpufreq::{FrequencyRange, FrequencyStore, discover_range};
use crate::error::Result;
use std::fmt;
use std::num::NonZeroUsize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increasing,
    Decreasing,
}

impl Trend {
    /// Frequency ceiling for this trend.
    pub fn target(self, range: FrequencyRange) -> u64 {
        match self {
            Self::Increasing => range.min,
            Self::Decreasing => range.max,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increasing => write!(f, "increasing"),
            Self::Decreasing => write!(f, "decreasing"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrendTally {
    pub increases: usize,
    pub decreases: usize,
}

impl TrendTally {
    pub fn from_prices(prices: &[f64]) -> Self {
        prices
            .windows(2)
            .fold(Self::default(), |mut tally, pair| {
                if pair[1] <= pair[0] {
                    tally.decreases += 1;
                } else {
                    tally.increases += 1;
                }
                tally
            })
    }

    pub fn trend(&self) -> Trend {
        if self.increases > self.decreases {
            Trend::Increasing
        } else {
            Trend::Decreasing
        }
    }
}

/// What a scaling run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleOutcome {
    /// Too few prices to form a single step
    Skipped { samples: usize },
    Applied(ScaleReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleReport {
    pub tally: TrendTally,
    pub trend: Trend,
    pub range: FrequencyRange,
    pub target: u64,
    /// Cores whose ceiling was written (or would have been, in dry-run mode)
    pub applied: Vec<usize>,
    pub failed: Vec<usize>,
    pub dry_run: bool,
}

/// Number of online cores as seen by the process, at least one.
pub fn detect_core_count() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

#[derive(Debug)]
pub struct Scaler<'a, S> {
    store: &'a S,
    core_count: usize,
    dry_run: bool,
}

impl<'a, S: FrequencyStore> Scaler<'a, S> {
    pub fn new(store: &'a S, core_count: usize) -> Self {
        Self {
            store,
            core_count,
            dry_run: false,
        }
    }

    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Cores that receive the ceiling; the last core is always left alone.
    pub fn target_cores(&self) -> std::ops::Range<usize> {
        0..self.core_count.saturating_sub(1)
    }

    /// Classify `prices` and apply the resulting ceiling.
    ///
    /// Fails only when the capability list yields no frequency. Per-core
    /// write failures are logged and reported, never propagated.
    pub fn scale(&self, prices: &[f64]) -> Result<ScaleOutcome> {
        if prices.len() < 2 {
            warn!(
                "Not enough prices to detect a trend ({}), leaving frequencies untouched",
                prices.len()
            );
            return Ok(ScaleOutcome::Skipped {
                samples: prices.len(),
            });
        }

        let tally = TrendTally::from_prices(prices);
        let trend = tally.trend();
        let range = discover_range(self.store).inspect_err(|e| {
            error!("Cannot determine available CPU frequencies: {e}");
        })?;
        let target = trend.target(range);

        info!(
            "Prices are {trend} over the last {} samples ({} up, {} down), target {} kHz",
            prices.len(),
            tally.increases,
            tally.decreases,
            target
        );

        let mut applied = Vec::new();
        let mut failed = Vec::new();
        for core in self.target_cores() {
            if self.dry_run {
                info!("Would scale cpu{core} to frequency {target}");
                applied.push(core);
                continue;
            }
            match self.store.set_max_frequency(core, target) {
                Ok(()) => {
                    info!("Scaling cpu{core} to frequency {target}");
                    applied.push(core);
                }
                Err(e) => {
                    error!("Not scaling cpu{core} to frequency {target}: {e}");
                    failed.push(core);
                }
            }
        }

        Ok(ScaleOutcome::Applied(ScaleReport {
            tally,
            trend,
            range,
            target,
            applied,
            failed,
            dry_run: self.dry_run,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpotGovError;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    /// In-memory store; cores listed in `broken` reject writes.
    struct MemoryStore {
        available: Option<String>,
        broken: Vec<usize>,
        written: RefCell<BTreeMap<usize, u64>>,
    }

    impl MemoryStore {
        fn new(available: &str) -> Self {
            Self {
                available: Some(available.to_string()),
                broken: Vec::new(),
                written: RefCell::new(BTreeMap::new()),
            }
        }
    }

    impl FrequencyStore for MemoryStore {
        fn available_frequencies(&self) -> Result<Vec<String>> {
            match &self.available {
                Some(s) => Ok(s.split_whitespace().map(str::to_string).collect()),
                None => Err(SpotGovError::Read {
                    path: self.capability_source(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
            }
        }

        fn set_max_frequency(&self, core: usize, frequency: u64) -> Result<()> {
            if self.broken.contains(&core) {
                return Err(SpotGovError::Write {
                    path: PathBuf::from(format!("cpu{core}")),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                });
            }
            self.written.borrow_mut().insert(core, frequency);
            Ok(())
        }

        fn capability_source(&self) -> PathBuf {
            PathBuf::from("memory")
        }
    }

    fn applied(outcome: ScaleOutcome) -> ScaleReport {
        match outcome {
            ScaleOutcome::Applied(report) => report,
            ScaleOutcome::Skipped { samples } => panic!("skipped with {samples} samples"),
        }
    }

    #[test]
    fn test_tally() {
        assert_eq!(
            TrendTally::from_prices(&[10.0, 9.0, 8.0]),
            TrendTally { increases: 0, decreases: 2 }
        );
        assert_eq!(
            TrendTally::from_prices(&[10.0, 11.0, 12.0]),
            TrendTally { increases: 2, decreases: 0 }
        );
        assert_eq!(
            TrendTally::from_prices(&[10.0, 10.0]),
            TrendTally { increases: 0, decreases: 1 }
        );
        assert_eq!(TrendTally::from_prices(&[]), TrendTally::default());
        assert_eq!(TrendTally::from_prices(&[3.0]), TrendTally::default());
    }

    #[test]
    fn test_trend() {
        assert_eq!(TrendTally::from_prices(&[10.0, 9.0, 8.0]).trend(), Trend::Decreasing);
        assert_eq!(TrendTally::from_prices(&[10.0, 11.0, 12.0]).trend(), Trend::Increasing);
        assert_eq!(TrendTally::from_prices(&[10.0, 10.0]).trend(), Trend::Decreasing);
        // Tie
        assert_eq!(TrendTally::from_prices(&[5.0, 4.0, 6.0]).trend(), Trend::Decreasing);
    }

    #[test]
    fn test_target() {
        let range = FrequencyRange { min: 800000, max: 1600000 };
        assert_eq!(Trend::Increasing.target(range), 800000);
        assert_eq!(Trend::Decreasing.target(range), 1600000);
    }

    #[test]
    fn test_rising_prices_cap_all_but_last_core() {
        let store = MemoryStore::new("800000 1200000 1600000");
        let report = applied(Scaler::new(&store, 4).scale(&[10.0, 11.0, 12.0]).unwrap());

        assert_eq!(report.trend, Trend::Increasing);
        assert_eq!(report.target, 800000);
        assert_eq!(report.applied, vec![0, 1, 2]);
        assert!(report.failed.is_empty());
        let written = store.written.borrow();
        assert_eq!(written.len(), 3);
        assert!(written.values().all(|f| *f == 800000));
        assert!(!written.contains_key(&3));
    }

    #[test]
    fn test_falling_prices_release_to_max() {
        let store = MemoryStore::new("800000 1200000 1600000");
        let report = applied(Scaler::new(&store, 2).scale(&[10.0, 9.0, 8.0]).unwrap());

        assert_eq!(report.target, 1600000);
        assert_eq!(*store.written.borrow(), BTreeMap::from([(0, 1600000)]));
    }

    #[test]
    fn test_single_core_writes_nothing() {
        let store = MemoryStore::new("800000 1600000");
        let report = applied(Scaler::new(&store, 1).scale(&[1.0, 2.0]).unwrap());
        assert!(report.applied.is_empty());
        assert!(store.written.borrow().is_empty());
    }

    #[test]
    fn test_write_failure_does_not_stop_other_cores() {
        let mut store = MemoryStore::new("800000 1600000");
        store.broken = vec![1];
        let report = applied(Scaler::new(&store, 4).scale(&[1.0, 2.0]).unwrap());

        assert_eq!(report.applied, vec![0, 2]);
        assert_eq!(report.failed, vec![1]);
        assert_eq!(store.written.borrow().len(), 2);
    }

    #[test]
    fn test_too_few_prices_skip_without_touching_hardware() {
        let mut store = MemoryStore::new("800000 1600000");
        store.available = None;
        let scaler = Scaler::new(&store, 4);

        assert_eq!(scaler.scale(&[]).unwrap(), ScaleOutcome::Skipped { samples: 0 });
        assert_eq!(scaler.scale(&[4.2]).unwrap(), ScaleOutcome::Skipped { samples: 1 });
        assert!(store.written.borrow().is_empty());
    }

    #[test]
    fn test_empty_capabilities_never_write_a_sentinel() {
        let store = MemoryStore::new("");
        let err = Scaler::new(&store, 4).scale(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, SpotGovError::NoFrequencies { .. }));
        assert!(store.written.borrow().is_empty());

        let mut store = MemoryStore::new("");
        store.available = None;
        assert!(Scaler::new(&store, 4).scale(&[2.0, 1.0]).is_err());
        assert!(store.written.borrow().is_empty());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let store = MemoryStore::new("800000 1600000");
        let report = applied(
            Scaler::new(&store, 3)
                .dry_run(true)
                .scale(&[1.0, 2.0, 3.0])
                .unwrap(),
        );
        assert!(report.dry_run);
        assert_eq!(report.applied, vec![0, 1]);
        assert!(store.written.borrow().is_empty());
    }

    #[test]
    fn test_detect_core_count() {
        assert!(detect_core_count() >= 1);
    }
}
