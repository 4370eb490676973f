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

//! Access to the cpufreq control files
//!
//! Layout under the root (normally `/sys/devices/system/cpu`):
//! `cpu<N>/cpufreq/scaling_available_frequencies` lists the supported
//! frequencies in kHz separated by whitespace, and
//! `cpu<N>/cpufreq/scaling_max_freq` holds the governor's ceiling.

use crate::error::{Result, SpotGovError};
use std::fs;
use std::path::{Path, PathBuf};

pub const SCALING_AVAILABLE_FREQUENCIES: &str = "scaling_available_frequencies";
pub const SCALING_MAX_FREQ: &str = "scaling_max_freq";

/// Path of a cpufreq control file for one core.
pub fn cpufreq_path(root: &Path, core: usize, file: &str) -> PathBuf {
    root.join(format!("cpu{core}")).join("cpufreq").join(file)
}

/// Reads the frequency capabilities and writes per-core ceilings.
pub trait FrequencyStore {
    /// Raw entries of the capability list reported for core 0.
    fn available_frequencies(&self) -> Result<Vec<String>>;

    fn set_max_frequency(&self, core: usize, frequency: u64) -> Result<()>;

    /// Where the capability list comes from, for diagnostics.
    fn capability_source(&self) -> PathBuf;
}

#[derive(Debug, Clone)]
pub struct SysfsFrequencyStore {
    root: PathBuf,
}

impl SysfsFrequencyStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FrequencyStore for SysfsFrequencyStore {
    fn available_frequencies(&self) -> Result<Vec<String>> {
        let path = self.capability_source();
        let content = fs::read_to_string(&path).map_err(|source| SpotGovError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(content.split_whitespace().map(str::to_string).collect())
    }

    fn set_max_frequency(&self, core: usize, frequency: u64) -> Result<()> {
        let path = cpufreq_path(&self.root, core, SCALING_MAX_FREQ);
        fs::write(&path, frequency.to_string())
            .map_err(|source| SpotGovError::Write { path, source })
    }

    fn capability_source(&self) -> PathBuf {
        cpufreq_path(&self.root, 0, SCALING_AVAILABLE_FREQUENCIES)
    }
}

/// Lowest and highest frequency of the reported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyRange {
    pub min: u64,
    pub max: u64,
}

impl FrequencyRange {
    /// Range over the entries that parse as integers; `None` if none do.
    pub fn from_reported<S: AsRef<str>>(entries: &[S]) -> Option<Self> {
        let mut parsed = entries
            .iter()
            .filter_map(|e| e.as_ref().trim().parse::<u64>().ok());
        let first = parsed.next()?;
        Some(parsed.fold(Self { min: first, max: first }, |range, f| Self {
            min: range.min.min(f),
            max: range.max.max(f),
        }))
    }
}

/// Read the capability list and reduce it to a range.
///
/// An unreadable or empty list is an error: there is no safe frequency to
/// fall back to.
pub fn discover_range(store: &impl FrequencyStore) -> Result<FrequencyRange> {
    let entries = store.available_frequencies()?;
    FrequencyRange::from_reported(&entries).ok_or_else(|| SpotGovError::NoFrequencies {
        path: store.capability_source(),
    })
}
