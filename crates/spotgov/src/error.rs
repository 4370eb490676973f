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

//! Error types for the spotgov crate

use spotgov_ote::OteError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpotGovError {
    #[error("unknown time zone: {0}")]
    UnknownTimezone(String),

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no usable frequencies reported by {path:?}")]
    NoFrequencies { path: PathBuf },

    #[error("market data error: {0}")]
    MarketData(#[from] OteError),
}

pub type Result<T> = std::result::Result<T, SpotGovError>;
