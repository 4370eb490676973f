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

//! Error types for the OTE market data client

use thiserror::Error;

/// Why a market data call produced no records.
///
/// The variants separate transport problems from protocol problems so that
/// callers can decide whether a partial result is still usable.
#[derive(Debug, Error)]
pub enum OteError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {action} failed: {source}")]
    Transport {
        action: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{action} returned HTTP {status}: {body}")]
    Status {
        action: String,
        status: u16,
        body: String,
    },

    #[error("malformed XML response: {0}")]
    Decode(#[from] quick_xml::Error),

    #[error("response is missing the <{0}> element")]
    MissingElement(String),

    #[error("record field {field} has invalid value {value:?}")]
    InvalidField { field: String, value: String },
}

impl OteError {
    /// True for failures that happened before a response body was available.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Client(_) | Self::Transport { .. })
    }

    /// True when the service answered but the payload could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::MissingElement(_) | Self::InvalidField { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, OteError>;
