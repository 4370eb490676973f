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

//! Client for the OTE (Czech electricity market operator) public SOAP service
//!
//! Builds the request envelopes for the day-ahead price, day-ahead index and
//! intraday price operations, posts them over HTTP and decodes the namespaced
//! XML responses into typed records.

pub mod client;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod records;

pub use client::{DEFAULT_ENDPOINT, OteClient};
pub use envelope::{Operation, Request};
pub use error::{OteError, Result};
pub use records::{DayAheadIndexRecord, PriceRecord, mean_price, prices};
