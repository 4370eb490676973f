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

//! Blocking SOAP client for the OTE public data service

use crate::decode::{FromFields, decode_response};
use crate::envelope::Request;
use crate::error::{OteError, Result};
use crate::records::{DayAheadIndexRecord, PriceRecord};
use chrono::NaiveDate;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, error, info};

pub const DEFAULT_ENDPOINT: &str = "https://www.ote-cr.cz/services/PublicDataService";

/// Client for the three market data operations.
///
/// Calls are never retried. Without a timeout a hung service blocks the
/// caller indefinitely.
#[derive(Debug, Clone)]
pub struct OteClient {
    endpoint: String,
    client: Client,
}

impl OteClient {
    /// Create a client without a request deadline.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, None)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(OteError::Client)?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Hourly day-ahead prices for the inclusive date range.
    pub fn day_ahead_prices(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceRecord>> {
        let records: Vec<PriceRecord> = self.call(&Request::DamPrice {
            start_date,
            end_date,
        })?;
        log_prices(&records);
        Ok(records)
    }

    /// Daily day-ahead index for the inclusive date range.
    pub fn day_ahead_index(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DayAheadIndexRecord>> {
        let records: Vec<DayAheadIndexRecord> = self.call(&Request::DamIndex {
            start_date,
            end_date,
        })?;
        for index in &records {
            info!(
                "Date: {} BaseLoad: {} PeakLoad: {} OffPeakLoad: {} EurRate: {} Emergency: {}",
                index.date,
                index.base_load,
                index.peak_load,
                index.off_peak_load,
                index.eur_rate,
                index.emergency
            );
        }
        Ok(records)
    }

    /// Hourly intraday prices between `start_hour` and `end_hour` of the
    /// date range.
    pub fn intraday_prices(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        start_hour: u32,
        end_hour: u32,
    ) -> Result<Vec<PriceRecord>> {
        let records: Vec<PriceRecord> = self.call(&Request::ImPrice {
            start_date,
            end_date,
            start_hour,
            end_hour,
        })?;
        log_prices(&records);
        Ok(records)
    }

    fn call<T: FromFields>(&self, request: &Request) -> Result<Vec<T>> {
        let op = request.operation();
        let body = self.send(request).inspect_err(|e| {
            error!("{} failed: {e}", op.name());
        })?;
        decode_response(op, &body).inspect_err(|e| {
            error!("Error on decoding {} response: {e}", op.name());
        })
    }

    fn send(&self, request: &Request) -> Result<String> {
        let action = request.operation().soap_action();
        let payload = request.to_envelope();
        debug!("POST {} ({action})", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "text/xml")
            .header("SOAPAction", &action)
            .body(payload)
            .send()
            .map_err(|source| OteError::Transport {
                action: action.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(OteError::Status {
                action,
                status: status.as_u16(),
                body,
            });
        }

        response
            .text()
            .map_err(|source| OteError::Transport { action, source })
    }
}

fn log_prices(records: &[PriceRecord]) {
    for r in records {
        info!(
            "Date: {} Hour: {} Price: {} Volume: {}",
            r.date, r.hour, r.price, r.volume
        );
    }
}
