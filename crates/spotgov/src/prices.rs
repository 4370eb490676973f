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

//! Price fetch orchestration
//!
//! Turns a [`TimeWindow`] into one chronologically ordered price series,
//! issuing one intraday query per calendar day the window touches.

use crate::window::TimeWindow;
use chrono::NaiveDate;
use spotgov_ote::{OteClient, PriceRecord};
use tracing::{error, info, warn};

/// Exclusive hour used to request the remainder of a day.
pub const END_OF_DAY_HOUR: u32 = 24;

/// A single intraday request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntradayQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_hour: u32,
    pub end_hour: u32,
}

/// Anything able to answer intraday price queries.
pub trait IntradaySource {
    fn fetch_intraday(&self, query: &IntradayQuery) -> spotgov_ote::Result<Vec<PriceRecord>>;
}

impl IntradaySource for OteClient {
    fn fetch_intraday(&self, query: &IntradayQuery) -> spotgov_ote::Result<Vec<PriceRecord>> {
        self.intraday_prices(
            query.start_date,
            query.end_date,
            query.start_hour,
            query.end_hour,
        )
    }
}

/// Split a window into per-day queries, oldest first.
///
/// A same-day window is a single query. Otherwise the first day runs from
/// `start_hour` to the end of the day, any full days in between are requested
/// whole, and the last day runs from hour 0 to `end_hour`.
pub fn plan_queries(window: &TimeWindow) -> Vec<IntradayQuery> {
    if !window.spans_days() {
        return vec![IntradayQuery {
            start_date: window.start_date,
            end_date: window.end_date,
            start_hour: window.start_hour,
            end_hour: window.end_hour,
        }];
    }

    window
        .dates()
        .into_iter()
        .map(|day| IntradayQuery {
            start_date: day,
            end_date: day,
            start_hour: if day == window.start_date {
                window.start_hour
            } else {
                0
            },
            end_hour: if day == window.end_date {
                window.end_hour
            } else {
                END_OF_DAY_HOUR
            },
        })
        .collect()
}

/// Price records in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    records: Vec<PriceRecord>,
}

impl PriceSeries {
    pub fn new(records: Vec<PriceRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn prices(&self) -> Vec<f64> {
        spotgov_ote::prices(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Fetch the intraday prices covering `window`.
///
/// The last day's query is authoritative: if it fails the series is empty.
/// Failures of earlier days are logged and the series continues without them.
pub fn fetch_price_series(source: &impl IntradaySource, window: &TimeWindow) -> PriceSeries {
    let queries = plan_queries(window);
    let last = queries.len().saturating_sub(1);
    let mut records = Vec::new();

    info!("Fetching intraday prices for {window} ({} queries)", queries.len());

    for (i, query) in queries.iter().enumerate() {
        match source.fetch_intraday(query) {
            Ok(mut day) => {
                info!(
                    "Got {} prices for {} hours {}-{}",
                    day.len(),
                    query.start_date,
                    query.start_hour,
                    query.end_hour
                );
                records.append(&mut day);
            }
            Err(e) if i < last => {
                warn!(
                    "Error getting prices for {}, continuing with the following day: {e}",
                    query.start_date
                );
            }
            Err(e) => {
                error!("Error getting prices for {}, giving up: {e}", query.start_date);
                return PriceSeries::default();
            }
        }
    }

    PriceSeries::new(records)
}
