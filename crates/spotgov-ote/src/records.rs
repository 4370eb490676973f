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

//! Typed records returned by the public data service

/// One hourly quotation from the day-ahead or intraday market.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    /// Delivery date as reported by the service (`YYYY-MM-DD`)
    pub date: String,
    pub hour: u32,
    /// Price in EUR/MWh
    pub price: f64,
    /// Traded volume in MWh
    pub volume: f64,
}

/// Daily aggregate index of the day-ahead market.
#[derive(Debug, Clone, PartialEq)]
pub struct DayAheadIndexRecord {
    pub date: String,
    /// EUR/CZK exchange rate used for the day
    pub eur_rate: f64,
    pub base_load: f64,
    pub peak_load: f64,
    pub off_peak_load: f64,
    /// Set when the market was cleared under emergency conditions
    pub emergency: bool,
}

/// Extract the price column of a record sequence, preserving order.
pub fn prices(records: &[PriceRecord]) -> Vec<f64> {
    records.iter().map(|r| r.price).collect()
}

/// Arithmetic mean of the record prices, `None` for an empty slice.
pub fn mean_price(records: &[PriceRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let sum: f64 = records.iter().map(|r| r.price).sum();
    Some(sum / records.len() as f64)
}
