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

//! Day-ahead market report
//!
//! Informational only: the day-ahead prices and index for the window's dates
//! are fetched and logged but never influence the scaling decision.

use crate::window::TimeWindow;
use spotgov_ote::{DayAheadIndexRecord, OteClient, PriceRecord, mean_price};
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct DayAheadReport {
    pub prices: Option<Vec<PriceRecord>>,
    pub index: Option<Vec<DayAheadIndexRecord>>,
}

impl DayAheadReport {
    pub fn mean_price(&self) -> Option<f64> {
        self.prices.as_deref().and_then(mean_price)
    }
}

/// Fetch and log day-ahead prices and the day-ahead index for `window`.
pub fn report_day_ahead(client: &OteClient, window: &TimeWindow) -> DayAheadReport {
    info!(
        "Day-ahead report for {} .. {}",
        window.start_date, window.end_date
    );

    let prices = client
        .day_ahead_prices(window.start_date, window.end_date)
        .inspect_err(|e| warn!("Day-ahead prices unavailable: {e}"))
        .ok();
    let index = client
        .day_ahead_index(window.start_date, window.end_date)
        .inspect_err(|e| warn!("Day-ahead index unavailable: {e}"))
        .ok();

    let report = DayAheadReport { prices, index };
    if let Some(mean) = report.mean_price() {
        info!("Mean day-ahead price: {mean:.2} EUR/MWh");
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mockito::Server;

    #[test]
    fn test_report_survives_partial_failure() {
        let mut server = Server::new();
        let prices = server
            .mock("POST", "/")
            .match_header("soapaction", "urn:GetDamPriceE")
            .with_status(200)
            .with_body(
                r#"<Envelope><Body><GetDamPriceEResponse xmlns="http://www.ote-cr.cz/schema/service/public"><Result>
                <Item><Date>2025-03-14</Date><Hour>1</Hour><Price>80</Price><Volume>100</Volume></Item>
                <Item><Date>2025-03-14</Date><Hour>2</Hour><Price>90</Price><Volume>100</Volume></Item>
                </Result></GetDamPriceEResponse></Body></Envelope>"#,
            )
            .create();
        let index = server
            .mock("POST", "/")
            .match_header("soapaction", "urn:GetDamIndexE")
            .with_status(503)
            .create();

        let client = OteClient::new(server.url()).unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let window = TimeWindow {
            start_date: day,
            end_date: day,
            start_hour: 1,
            end_hour: 3,
        };
        let report = report_day_ahead(&client, &window);

        assert_eq!(report.prices.as_ref().map(Vec::len), Some(2));
        assert_eq!(report.mean_price(), Some(85.0));
        assert!(report.index.is_none());
        prices.assert();
        index.assert();
    }
}
