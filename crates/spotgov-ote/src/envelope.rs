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

//! SOAP 1.1 request envelopes for the OTE public data service
//!
//! Every operation shares the same envelope; only the body element and its
//! arguments differ. The service identifies the operation by the
//! `SOAPAction: urn:<Operation>` header as well as the body element name.

use chrono::NaiveDate;
use std::fmt::Write as _;

pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const PUBLIC_NS: &str = "http://www.ote-cr.cz/schema/service/public";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Operations exposed by the public data service that this crate speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Day-ahead market hourly prices and volumes
    DamPrice,
    /// Day-ahead market daily base/peak/off-peak index
    DamIndex,
    /// Intraday market hourly prices and volumes
    ImPrice,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Self::DamPrice => "GetDamPriceE",
            Self::DamIndex => "GetDamIndexE",
            Self::ImPrice => "GetImPriceE",
        }
    }

    /// Value of the `SOAPAction` header, `urn:<Operation>`.
    pub fn soap_action(self) -> String {
        format!("urn:{}", self.name())
    }

    /// Local name of the body element wrapping the result.
    pub fn response_element(self) -> String {
        format!("{}Response", self.name())
    }

    /// Local name of the repeated element inside `<Result>`.
    pub fn record_element(self) -> &'static str {
        match self {
            Self::DamIndex => "DamIndex",
            Self::DamPrice | Self::ImPrice => "Item",
        }
    }
}

/// A fully parameterised call to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    DamPrice {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    DamIndex {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    ImPrice {
        start_date: NaiveDate,
        end_date: NaiveDate,
        start_hour: u32,
        end_hour: u32,
    },
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Self::DamPrice { .. } => Operation::DamPrice,
            Self::DamIndex { .. } => Operation::DamIndex,
            Self::ImPrice { .. } => Operation::ImPrice,
        }
    }

    /// Serialize the request into its SOAP envelope.
    pub fn to_envelope(&self) -> String {
        let op = self.operation().name();
        let mut args = String::new();

        let (start_date, end_date) = match self {
            Self::DamPrice {
                start_date,
                end_date,
            }
            | Self::DamIndex {
                start_date,
                end_date,
            }
            | Self::ImPrice {
                start_date,
                end_date,
                ..
            } => (start_date, end_date),
        };
        push_arg(&mut args, "StartDate", start_date.format(DATE_FORMAT));
        push_arg(&mut args, "EndDate", end_date.format(DATE_FORMAT));

        if let Self::ImPrice {
            start_hour,
            end_hour,
            ..
        } = self
        {
            push_arg(&mut args, "StartHour", start_hour);
            push_arg(&mut args, "EndHour", end_hour);
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="{SOAP_ENV_NS}" xmlns:pub="{PUBLIC_NS}">
    <soapenv:Header/>
    <soapenv:Body>
        <pub:{op}>
{args}        </pub:{op}>
    </soapenv:Body>
</soapenv:Envelope>"#
        )
    }
}

fn push_arg(out: &mut String, name: &str, value: impl std::fmt::Display) {
    // Writing into a String cannot fail
    let _ = writeln!(out, "            <pub:{name}>{value}</pub:{name}>");
}
