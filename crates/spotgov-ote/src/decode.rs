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

//! Response decoding
//!
//! Responses look like
//!
//! ```xml
//! <soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
//!   <soap:Body>
//!     <GetImPriceEResponse xmlns="http://www.ote-cr.cz/schema/service/public">
//!       <Result>
//!         <Item><Date>2025-03-14</Date><Hour>13</Hour><Price>91.5</Price><Volume>12.3</Volume></Item>
//!       </Result>
//!     </GetImPriceEResponse>
//!   </soap:Body>
//! </soap:Envelope>
//! ```
//!
//! The response element is matched by namespace and local name, everything
//! below it by local name only. Each record is collected as a flat
//! name -> text map and then coerced into its typed form. A single field that
//! fails to coerce fails the whole response.

use crate::envelope::{Operation, PUBLIC_NS};
use crate::error::{OteError, Result};
use crate::records::{DayAheadIndexRecord, PriceRecord};
use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use std::collections::HashMap;
use std::str::FromStr;

/// Child element texts of one record, keyed by local name.
#[derive(Debug, Default)]
pub struct Fields(HashMap<String, String>);

impl Fields {
    fn text(&self, name: &str) -> Result<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| OteError::MissingElement(name.to_string()))
    }

    fn parse<T: FromStr>(&self, name: &str) -> Result<T> {
        let raw = self.text(name)?;
        raw.trim().parse().map_err(|_| OteError::InvalidField {
            field: name.to_string(),
            value: raw.to_string(),
        })
    }

    fn parse_or<T: FromStr>(&self, name: &str, default: T) -> Result<T> {
        match self.0.get(name) {
            Some(raw) if !raw.trim().is_empty() => self.parse(name),
            _ => Ok(default),
        }
    }

    fn flag(&self, name: &str) -> Result<bool> {
        let Some(raw) = self.0.get(name) else {
            return Ok(false);
        };
        match raw.trim() {
            "" | "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(OteError::InvalidField {
                field: name.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// A record type that can be built from the fields of one result element.
pub trait FromFields: Sized {
    fn from_fields(fields: &Fields) -> Result<Self>;
}

impl FromFields for PriceRecord {
    fn from_fields(fields: &Fields) -> Result<Self> {
        Ok(Self {
            date: fields.text("Date")?.trim().to_string(),
            hour: fields.parse("Hour")?,
            price: fields.parse("Price")?,
            // Hours without trades are reported without a volume
            volume: fields.parse_or("Volume", 0.0)?,
        })
    }
}

impl FromFields for DayAheadIndexRecord {
    fn from_fields(fields: &Fields) -> Result<Self> {
        Ok(Self {
            date: fields.text("Date")?.trim().to_string(),
            eur_rate: fields.parse("EurRate")?,
            base_load: fields.parse("BaseLoad")?,
            peak_load: fields.parse("PeakLoad")?,
            off_peak_load: fields.parse("OffpeakLoad")?,
            emergency: fields.flag("Emerg")?,
        })
    }
}

/// Where the reader currently is relative to the response element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Outside,
    Response,
    Result,
    Record,
    Field,
}

/// Decode the records of `op` from a SOAP response body.
pub fn decode_response<T: FromFields>(op: Operation, body: &str) -> Result<Vec<T>> {
    let response_name = op.response_element();
    let record_name = op.record_element();

    let mut reader = NsReader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut level = Level::Outside;
    // Elements nested below the current level that we do not care about
    let mut skipped = 0usize;
    let mut seen_response = false;
    let mut records = Vec::new();
    let mut current = Fields::default();
    let mut field = String::new();

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(e) => {
                if skipped > 0 {
                    skipped += 1;
                    continue;
                }
                let local = e.local_name();
                let local = local.as_ref();
                level = match level {
                    Level::Outside
                        if local == response_name.as_bytes() && is_public(&ns) =>
                    {
                        seen_response = true;
                        Level::Response
                    }
                    Level::Response if local == b"Result" => Level::Result,
                    Level::Result if local == record_name.as_bytes() => {
                        current = Fields::default();
                        Level::Record
                    }
                    Level::Record => {
                        field = String::from_utf8_lossy(local).into_owned();
                        current.0.entry(field.clone()).or_default();
                        Level::Field
                    }
                    Level::Outside => level,
                    Level::Response | Level::Result | Level::Field => {
                        skipped = 1;
                        level
                    }
                };
            }
            Event::Empty(e) => {
                if skipped > 0 {
                    continue;
                }
                let local = e.local_name();
                let local = local.as_ref();
                match level {
                    Level::Outside
                        if local == response_name.as_bytes() && is_public(&ns) =>
                    {
                        seen_response = true;
                    }
                    Level::Result if local == record_name.as_bytes() => {
                        records.push(T::from_fields(&Fields::default())?);
                    }
                    Level::Record => {
                        let name = String::from_utf8_lossy(local).into_owned();
                        current.0.entry(name).or_default();
                    }
                    Level::Outside | Level::Response | Level::Result | Level::Field => {}
                }
            }
            Event::Text(t) if level == Level::Field && skipped == 0 => {
                let text = t.unescape()?;
                if let Some(value) = current.0.get_mut(&field) {
                    value.push_str(&text);
                }
            }
            Event::CData(c) if level == Level::Field && skipped == 0 => {
                if let Some(value) = current.0.get_mut(&field) {
                    value.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                if skipped > 0 {
                    skipped -= 1;
                    continue;
                }
                level = match level {
                    Level::Field => Level::Record,
                    Level::Record => {
                        records.push(T::from_fields(&current)?);
                        Level::Result
                    }
                    Level::Result => Level::Response,
                    Level::Response | Level::Outside => Level::Outside,
                };
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_response {
        return Err(OteError::MissingElement(response_name));
    }
    Ok(records)
}

fn is_public(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == PUBLIC_NS.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IM_PRICE_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">
  <SOAP-ENV:Body>
    <GetImPriceEResponse xmlns="http://www.ote-cr.cz/schema/service/public">
      <Result>
        <Item>
          <Date>2025-03-14</Date>
          <Hour>13</Hour>
          <Price>91.25</Price>
          <Volume>12.5</Volume>
        </Item>
        <Item>
          <Date>2025-03-14</Date>
          <Hour>14</Hour>
          <Price>-3.5</Price>
          <Volume>7</Volume>
        </Item>
      </Result>
    </GetImPriceEResponse>
  </SOAP-ENV:Body>
</SOAP-ENV:Envelope>"#;

    const DAM_INDEX_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <ote:GetDamIndexEResponse xmlns:ote="http://www.ote-cr.cz/schema/service/public">
      <ote:Result>
        <ote:DamIndex>
          <ote:Date>2025-03-14</ote:Date>
          <ote:EurRate>25.07</ote:EurRate>
          <ote:BaseLoad>110.4</ote:BaseLoad>
          <ote:PeakLoad>131.9</ote:PeakLoad>
          <ote:OffpeakLoad>88.2</ote:OffpeakLoad>
          <ote:Emerg>0</ote:Emerg>
        </ote:DamIndex>
      </ote:Result>
    </ote:GetDamIndexEResponse>
  </soap:Body>
</soap:Envelope>"#;

    #[test]
    fn test_decode_intraday_prices() {
        let records: Vec<PriceRecord> =
            decode_response(Operation::ImPrice, IM_PRICE_RESPONSE).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            PriceRecord {
                date: "2025-03-14".to_string(),
                hour: 13,
                price: 91.25,
                volume: 12.5,
            }
        );
        assert_eq!(records[1].hour, 14);
        assert_eq!(records[1].price, -3.5);
        assert_eq!(records[1].volume, 7.0);
    }

    #[test]
    fn test_decode_prefixed_index() {
        let records: Vec<DayAheadIndexRecord> =
            decode_response(Operation::DamIndex, DAM_INDEX_RESPONSE).unwrap();

        assert_eq!(records.len(), 1);
        let index = &records[0];
        assert_eq!(index.date, "2025-03-14");
        assert_eq!(index.eur_rate, 25.07);
        assert_eq!(index.base_load, 110.4);
        assert_eq!(index.peak_load, 131.9);
        assert_eq!(index.off_peak_load, 88.2);
        assert!(!index.emergency);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let body = r#"<Envelope><Body>
            <GetImPriceEResponse xmlns="http://www.ote-cr.cz/schema/service/public"><Result/></GetImPriceEResponse>
        </Body></Envelope>"#;
        let records: Vec<PriceRecord> = decode_response(Operation::ImPrice, body).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_wrong_namespace_is_missing_response() {
        let body = r#"<Envelope><Body>
            <GetImPriceEResponse xmlns="urn:somewhere-else"><Result>
              <Item><Date>2025-03-14</Date><Hour>1</Hour><Price>1</Price></Item>
            </Result></GetImPriceEResponse>
        </Body></Envelope>"#;
        let err = decode_response::<PriceRecord>(Operation::ImPrice, body).unwrap_err();
        assert!(matches!(err, OteError::MissingElement(ref name) if name == "GetImPriceEResponse"));
    }

    #[test]
    fn test_other_operation_response_is_rejected() {
        let err = decode_response::<PriceRecord>(Operation::DamPrice, IM_PRICE_RESPONSE).unwrap_err();
        assert!(matches!(err, OteError::MissingElement(_)));
    }

    #[test]
    fn test_one_bad_field_fails_whole_response() {
        let body = IM_PRICE_RESPONSE.replace("<Hour>14</Hour>", "<Hour>fourteen</Hour>");
        let err = decode_response::<PriceRecord>(Operation::ImPrice, &body).unwrap_err();
        match err {
            OteError::InvalidField { field, value } => {
                assert_eq!(field, "Hour");
                assert_eq!(value, "fourteen");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_price_fails() {
        let body = IM_PRICE_RESPONSE.replace("<Price>91.25</Price>", "");
        let err = decode_response::<PriceRecord>(Operation::ImPrice, &body).unwrap_err();
        assert!(matches!(err, OteError::MissingElement(ref name) if name == "Price"));
    }

    #[test]
    fn test_missing_volume_defaults_to_zero() {
        let body = IM_PRICE_RESPONSE.replace("<Volume>12.5</Volume>", "<Volume/>");
        let records: Vec<PriceRecord> = decode_response(Operation::ImPrice, &body).unwrap();
        assert_eq!(records[0].volume, 0.0);
    }

    #[test]
    fn test_malformed_xml() {
        let body = "<Envelope><Body><GetImPriceEResponse></Body></Envelope>";
        let err = decode_response::<PriceRecord>(Operation::ImPrice, body).unwrap_err();
        assert!(matches!(err, OteError::Decode(_)));
    }

    #[test]
    fn test_unknown_elements_are_ignored() {
        let body = IM_PRICE_RESPONSE.replace(
            "<Result>",
            "<Meta><Result><Item><Hour>x</Hour></Item></Result></Meta><Result>",
        );
        let records: Vec<PriceRecord> = decode_response(Operation::ImPrice, &body).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_emergency_flag() {
        let body = DAM_INDEX_RESPONSE.replace("<ote:Emerg>0</ote:Emerg>", "<ote:Emerg>1</ote:Emerg>");
        let records: Vec<DayAheadIndexRecord> =
            decode_response(Operation::DamIndex, &body).unwrap();
        assert!(records[0].emergency);

        let body = DAM_INDEX_RESPONSE.replace("<ote:Emerg>0</ote:Emerg>", "<ote:Emerg>maybe</ote:Emerg>");
        assert!(decode_response::<DayAheadIndexRecord>(Operation::DamIndex, &body).is_err());
    }
}
