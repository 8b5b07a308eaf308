// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction side. Serialized as the backend expects it ("BUY"/"SELL").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Some(Side::Buy),
            "SELL" => Some(Side::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A broker's fee rates, each a fraction (0.001 = 0.1%). All rates apply to
/// the trade's notional value except GST, which applies to the brokerage
/// amount. A schedule does not change once fetched for a given broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    #[serde(rename = "brokerage_percentage")]
    pub brokerage: Decimal,
    #[serde(rename = "gst_percentage")]
    pub gst: Decimal,
    #[serde(rename = "stt_percentage")]
    pub stt: Decimal,
    #[serde(rename = "stamp_duty_percentage")]
    pub stamp_duty: Decimal,
    #[serde(rename = "exchange_charges_percentage")]
    pub exchange_charges: Decimal,
    #[serde(rename = "sebi_charges_percentage")]
    pub sebi_charges: Decimal,
}

/// One hit from the stock-master search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMatch {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub stock_id: String,
    pub stock_name: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub purchase_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub base_currency: String,
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPortfolio {
    pub name: String,
    pub base_currency: String,
    pub holdings: Vec<Holding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerRef {
    pub name: String,
    pub transaction_id: String,
}

/// The six itemized charge amounts, in the trade's currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeAmounts {
    pub brokerage: Decimal,
    pub gst: Decimal,
    pub stt: Decimal,
    pub stamp_duty: Decimal,
    pub exchange_charges: Decimal,
    pub sebi_charges: Decimal,
}

/// Submission payload for one trade (POST /transactions/new).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub portfolio_id: String,
    pub stock_id: String,
    pub transaction_type: Side,
    pub quantity: Decimal,
    pub price: Decimal,
    pub date: NaiveDate,
    pub broker: BrokerRef,
    pub charges: ChargeAmounts,
    pub notes: String,
}
