// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::models::{ChargeAmounts, FeeSchedule, Side};

/// Validated trade input. Construction goes through `validate`, so quantity
/// and price are positive by the time a value of this type exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeInput {
    pub quantity: Decimal,
    pub price: Decimal,
    pub side: Side,
}

impl TradeInput {
    /// Gross trade value before any charges.
    pub fn notional(&self) -> Decimal {
        self.quantity * self.price
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChargeBreakdown {
    pub notional: Decimal,
    pub charges: ChargeAmounts,
    pub total_charges: Decimal,
    pub net_amount: Decimal,
}

impl ChargeBreakdown {
    /// Round every amount to 2 decimal places (half-even). Computation keeps
    /// full precision; rounding happens once, at the display/wire edge.
    pub fn rounded(&self) -> ChargeBreakdown {
        ChargeBreakdown {
            notional: self.notional.round_dp(2),
            charges: ChargeAmounts {
                brokerage: self.charges.brokerage.round_dp(2),
                gst: self.charges.gst.round_dp(2),
                stt: self.charges.stt.round_dp(2),
                stamp_duty: self.charges.stamp_duty.round_dp(2),
                exchange_charges: self.charges.exchange_charges.round_dp(2),
                sebi_charges: self.charges.sebi_charges.round_dp(2),
            },
            total_charges: self.total_charges.round_dp(2),
            net_amount: self.net_amount.round_dp(2),
        }
    }
}

/// A quote for a trade. The breakdown is present only when a fee schedule
/// was available; without one the quote degrades to notional value alone.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeQuote {
    pub notional: Decimal,
    pub breakdown: Option<ChargeBreakdown>,
}

pub fn quote(input: &TradeInput, fees: Option<&FeeSchedule>) -> TradeQuote {
    TradeQuote {
        notional: input.notional(),
        breakdown: fees.map(|f| breakdown(input, f)),
    }
}

/// Itemize a trade's charges against a broker's fee schedule.
///
/// GST is levied on the brokerage fee; every other component is a fraction
/// of notional value. Net amount is notional plus total charges for a buy
/// and notional minus total charges for a sell.
pub fn breakdown(input: &TradeInput, fees: &FeeSchedule) -> ChargeBreakdown {
    let notional = input.notional();
    let brokerage = notional * fees.brokerage;
    let gst = brokerage * fees.gst;
    let stt = notional * fees.stt;
    let stamp_duty = notional * fees.stamp_duty;
    let exchange_charges = notional * fees.exchange_charges;
    let sebi_charges = notional * fees.sebi_charges;

    let total_charges = brokerage + gst + stt + stamp_duty + exchange_charges + sebi_charges;
    let net_amount = match input.side {
        Side::Buy => notional + total_charges,
        Side::Sell => notional - total_charges,
    };

    ChargeBreakdown {
        notional,
        charges: ChargeAmounts {
            brokerage,
            gst,
            stt,
            stamp_duty,
            exchange_charges,
            sebi_charges,
        },
        total_charges,
        net_amount,
    }
}
