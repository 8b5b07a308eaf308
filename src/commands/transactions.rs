// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{ApiClient, ApiError};
use crate::charges::{self, ChargeBreakdown, TradeInput};
use crate::commands::{brokers, stocks};
use crate::models::{BrokerRef, NewTransaction, Side};
use crate::utils::{
    fmt_amount, get_default_portfolio, get_server_url, maybe_print_json, pretty_table,
};
use crate::validate;
use anyhow::{anyhow, Result};
use chrono::Local;
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("preview", sub)) => preview(conn, sub)?,
        Some(("add", sub)) => add(conn, sub)?,
        Some(("history", sub)) => history(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_side(raw: &str) -> Result<Side> {
    Side::parse(raw).ok_or_else(|| anyhow!("Side must be BUY or SELL, got '{}'", raw.trim()))
}

fn preview(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let input = TradeInput {
        quantity: validate::quantity(sub.get_one::<String>("quantity").unwrap())?,
        price: validate::price(sub.get_one::<String>("price").unwrap())?,
        side: parse_side(sub.get_one::<String>("side").unwrap())?,
    };

    let fees = match sub.get_one::<String>("broker") {
        Some(broker) => Some(brokers::schedule_for(conn, broker.trim())?),
        None => None,
    };
    let quote = charges::quote(&input, fees.as_ref());
    match quote.breakdown {
        Some(bd) => print_breakdown(&bd.rounded()),
        None => {
            // No broker, no schedule: the quote degrades to notional value.
            println!(
                "{}",
                pretty_table(
                    &["Component", "Amount"],
                    vec![vec!["Notional value".into(), fmt_amount(&quote.notional)]],
                )
            );
            println!("No broker given; pass --broker to itemize charges");
        }
    }
    Ok(())
}

fn print_breakdown(bd: &ChargeBreakdown) {
    let rows = vec![
        vec!["Notional value".into(), fmt_amount(&bd.notional)],
        vec!["Brokerage".into(), fmt_amount(&bd.charges.brokerage)],
        vec!["GST".into(), fmt_amount(&bd.charges.gst)],
        vec!["STT".into(), fmt_amount(&bd.charges.stt)],
        vec!["Stamp duty".into(), fmt_amount(&bd.charges.stamp_duty)],
        vec!["Exchange charges".into(), fmt_amount(&bd.charges.exchange_charges)],
        vec!["SEBI charges".into(), fmt_amount(&bd.charges.sebi_charges)],
        vec!["Total charges".into(), fmt_amount(&bd.total_charges)],
        vec!["Net amount".into(), fmt_amount(&bd.net_amount)],
    ];
    println!("{}", pretty_table(&["Component", "Amount"], rows));
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = Local::now().date_naive();

    let portfolio_id = match sub.get_one::<String>("portfolio") {
        Some(id) => id.trim().to_string(),
        None => get_default_portfolio(conn)?
            .ok_or_else(|| anyhow!("No --portfolio given and no default set"))?,
    };
    let side = parse_side(sub.get_one::<String>("side").unwrap())?;
    let quantity = validate::quantity(sub.get_one::<String>("quantity").unwrap())?;
    let price = validate::price(sub.get_one::<String>("price").unwrap())?;
    let date = validate::trade_date(sub.get_one::<String>("date").unwrap(), today)?;
    let broker = sub.get_one::<String>("broker").unwrap().trim().to_string();
    let broker_txn_id = sub
        .get_one::<String>("broker-txn-id")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let notes = sub
        .get_one::<String>("notes")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let fees = brokers::schedule_for(conn, &broker)?;
    let input = TradeInput { quantity, price, side };
    let breakdown = charges::breakdown(&input, &fees).rounded();
    print_breakdown(&breakdown);

    if sub.get_flag("dry-run") {
        println!("Dry run: nothing submitted");
        return Ok(());
    }

    let api = ApiClient::new(&get_server_url(conn)?)?;
    let (stock_id, symbol) = match sub.get_one::<String>("stock-id") {
        Some(id) => (
            id.trim().to_string(),
            sub.get_one::<String>("symbol")
                .map(|s| s.trim().to_uppercase())
                .unwrap_or_default(),
        ),
        None => {
            let symbol = sub
                .get_one::<String>("symbol")
                .ok_or_else(|| anyhow!("Pass --symbol or --stock-id"))?;
            let stock = stocks::resolve(&api, symbol.trim())?;
            (stock.id, stock.symbol)
        }
    };

    let txn = NewTransaction {
        portfolio_id,
        stock_id,
        transaction_type: side,
        quantity,
        price,
        date,
        broker: BrokerRef {
            name: broker,
            transaction_id: broker_txn_id,
        },
        charges: breakdown.charges.clone(),
        notes,
    };

    match api.submit_transaction(&txn) {
        Ok(()) => {
            record_submission(conn, &txn, &symbol, &breakdown)?;
            println!(
                "Transaction saved: {} {} x {} @ {} (net {})",
                side,
                quantity,
                if symbol.is_empty() { &txn.stock_id } else { &symbol },
                price,
                fmt_amount(&breakdown.net_amount)
            );
            Ok(())
        }
        Err(ApiError::Rejected { status, message }) => Err(anyhow!(
            "Server rejected transaction ({}): {}",
            status,
            message
        )),
        Err(e) => Err(e.into()),
    }
}

pub fn record_submission(
    conn: &Connection,
    txn: &NewTransaction,
    symbol: &str,
    breakdown: &ChargeBreakdown,
) -> Result<()> {
    conn.execute(
        "INSERT INTO submissions(date, portfolio_id, stock_id, symbol, side, quantity, price, net_amount, broker, broker_txn_id, notes)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
        params![
            txn.date.to_string(),
            txn.portfolio_id,
            txn.stock_id,
            symbol,
            txn.transaction_type.as_str(),
            txn.quantity.to_string(),
            txn.price.to_string(),
            breakdown.net_amount.to_string(),
            txn.broker.name,
            if txn.broker.transaction_id.is_empty() {
                None
            } else {
                Some(txn.broker.transaction_id.as_str())
            },
            if txn.notes.is_empty() { None } else { Some(txn.notes.as_str()) }
        ],
    )?;
    Ok(())
}

#[derive(Serialize)]
pub struct SubmissionRow {
    pub date: String,
    pub symbol: String,
    pub side: String,
    pub quantity: String,
    pub price: String,
    pub net_amount: String,
    pub broker: String,
    pub notes: String,
}

pub fn query_rows(conn: &Connection, limit: Option<usize>) -> Result<Vec<SubmissionRow>> {
    let mut sql = String::from(
        "SELECT date, symbol, side, quantity, price, net_amount, broker, notes
         FROM submissions ORDER BY date DESC, id DESC",
    );
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let notes: Option<String> = r.get(7)?;
        data.push(SubmissionRow {
            date: r.get(0)?,
            symbol: r.get(1)?,
            side: r.get(2)?,
            quantity: r.get(3)?,
            price: r.get(4)?,
            net_amount: r.get(5)?,
            broker: r.get(6)?,
            notes: notes.unwrap_or_default(),
        });
    }
    Ok(data)
}

fn history(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub.get_one::<usize>("limit").copied())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|r| {
            vec![
                r.date.clone(),
                r.symbol.clone(),
                r.side.clone(),
                r.quantity.clone(),
                r.price.clone(),
                r.net_amount.clone(),
                r.broker.clone(),
                r.notes.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Symbol", "Side", "Qty", "Price", "Net", "Broker", "Notes"],
            rows
        )
    );
    Ok(())
}
