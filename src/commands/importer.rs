// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::charges::{self, TradeInput};
use crate::commands::{brokers, stocks, transactions};
use crate::models::{BrokerRef, NewTransaction, Side, StockMatch};
use crate::utils::{fmt_amount, get_default_portfolio, get_server_url};
use crate::validate;
use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use csv::ReaderBuilder;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

// CSV columns: date,symbol,side,quantity,price,broker,broker_txn_id,notes
struct ImportRow {
    date: NaiveDate,
    symbol: String,
    side: Side,
    quantity: Decimal,
    price: Decimal,
    broker: String,
    broker_txn_id: String,
    notes: String,
}

fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let dry_run = sub.get_flag("dry-run");
    let today = Local::now().date_naive();

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    // Validate every row before submitting anything.
    let mut parsed = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let rec = result?;
        let line = idx + 2; // header is line 1
        let date_raw = rec.get(0).context("date missing")?.trim();
        let symbol = rec.get(1).context("symbol missing")?.trim().to_uppercase();
        let side_raw = rec.get(2).context("side missing")?.trim();
        let qty_raw = rec.get(3).context("quantity missing")?;
        let price_raw = rec.get(4).context("price missing")?;
        let broker = rec.get(5).context("broker missing")?.trim().to_string();
        let broker_txn_id = rec.get(6).unwrap_or("").trim().to_string();
        let notes = rec.get(7).unwrap_or("").trim().to_string();

        if symbol.is_empty() {
            return Err(anyhow!("Line {}: empty symbol", line));
        }
        if broker.is_empty() {
            return Err(anyhow!("Line {}: empty broker", line));
        }
        let side = Side::parse(side_raw)
            .ok_or_else(|| anyhow!("Line {}: side must be BUY or SELL, got '{}'", line, side_raw))?;
        let date = validate::trade_date(date_raw, today)
            .with_context(|| format!("Line {}", line))?;
        let quantity =
            validate::quantity(qty_raw).with_context(|| format!("Line {} ({})", line, symbol))?;
        let price =
            validate::price(price_raw).with_context(|| format!("Line {} ({})", line, symbol))?;

        parsed.push(ImportRow {
            date,
            symbol,
            side,
            quantity,
            price,
            broker,
            broker_txn_id,
            notes,
        });
    }

    if parsed.is_empty() {
        println!("No rows in {}", path);
        return Ok(());
    }
    if dry_run {
        println!("Validated {} rows from {} (dry run)", parsed.len(), path);
        return Ok(());
    }

    let portfolio_id = match sub.get_one::<String>("portfolio") {
        Some(id) => id.trim().to_string(),
        None => get_default_portfolio(conn)?
            .ok_or_else(|| anyhow!("No --portfolio given and no default set"))?,
    };

    let api = ApiClient::new(&get_server_url(conn)?)?;
    let mut stock_cache: HashMap<String, StockMatch> = HashMap::new();
    let mut submitted = 0usize;

    for row in parsed {
        let stock = match stock_cache.get(&row.symbol) {
            Some(hit) => hit.clone(),
            None => {
                let resolved = stocks::resolve(&api, &row.symbol)?;
                stock_cache.insert(row.symbol.clone(), resolved.clone());
                resolved
            }
        };
        let fees = brokers::schedule_for(conn, &row.broker)?;
        let input = TradeInput {
            quantity: row.quantity,
            price: row.price,
            side: row.side,
        };
        let breakdown = charges::breakdown(&input, &fees).rounded();

        let txn = NewTransaction {
            portfolio_id: portfolio_id.clone(),
            stock_id: stock.id,
            transaction_type: row.side,
            quantity: row.quantity,
            price: row.price,
            date: row.date,
            broker: BrokerRef {
                name: row.broker,
                transaction_id: row.broker_txn_id,
            },
            charges: breakdown.charges.clone(),
            notes: row.notes,
        };
        api.submit_transaction(&txn)
            .with_context(|| format!("Submitting {} {}", row.symbol, row.date))?;
        transactions::record_submission(conn, &txn, &row.symbol, &breakdown)?;
        submitted += 1;
        println!(
            "{} {} x {} @ {} (net {})",
            txn.transaction_type,
            txn.quantity,
            row.symbol,
            txn.price,
            fmt_amount(&breakdown.net_amount)
        );
    }

    println!("Submitted {} transactions from {}", submitted, path);
    Ok(())
}
