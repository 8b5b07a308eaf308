// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;
use tradeclip::charges::{self, TradeInput};
use tradeclip::commands::{brokers, transactions};
use tradeclip::models::{BrokerRef, FeeSchedule, NewTransaction, Side};
use tradeclip::{cli, commands};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);
        CREATE TABLE fee_schedules(
            broker TEXT PRIMARY KEY,
            brokerage TEXT NOT NULL,
            gst TEXT NOT NULL,
            stt TEXT NOT NULL,
            stamp_duty TEXT NOT NULL,
            exchange_charges TEXT NOT NULL,
            sebi_charges TEXT NOT NULL,
            fetched_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE TABLE submissions(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            portfolio_id TEXT NOT NULL,
            stock_id TEXT NOT NULL,
            symbol TEXT NOT NULL,
            side TEXT NOT NULL,
            quantity TEXT NOT NULL,
            price TEXT NOT NULL,
            net_amount TEXT NOT NULL,
            broker TEXT NOT NULL,
            broker_txn_id TEXT,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )
    .unwrap();
    conn
}

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn seed_broker(conn: &Connection, name: &str) {
    brokers::cache_schedule(
        conn,
        name,
        &FeeSchedule {
            brokerage: d("0.001"),
            gst: d("0.18"),
            stt: d("0.001"),
            stamp_duty: d("0.00015"),
            exchange_charges: d("0.0000345"),
            sebi_charges: d("0.000001"),
        },
    )
    .unwrap();
}

fn tx_matches(args: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["tradeclip", "tx"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    let Some(("tx", sub)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    sub.clone()
}

#[test]
fn dry_run_quotes_without_submitting() {
    let mut conn = setup();
    seed_broker(&conn, "zerodha");
    let sub = tx_matches(&[
        "add",
        "--portfolio",
        "pf-1",
        "--stock-id",
        "stk-42",
        "--side",
        "BUY",
        "--quantity",
        "10",
        "--price",
        "100",
        "--date",
        "2025-01-15",
        "--broker",
        "zerodha",
        "--dry-run",
    ]);
    commands::transactions::handle(&mut conn, &sub).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM submissions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn add_rejects_zero_quantity() {
    let mut conn = setup();
    seed_broker(&conn, "zerodha");
    let sub = tx_matches(&[
        "add",
        "--portfolio",
        "pf-1",
        "--stock-id",
        "stk-42",
        "--side",
        "BUY",
        "--quantity",
        "0",
        "--price",
        "100",
        "--date",
        "2025-01-15",
        "--broker",
        "zerodha",
        "--dry-run",
    ]);
    let err = commands::transactions::handle(&mut conn, &sub).unwrap_err();
    assert!(err.to_string().contains("quantity must be at least 0.01"));
}

#[test]
fn add_rejects_future_date() {
    let mut conn = setup();
    seed_broker(&conn, "zerodha");
    let sub = tx_matches(&[
        "add",
        "--portfolio",
        "pf-1",
        "--stock-id",
        "stk-42",
        "--side",
        "BUY",
        "--quantity",
        "10",
        "--price",
        "100",
        "--date",
        "2999-01-01",
        "--broker",
        "zerodha",
        "--dry-run",
    ]);
    let err = commands::transactions::handle(&mut conn, &sub).unwrap_err();
    assert!(err.to_string().contains("is in the future"));
}

#[test]
fn add_rejects_unknown_side() {
    let mut conn = setup();
    seed_broker(&conn, "zerodha");
    let sub = tx_matches(&[
        "add",
        "--portfolio",
        "pf-1",
        "--stock-id",
        "stk-42",
        "--side",
        "HOLD",
        "--quantity",
        "10",
        "--price",
        "100",
        "--date",
        "2025-01-15",
        "--broker",
        "zerodha",
        "--dry-run",
    ]);
    let err = commands::transactions::handle(&mut conn, &sub).unwrap_err();
    assert!(err.to_string().contains("Side must be BUY or SELL"));
}

#[test]
fn preview_without_broker_needs_no_schedule() {
    let mut conn = setup();
    let sub = tx_matches(&["preview", "--quantity", "10", "--price", "100", "--side", "SELL"]);
    commands::transactions::handle(&mut conn, &sub).unwrap();
}

#[test]
fn history_orders_newest_first_and_honors_limit() {
    let mut conn = setup();

    let fees = FeeSchedule {
        brokerage: d("0.001"),
        gst: d("0.18"),
        stt: d("0.001"),
        stamp_duty: d("0.00015"),
        exchange_charges: d("0.0000345"),
        sebi_charges: d("0.000001"),
    };
    for (date, symbol, qty) in [
        ("2025-01-10", "INFY", "10"),
        ("2025-03-20", "TCS", "5"),
    ] {
        let input = TradeInput {
            quantity: d(qty),
            price: d("100"),
            side: Side::Buy,
        };
        let breakdown = charges::breakdown(&input, &fees).rounded();
        let txn = NewTransaction {
            portfolio_id: "pf-1".into(),
            stock_id: format!("stk-{}", symbol),
            transaction_type: Side::Buy,
            quantity: input.quantity,
            price: input.price,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            broker: BrokerRef {
                name: "zerodha".into(),
                transaction_id: String::new(),
            },
            charges: breakdown.charges.clone(),
            notes: String::new(),
        };
        transactions::record_submission(&conn, &txn, symbol, &breakdown).unwrap();
    }

    let rows = transactions::query_rows(&conn, None).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].symbol, "TCS");
    assert_eq!(rows[1].symbol, "INFY");

    let limited = transactions::query_rows(&conn, Some(1)).unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].symbol, "TCS");

    // And through the CLI path.
    let sub = tx_matches(&["history", "--limit", "1"]);
    commands::transactions::handle(&mut conn, &sub).unwrap();
}
