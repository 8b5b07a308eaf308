// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection};
use tempfile::NamedTempFile;
use tradeclip::{cli, commands::exporter};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
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
            created_at TEXT
        );
        "#,
    )
    .unwrap();
    conn.execute(
        "INSERT INTO submissions(date, portfolio_id, stock_id, symbol, side, quantity, price, net_amount, broker, broker_txn_id, notes)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
        params![
            "2025-01-15",
            "pf-1",
            "stk-42",
            "INFY",
            "BUY",
            "10",
            "1500.50",
            "15041.10",
            "zerodha",
            "ZX-1",
            Option::<String>::None
        ],
    )
    .unwrap();
    conn
}

fn run_export(conn: &Connection, format: &str, out: &str) {
    let matches = cli::build_cli().get_matches_from([
        "tradeclip",
        "export",
        "submissions",
        "--format",
        format,
        "--out",
        out,
    ]);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(conn, export_m).unwrap();
}

#[test]
fn exports_csv_with_header_row() {
    let conn = setup();
    let out = NamedTempFile::new().unwrap();
    run_export(&conn, "csv", out.path().to_str().unwrap());

    let text = std::fs::read_to_string(out.path()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "date,symbol,side,quantity,price,net_amount,broker,broker_txn_id,notes"
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("2025-01-15,INFY,BUY,10,1500.50,15041.10,zerodha,ZX-1"));
    assert_eq!(lines.next(), None);
}

#[test]
fn exports_json_array() {
    let conn = setup();
    let out = NamedTempFile::new().unwrap();
    run_export(&conn, "json", out.path().to_str().unwrap());

    let text = std::fs::read_to_string(out.path()).unwrap();
    let items: serde_json::Value = serde_json::from_str(&text).unwrap();
    let arr = items.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["symbol"], "INFY");
    assert_eq!(arr[0]["net_amount"], "15041.10");
    assert_eq!(arr[0]["notes"], serde_json::Value::Null);
}
