// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("submissions", sub)) => export_submissions(conn, sub),
        _ => Ok(()),
    }
}

fn export_submissions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT date, symbol, side, quantity, price, net_amount, broker, broker_txn_id, notes
         FROM submissions ORDER BY date, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, Option<String>>(7)?,
            r.get::<_, Option<String>>(8)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "symbol",
                "side",
                "quantity",
                "price",
                "net_amount",
                "broker",
                "broker_txn_id",
                "notes",
            ])?;
            for row in rows {
                let (d, sym, side, qty, price, net, broker, txn_id, notes) = row?;
                wtr.write_record([
                    d,
                    sym,
                    side,
                    qty,
                    price,
                    net,
                    broker,
                    txn_id.unwrap_or_default(),
                    notes.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, sym, side, qty, price, net, broker, txn_id, notes) = row?;
                items.push(json!({
                    "date": d, "symbol": sym, "side": side, "quantity": qty,
                    "price": price, "net_amount": net, "broker": broker,
                    "broker_txn_id": txn_id, "notes": notes
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported submissions to {}", out);
    Ok(())
}
