// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::utils::{get_server_url, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Server reachability
    let url = get_server_url(conn)?;
    match ApiClient::new(&url).and_then(|api| Ok(api.list_portfolios()?)) {
        Ok(portfolios) => println!("Server {} reachable ({} portfolios)", url, portfolios.len()),
        Err(e) => rows.push(vec!["server_unreachable".into(), format!("{}: {}", url, e)]),
    }

    // 2) Cached fee schedules must parse and be non-negative
    let mut stmt = conn.prepare(
        "SELECT broker, brokerage, gst, stt, stamp_duty, exchange_charges, sebi_charges
         FROM fee_schedules ORDER BY broker",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let broker: String = r.get(0)?;
        for (idx, field) in [
            (1usize, "brokerage"),
            (2, "gst"),
            (3, "stt"),
            (4, "stamp_duty"),
            (5, "exchange_charges"),
            (6, "sebi_charges"),
        ] {
            let raw: String = r.get(idx)?;
            match parse_decimal(&raw) {
                Ok(rate) if rate >= Decimal::ZERO => {}
                _ => rows.push(vec![
                    "bad_fee_schedule".into(),
                    format!("{} {}='{}'", broker, field, raw),
                ]),
            }
        }
    }

    // 3) Journaled amounts must still parse
    let mut stmt2 =
        conn.prepare("SELECT id, quantity, price, net_amount FROM submissions ORDER BY id")?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        for (idx, field) in [(1usize, "quantity"), (2, "price"), (3, "net_amount")] {
            let raw: String = r.get(idx)?;
            if parse_decimal(&raw).is_err() {
                rows.push(vec![
                    "bad_submission".into(),
                    format!("id {} {}='{}'", id, field, raw),
                ]);
            }
        }
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
