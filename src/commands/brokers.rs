// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::models::FeeSchedule;
use crate::utils::{get_server_url, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("charges", sub)) => charges(conn, sub)?,
        Some(("list", _)) => list(conn)?,
        _ => {}
    }
    Ok(())
}

fn charges(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("NAME").unwrap().trim();
    let schedule = if sub.get_flag("refresh") {
        fetch_and_cache(conn, name)?
    } else {
        schedule_for(conn, name)?
    };

    let rows = vec![
        vec!["Brokerage".into(), schedule.brokerage.to_string()],
        vec!["GST (on brokerage)".into(), schedule.gst.to_string()],
        vec!["STT".into(), schedule.stt.to_string()],
        vec!["Stamp duty".into(), schedule.stamp_duty.to_string()],
        vec!["Exchange charges".into(), schedule.exchange_charges.to_string()],
        vec!["SEBI charges".into(), schedule.sebi_charges.to_string()],
    ];
    println!("Fee schedule for {}", name);
    println!("{}", pretty_table(&["Component", "Rate"], rows));
    Ok(())
}

/// Cache-first lookup of a broker's schedule. Schedules are immutable once
/// fetched, so a cache hit never goes to the network.
pub fn schedule_for(conn: &Connection, broker: &str) -> Result<FeeSchedule> {
    if let Some(cached) = cached_schedule(conn, broker)? {
        debug!("fee schedule for {broker} served from cache");
        return Ok(cached);
    }
    fetch_and_cache(conn, broker)
}

fn fetch_and_cache(conn: &Connection, broker: &str) -> Result<FeeSchedule> {
    let api = ApiClient::new(&get_server_url(conn)?)?;
    let schedule = api.broker_charges(broker)?;
    cache_schedule(conn, broker, &schedule)?;
    Ok(schedule)
}

pub fn cached_schedule(conn: &Connection, broker: &str) -> Result<Option<FeeSchedule>> {
    let row: Option<(String, String, String, String, String, String)> = conn
        .query_row(
            "SELECT brokerage, gst, stt, stamp_duty, exchange_charges, sebi_charges
             FROM fee_schedules WHERE broker=?1",
            params![broker],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                ))
            },
        )
        .optional()?;
    let Some((brokerage, gst, stt, stamp_duty, exchange, sebi)) = row else {
        return Ok(None);
    };
    let parse = |field: &str, s: &str| {
        parse_decimal(s).with_context(|| format!("Invalid cached {} rate for {}", field, broker))
    };
    Ok(Some(FeeSchedule {
        brokerage: parse("brokerage", &brokerage)?,
        gst: parse("gst", &gst)?,
        stt: parse("stt", &stt)?,
        stamp_duty: parse("stamp_duty", &stamp_duty)?,
        exchange_charges: parse("exchange_charges", &exchange)?,
        sebi_charges: parse("sebi_charges", &sebi)?,
    }))
}

pub fn cache_schedule(conn: &Connection, broker: &str, schedule: &FeeSchedule) -> Result<()> {
    conn.execute(
        "INSERT INTO fee_schedules(broker, brokerage, gst, stt, stamp_duty, exchange_charges, sebi_charges)
         VALUES (?1,?2,?3,?4,?5,?6,?7)
         ON CONFLICT(broker) DO UPDATE SET
             brokerage=excluded.brokerage,
             gst=excluded.gst,
             stt=excluded.stt,
             stamp_duty=excluded.stamp_duty,
             exchange_charges=excluded.exchange_charges,
             sebi_charges=excluded.sebi_charges,
             fetched_at=datetime('now')",
        params![
            broker,
            schedule.brokerage.to_string(),
            schedule.gst.to_string(),
            schedule.stt.to_string(),
            schedule.stamp_duty.to_string(),
            schedule.exchange_charges.to_string(),
            schedule.sebi_charges.to_string()
        ],
    )?;
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT broker, brokerage, gst, stt, stamp_duty, exchange_charges, sebi_charges, fetched_at
         FROM fee_schedules ORDER BY broker",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(vec![
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, String>(7)?,
        ])
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    println!(
        "{}",
        pretty_table(
            &["Broker", "Brokerage", "GST", "STT", "Stamp", "Exchange", "SEBI", "Fetched"],
            data
        )
    );
    Ok(())
}
