// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::models::StockMatch;
use crate::search::{SearchDebouncer, MIN_QUERY_LEN};
use crate::utils::{get_server_url, maybe_print_json, pretty_table};
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use std::io::BufRead;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("search", sub)) => search(conn, sub)?,
        Some(("pick", _)) => {
            pick(conn)?;
        }
        _ => {}
    }
    Ok(())
}

fn search(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let query = sub.get_one::<String>("QUERY").unwrap().trim();
    if query.chars().count() < MIN_QUERY_LEN {
        println!("Type at least {} characters", MIN_QUERY_LEN);
        return Ok(());
    }
    let api = ApiClient::new(&get_server_url(conn)?)?;
    let stocks = api.search_stocks(query)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stocks)? {
        return Ok(());
    }
    if stocks.is_empty() {
        println!("No matches for '{}'", query);
        return Ok(());
    }
    let rows = stocks
        .into_iter()
        .map(|s| vec![s.id, s.symbol, s.name])
        .collect();
    println!("{}", pretty_table(&["Id", "Symbol", "Name"], rows));
    Ok(())
}

/// Resolve a symbol to one stock: an exact (case-insensitive) symbol match
/// wins, a single hit is accepted, anything else is an error.
pub fn resolve(api: &ApiClient, symbol: &str) -> Result<StockMatch> {
    let hits = api.search_stocks(symbol)?;
    if let Some(exact) = hits.iter().find(|s| s.symbol.eq_ignore_ascii_case(symbol)) {
        return Ok(exact.clone());
    }
    match &hits[..] {
        [] => Err(anyhow!("No stock found for '{}'", symbol)),
        [only] => Ok(only.clone()),
        _ => {
            let candidates: Vec<&str> = hits.iter().map(|s| s.symbol.as_str()).collect();
            Err(anyhow!(
                "Ambiguous symbol '{}', candidates: {}",
                symbol,
                candidates.join(", ")
            ))
        }
    }
}

/// Interactive search-as-you-type over stdin lines. Every entered line is a
/// keystroke event for the debouncer; a request fires only once the query has
/// settled, and a response is shown only while its generation is current.
/// Entering a result's number selects it; a blank line quits.
fn pick(conn: &Connection) -> Result<Option<StockMatch>> {
    let api = ApiClient::new(&get_server_url(conn)?)?;
    println!("Type to search ({}+ characters). Number selects, blank line quits.", MIN_QUERY_LEN);

    let (sender, events) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });

    let mut debouncer = SearchDebouncer::new();
    let mut results: Vec<StockMatch> = Vec::new();
    let mut input_open = true;

    loop {
        let line = if input_open {
            match debouncer.time_to_due(Instant::now()) {
                Some(wait) => match events.recv_timeout(wait) {
                    Ok(l) => Some(l),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => {
                        input_open = false;
                        None
                    }
                },
                None => match events.recv() {
                    Ok(l) => Some(l),
                    Err(_) => {
                        input_open = false;
                        None
                    }
                },
            }
        } else {
            // Input is gone; wait out any pending query, then stop.
            match debouncer.time_to_due(Instant::now()) {
                Some(wait) => {
                    thread::sleep(wait);
                    None
                }
                None => return Ok(None),
            }
        };

        if let Some(raw) = line {
            let entry = raw.trim().to_string();
            if entry.is_empty() {
                return Ok(None);
            }
            if let Ok(n) = entry.parse::<usize>() {
                if n >= 1 && n <= results.len() {
                    let selected = results[n - 1].clone();
                    println!(
                        "Selected {} - {} (id {})",
                        selected.symbol, selected.name, selected.id
                    );
                    return Ok(Some(selected));
                }
            }
            debouncer.keystroke(&entry, Instant::now());
        }

        if let Some(req) = debouncer.due(Instant::now()) {
            match api.search_stocks(&req.query) {
                Ok(found) => {
                    if !debouncer.is_current(req.generation) {
                        continue;
                    }
                    results = found;
                    if results.is_empty() {
                        println!("No matches for '{}'", req.query);
                    }
                    for (i, s) in results.iter().enumerate() {
                        println!("{:>2}. {}  {}", i + 1, s.symbol, s.name);
                    }
                }
                Err(e) => eprintln!("Search failed: {}", e),
            }
        }
    }
}
