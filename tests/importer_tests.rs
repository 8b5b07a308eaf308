// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use std::io::Write;
use tempfile::NamedTempFile;
use tradeclip::{cli, commands::importer};

const HEADER: &str = "date,symbol,side,quantity,price,broker,broker_txn_id,notes";

fn run_import(conn: &mut Connection, path: &str, dry_run: bool) -> anyhow::Result<()> {
    let mut args = vec!["tradeclip", "import", "transactions", "--path", path];
    if dry_run {
        args.push("--dry-run");
    }
    let matches = cli::build_cli().get_matches_from(args);
    let Some(("import", import_m)) = matches.subcommand() else {
        panic!("no import subcommand");
    };
    importer::handle(conn, import_m)
}

fn csv_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn dry_run_accepts_valid_rows() {
    let mut conn = Connection::open_in_memory().unwrap();
    let file = csv_file(&[
        "2025-01-15,INFY,BUY,10,1500.50,zerodha,ZX-1,first lot",
        "2025-02-20,tcs,sell,5,4000,upstox,,",
    ]);
    run_import(&mut conn, file.path().to_str().unwrap(), true).unwrap();
}

#[test]
fn dry_run_trims_the_path_argument() {
    let mut conn = Connection::open_in_memory().unwrap();
    let file = csv_file(&["2025-01-15,INFY,BUY,10,1500.50,zerodha,,"]);
    let padded = format!("  {}  ", file.path().to_str().unwrap());
    run_import(&mut conn, &padded, true).unwrap();
}

#[test]
fn rejects_invalid_date_with_line_number() {
    let mut conn = Connection::open_in_memory().unwrap();
    let file = csv_file(&[
        "2025-01-15,INFY,BUY,10,1500.50,zerodha,,",
        "2025-13-40,TCS,BUY,5,4000,zerodha,,",
    ]);
    let err = run_import(&mut conn, file.path().to_str().unwrap(), true).unwrap_err();
    assert!(err.to_string().contains("Line 3"));
    assert!(format!("{:#}", err).contains("invalid date '2025-13-40'"));
}

#[test]
fn rejects_non_numeric_quantity() {
    let mut conn = Connection::open_in_memory().unwrap();
    let file = csv_file(&["2025-01-15,INFY,BUY,ten,1500.50,zerodha,,"]);
    let err = run_import(&mut conn, file.path().to_str().unwrap(), true).unwrap_err();
    assert!(format!("{:#}", err).contains("'ten' is not a number"));
}

#[test]
fn rejects_unknown_side() {
    let mut conn = Connection::open_in_memory().unwrap();
    let file = csv_file(&["2025-01-15,INFY,HOLD,10,1500.50,zerodha,,"]);
    let err = run_import(&mut conn, file.path().to_str().unwrap(), true).unwrap_err();
    assert!(err.to_string().contains("side must be BUY or SELL"));
}

#[test]
fn rejects_missing_columns() {
    let mut conn = Connection::open_in_memory().unwrap();
    let file = csv_file(&["2025-01-15,INFY,BUY"]);
    let err = run_import(&mut conn, file.path().to_str().unwrap(), true).unwrap_err();
    assert!(err.to_string().contains("quantity missing"));
}

#[test]
fn validation_failure_means_nothing_submits() {
    // The bad row comes last; a per-row submit would already have sent the
    // first one. The validation pass runs over the whole file first.
    let mut conn = Connection::open_in_memory().unwrap();
    let file = csv_file(&[
        "2025-01-15,INFY,BUY,10,1500.50,zerodha,,",
        "2025-02-20,TCS,BUY,0,4000,zerodha,,",
    ]);
    let err = run_import(&mut conn, file.path().to_str().unwrap(), false).unwrap_err();
    assert!(format!("{:#}", err).contains("quantity must be at least 0.01"));
}
