// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_server_url, set_server_url};
use anyhow::{anyhow, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-url", sub)) => {
            let url = sub.get_one::<String>("URL").unwrap().trim();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(anyhow!("URL must start with http:// or https://"));
            }
            set_server_url(conn, url.trim_end_matches('/'))?;
            println!("Server URL set to {}", url.trim_end_matches('/'));
        }
        Some(("show", _)) => {
            println!("{}", get_server_url(conn)?);
        }
        _ => {}
    }
    Ok(())
}
