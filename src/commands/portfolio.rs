// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::commands::stocks;
use crate::models::{Holding, NewPortfolio, Portfolio};
use crate::utils::{
    fmt_amount, get_server_url, maybe_print_json, pretty_table, set_default_portfolio,
};
use crate::validate;
use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => create(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set-default", sub)) => {
            let id = sub.get_one::<String>("ID").unwrap().trim();
            set_default_portfolio(conn, id)?;
            println!("Default portfolio set to {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// A `--holding SYMBOL:QTY:PRICE:DATE` argument, parsed and validated but
/// with the symbol not yet resolved against the stock master.
#[derive(Debug, Clone, PartialEq)]
struct HoldingSpec {
    symbol: String,
    quantity: Decimal,
    purchase_price: Decimal,
    purchase_date: NaiveDate,
}

fn parse_holding_spec(spec: &str, today: NaiveDate) -> Result<HoldingSpec> {
    let parts: Vec<&str> = spec.splitn(4, ':').collect();
    if parts.len() != 4 {
        return Err(anyhow!(
            "Invalid holding '{}', expected SYMBOL:QTY:PRICE:DATE",
            spec
        ));
    }
    let symbol = parts[0].trim().to_uppercase();
    if symbol.is_empty() {
        return Err(anyhow!("Invalid holding '{}': empty symbol", spec));
    }
    let quantity = validate::quantity(parts[1])?;
    let purchase_price = validate::price(parts[2])?;
    let purchase_date = validate::trade_date(parts[3], today)?;
    Ok(HoldingSpec {
        symbol,
        quantity,
        purchase_price,
        purchase_date,
    })
}

fn create(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = validate::portfolio_name(sub.get_one::<String>("name").unwrap())?;
    let currency = sub.get_one::<String>("currency").unwrap().trim().to_uppercase();
    let today = Local::now().date_naive();

    let specs: Vec<HoldingSpec> = match sub.get_many::<String>("holding") {
        Some(values) => values
            .map(|s| parse_holding_spec(s, today))
            .collect::<Result<_>>()?,
        None => Vec::new(),
    };

    let api = ApiClient::new(&get_server_url(conn)?)?;
    let mut holdings = Vec::with_capacity(specs.len());
    for spec in specs {
        let stock = stocks::resolve(&api, &spec.symbol)
            .with_context(|| format!("Resolving holding '{}'", spec.symbol))?;
        holdings.push(Holding {
            stock_id: stock.id,
            stock_name: stock.name,
            quantity: spec.quantity,
            purchase_price: spec.purchase_price,
            purchase_date: spec.purchase_date,
        });
    }

    let created = api.create_portfolio(&NewPortfolio {
        name,
        base_currency: currency,
        holdings,
    })?;
    match created.id.as_deref() {
        Some(id) => println!(
            "Created portfolio '{}' ({}) with id {}",
            created.name, created.base_currency, id
        ),
        None => println!("Created portfolio '{}' ({})", created.name, created.base_currency),
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let api = ApiClient::new(&get_server_url(conn)?)?;
    let portfolios = api.list_portfolios()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &portfolios)? {
        return Ok(());
    }
    let rows = portfolios
        .into_iter()
        .map(|p| {
            vec![
                p.id.unwrap_or_default(),
                p.name,
                p.base_currency,
                p.holdings.len().to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Id", "Name", "CCY", "Holdings"], rows));
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("ID").unwrap().trim();
    let api = ApiClient::new(&get_server_url(conn)?)?;
    let portfolio: Portfolio = api.get_portfolio(id)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &portfolio)? {
        return Ok(());
    }
    println!("{} ({})", portfolio.name, portfolio.base_currency);
    if portfolio.holdings.is_empty() {
        println!("No holdings");
        return Ok(());
    }
    let rows = portfolio
        .holdings
        .iter()
        .map(|h| {
            vec![
                h.stock_name.clone(),
                format!("{}", h.quantity),
                fmt_amount(&h.purchase_price),
                h.purchase_date.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Stock", "Qty", "Buy Price", "Date"], rows)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
    }

    #[test]
    fn holding_spec_parses_and_uppercases_symbol() {
        let spec = parse_holding_spec(" infy :10:1500.50:2025-07-01", today()).unwrap();
        assert_eq!(spec.symbol, "INFY");
        assert_eq!(spec.quantity, Decimal::from_str("10").unwrap());
        assert_eq!(spec.purchase_price, Decimal::from_str("1500.50").unwrap());
        assert_eq!(
            spec.purchase_date,
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
        );
    }

    #[test]
    fn holding_spec_rejects_wrong_shape() {
        let err = parse_holding_spec("INFY:10:1500.50", today()).unwrap_err();
        assert!(err.to_string().contains("expected SYMBOL:QTY:PRICE:DATE"));
    }

    #[test]
    fn holding_spec_rejects_zero_quantity() {
        assert!(parse_holding_spec("INFY:0:1500:2025-07-01", today()).is_err());
    }

    #[test]
    fn holding_spec_rejects_future_date() {
        assert!(parse_holding_spec("INFY:10:1500:2025-08-02", today()).is_err());
    }
}
