// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{arg, crate_description, crate_version, value_parser, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("tradeclip")
        .version(crate_version!())
        .about(crate_description!())
        .subcommand(
            Command::new("portfolio")
                .about("Create and inspect portfolios")
                .subcommand(
                    Command::new("create")
                        .about("Create a portfolio on the server")
                        .arg(arg!(--name <NAME> "Portfolio name (letters, numbers, spaces)").required(true))
                        .arg(arg!(--currency <CCY> "Base currency").default_value("USD"))
                        .arg(
                            arg!(--holding <SPEC> "Initial holding as SYMBOL:QTY:PRICE:DATE (repeatable)")
                                .action(ArgAction::Append),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .about("List portfolios on the server")
                        .arg(arg!(--json "Print as JSON").action(ArgAction::SetTrue))
                        .arg(arg!(--jsonl "Print as JSON lines").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("show")
                        .about("Show one portfolio and its holdings")
                        .arg(arg!(<ID> "Portfolio id"))
                        .arg(arg!(--json "Print as JSON").action(ArgAction::SetTrue))
                        .arg(arg!(--jsonl "Print as JSON lines").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("set-default")
                        .about("Remember a portfolio id for tx add/import")
                        .arg(arg!(<ID> "Portfolio id")),
                ),
        )
        .subcommand(
            Command::new("stock")
                .about("Search the stock master")
                .subcommand(
                    Command::new("search")
                        .about("One-shot symbol/name search (min 2 characters)")
                        .arg(arg!(<QUERY> "Search text"))
                        .arg(arg!(--json "Print as JSON").action(ArgAction::SetTrue))
                        .arg(arg!(--jsonl "Print as JSON lines").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("pick")
                        .about("Interactive search-as-you-type; number selects, blank line quits"),
                ),
        )
        .subcommand(
            Command::new("broker")
                .about("Broker fee schedules")
                .subcommand(
                    Command::new("charges")
                        .about("Show a broker's fee schedule (cached after first fetch)")
                        .arg(arg!(<NAME> "Broker name"))
                        .arg(arg!(--refresh "Refetch even if cached").action(ArgAction::SetTrue)),
                )
                .subcommand(Command::new("list").about("List cached fee schedules")),
        )
        .subcommand(
            Command::new("tx")
                .about("Quote and submit trades")
                .subcommand(
                    Command::new("preview")
                        .about("Quote the charge breakdown for a trade")
                        .arg(arg!(--quantity <QTY> "Trade quantity").required(true))
                        .arg(arg!(--price <PRICE> "Price per unit").required(true))
                        .arg(arg!(--side <SIDE> "BUY or SELL").default_value("BUY"))
                        .arg(arg!(--broker <NAME> "Broker whose schedule to apply")),
                )
                .subcommand(
                    Command::new("add")
                        .about("Submit a trade to the server")
                        .arg(arg!(--portfolio <ID> "Portfolio id (default: the set-default one)"))
                        .arg(arg!(--symbol <SYMBOL> "Stock symbol, resolved via search"))
                        .arg(arg!(--"stock-id" <ID> "Stock id, skips symbol resolution"))
                        .arg(arg!(--side <SIDE> "BUY or SELL").required(true))
                        .arg(arg!(--quantity <QTY> "Trade quantity").required(true))
                        .arg(arg!(--price <PRICE> "Price per unit").required(true))
                        .arg(arg!(--date <DATE> "Trade date, YYYY-MM-DD").required(true))
                        .arg(arg!(--broker <NAME> "Broker name").required(true))
                        .arg(arg!(--"broker-txn-id" <ID> "Broker-assigned transaction id"))
                        .arg(arg!(--notes <TEXT> "Free-text notes"))
                        .arg(arg!(--"dry-run" "Validate and quote without submitting").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("history")
                        .about("Locally journaled submissions")
                        .arg(arg!(--limit <N> "Max rows").value_parser(value_parser!(usize)))
                        .arg(arg!(--json "Print as JSON").action(ArgAction::SetTrue))
                        .arg(arg!(--jsonl "Print as JSON lines").action(ArgAction::SetTrue)),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Batch-submit trades")
                .subcommand(
                    Command::new("transactions")
                        .about("Submit trades from a CSV file")
                        .arg(arg!(--path <FILE> "CSV path").required(true))
                        .arg(arg!(--portfolio <ID> "Portfolio id (default: the set-default one)"))
                        .arg(arg!(--"dry-run" "Validate without submitting").action(ArgAction::SetTrue)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export local data")
                .subcommand(
                    Command::new("submissions")
                        .about("Export the submission journal")
                        .arg(arg!(--format <FMT> "csv or json").default_value("csv"))
                        .arg(arg!(--out <FILE> "Output path").required(true)),
                ),
        )
        .subcommand(
            Command::new("server")
                .about("Backend server settings")
                .subcommand(
                    Command::new("set-url")
                        .about("Set the backend base URL")
                        .arg(arg!(<URL> "e.g. http://127.0.0.1:8000")),
                )
                .subcommand(Command::new("show").about("Show the configured base URL")),
        )
        .subcommand(Command::new("doctor").about("Check server reachability and cache integrity"))
}
