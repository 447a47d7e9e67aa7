// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("rentledger")
        .version(crate_version!())
        .about("Rental-property billing: rooms, contracts, meter readings, price history, invoices")
        .subcommand_required(false)
        .subcommand(
            Command::new("init").about("Initialize the database").arg(
                Arg::new("currency")
                    .long("currency")
                    .help("Display currency code (default USD)"),
            ),
        )
        .subcommand(
            Command::new("property")
                .about("Manage properties")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("address").long("address")),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("room")
                .about("Manage rooms")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("property").long("property").required(true))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("floor").long("floor")),
                )
                .subcommand(
                    json_flags(Command::new("list")).arg(Arg::new("property").long("property")),
                ),
        )
        .subcommand(
            Command::new("tenant")
                .about("Manage tenants")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("phone").long("phone"))
                        .arg(Arg::new("email").long("email")),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("contract")
                .about("Manage rental contracts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("room").long("room").required(true))
                        .arg(Arg::new("tenant").long("tenant").required(true))
                        .arg(
                            Arg::new("start")
                                .long("start")
                                .required(true)
                                .help("Start date YYYY-MM-DD"),
                        )
                        .arg(Arg::new("end").long("end").help("End date YYYY-MM-DD"))
                        .arg(
                            Arg::new("rent")
                                .long("rent")
                                .help("Monthly rent (default 0)"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("end")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("End date YYYY-MM-DD"),
                        ),
                )
                .subcommand(
                    Command::new("subscribe")
                        .about("Subscribe a contract to a service")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("service").long("service").required(true))
                        .arg(
                            Arg::new("quantity")
                                .long("quantity")
                                .help("Billed quantity for flat services (default 1)"),
                        ),
                )
                .subcommand(
                    json_flags(Command::new("services").about("List a contract's subscriptions"))
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("service")
                .about("Manage billable services")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("flat|usage"),
                        )
                        .arg(Arg::new("unit").long("unit")),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("price")
                .about("Manage price history")
                .subcommand(
                    Command::new("set")
                        .arg(
                            Arg::new("item")
                                .long("item")
                                .required(true)
                                .help("electric, water, or a service name"),
                        )
                        .arg(Arg::new("price").long("price").required(true))
                        .arg(
                            Arg::new("from")
                                .long("from")
                                .required(true)
                                .help("Effective-from date YYYY-MM-DD"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")).arg(Arg::new("item").long("item"))),
        )
        .subcommand(
            Command::new("reading")
                .about("Record meter readings")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("room").long("room").required(true))
                        .arg(
                            Arg::new("utility")
                                .long("utility")
                                .required(true)
                                .help("electric|water"),
                        )
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .required(true)
                                .help("Billing period YYYY-MM"),
                        )
                        .arg(Arg::new("value").long("value").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("Reading date YYYY-MM-DD (default: period end)"),
                        )
                        .arg(
                            Arg::new("reset")
                                .long("reset")
                                .action(ArgAction::SetTrue)
                                .help("Meter was replaced; value counts from zero"),
                        ),
                )
                .subcommand(
                    json_flags(Command::new("list"))
                        .arg(Arg::new("room").long("room"))
                        .arg(Arg::new("period").long("period")),
                ),
        )
        .subcommand(
            Command::new("usage")
                .about("Record service usage events")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("contract").long("contract").required(true))
                        .arg(Arg::new("service").long("service").required(true))
                        .arg(Arg::new("period").long("period").required(true))
                        .arg(Arg::new("quantity").long("quantity").required(true)),
                )
                .subcommand(
                    json_flags(Command::new("list"))
                        .arg(Arg::new("contract").long("contract"))
                        .arg(Arg::new("period").long("period")),
                ),
        )
        .subcommand(
            Command::new("invoice")
                .about("Generate and manage invoices")
                .subcommand(
                    Command::new("generate")
                        .arg(Arg::new("contract").long("contract").required(true))
                        .arg(Arg::new("period").long("period").required(true)),
                )
                .subcommand(
                    json_flags(Command::new("show"))
                        .arg(Arg::new("contract").long("contract").required(true))
                        .arg(Arg::new("period").long("period").required(true)),
                )
                .subcommand(
                    json_flags(Command::new("list"))
                        .arg(Arg::new("period").long("period"))
                        .arg(Arg::new("status").long("status")),
                )
                .subcommand(
                    Command::new("issue")
                        .arg(Arg::new("contract").long("contract").required(true))
                        .arg(Arg::new("period").long("period").required(true))
                        .arg(Arg::new("due").long("due").help("Due date YYYY-MM-DD")),
                )
                .subcommand(
                    Command::new("pay")
                        .arg(Arg::new("contract").long("contract").required(true))
                        .arg(Arg::new("period").long("period").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("Payment date YYYY-MM-DD (default: today)"),
                        ),
                ),
        )
        .subcommand(
            Command::new("import").about("Bulk import").subcommand(
                Command::new("readings")
                    .about("Import meter readings from CSV (room,utility,period,value,date,reset)")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("export").about("Bulk export").subcommand(
                Command::new("invoices")
                    .arg(Arg::new("out").long("out").required(true))
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("period").long("period")),
            ),
        )
        .subcommand(Command::new("doctor").about("Check the ledger for billing-data problems"))
}
