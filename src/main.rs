// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use rentledger::{cli, commands, db, utils};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", sub)) => {
            if let Some(ccy) = sub.get_one::<String>("currency") {
                utils::set_currency(&conn, &ccy.to_uppercase())?;
            }
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("property", sub)) => commands::properties::handle(&conn, sub)?,
        Some(("room", sub)) => commands::rooms::handle(&conn, sub)?,
        Some(("tenant", sub)) => commands::tenants::handle(&conn, sub)?,
        Some(("contract", sub)) => commands::contracts::handle(&conn, sub)?,
        Some(("service", sub)) => commands::services::handle(&conn, sub)?,
        Some(("price", sub)) => commands::prices::handle(&conn, sub)?,
        Some(("reading", sub)) => commands::readings::handle(&conn, sub)?,
        Some(("usage", sub)) => commands::usage::handle(&conn, sub)?,
        Some(("invoice", sub)) => commands::invoices::handle(&conn, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
