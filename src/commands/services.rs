// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::ServiceKind;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let kind: ServiceKind = sub.get_one::<String>("kind").unwrap().trim().parse()?;
            let unit = sub.get_one::<String>("unit").map(|s| s.trim());
            conn.execute(
                "INSERT INTO services(name, kind, unit) VALUES (?1, ?2, ?3)",
                params![name, kind.as_str(), unit],
            )?;
            println!("Added service '{}' ({})", name, kind.as_str());
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let mut stmt = conn
                .prepare("SELECT name, kind, COALESCE(unit,'') FROM services ORDER BY name")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, k, u) = row?;
                data.push(vec![n, k, u]);
            }
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                println!("{}", pretty_table(&["Name", "Kind", "Unit"], data));
            }
        }
        _ => {}
    }
    Ok(())
}
