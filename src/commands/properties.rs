// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let address = sub.get_one::<String>("address").map(|s| s.trim());
            conn.execute(
                "INSERT INTO properties(name, address) VALUES (?1, ?2)",
                params![name, address],
            )?;
            println!("Added property '{}'", name);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let mut stmt = conn.prepare(
                "SELECT p.name, COALESCE(p.address,''), COUNT(r.id)
                 FROM properties p LEFT JOIN rooms r ON r.property_id=p.id
                 GROUP BY p.id ORDER BY p.name",
            )?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, i64>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, a, c) = row?;
                data.push(vec![n, a, c.to_string()]);
            }
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                println!("{}", pretty_table(&["Name", "Address", "Rooms"], data));
            }
        }
        _ => {}
    }
    Ok(())
}
