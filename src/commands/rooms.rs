// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_property, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let property = sub.get_one::<String>("property").unwrap().trim();
            let name = sub.get_one::<String>("name").unwrap().trim();
            let floor = sub.get_one::<String>("floor").map(|s| s.trim());
            let property_id = id_for_property(conn, property)?;
            conn.execute(
                "INSERT INTO rooms(property_id, name, floor) VALUES (?1, ?2, ?3)",
                params![property_id, name, floor],
            )?;
            println!("Added room '{}' in '{}'", name, property);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let mut sql = String::from(
                "SELECT r.name, p.name, COALESCE(r.floor,'')
                 FROM rooms r JOIN properties p ON r.property_id=p.id",
            );
            let mut data = Vec::new();
            if let Some(property) = sub.get_one::<String>("property") {
                sql.push_str(" WHERE p.name=?1 ORDER BY r.name");
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![property.trim()], |r| {
                    Ok((
                        r.get::<_, String>(0)?,
                        r.get::<_, String>(1)?,
                        r.get::<_, String>(2)?,
                    ))
                })?;
                for row in rows {
                    let (n, p, f) = row?;
                    data.push(vec![n, p, f]);
                }
            } else {
                sql.push_str(" ORDER BY p.name, r.name");
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], |r| {
                    Ok((
                        r.get::<_, String>(0)?,
                        r.get::<_, String>(1)?,
                        r.get::<_, String>(2)?,
                    ))
                })?;
                for row in rows {
                    let (n, p, f) = row?;
                    data.push(vec![n, p, f]);
                }
            }
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                println!("{}", pretty_table(&["Room", "Property", "Floor"], data));
            }
        }
        _ => {}
    }
    Ok(())
}
