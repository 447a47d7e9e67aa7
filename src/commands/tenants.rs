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
            let phone = sub.get_one::<String>("phone").map(|s| s.trim());
            let email = sub.get_one::<String>("email").map(|s| s.trim());
            conn.execute(
                "INSERT INTO tenants(name, phone, email) VALUES (?1, ?2, ?3)",
                params![name, phone, email],
            )?;
            println!("Added tenant '{}'", name);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let mut stmt = conn.prepare(
                "SELECT name, COALESCE(phone,''), COALESCE(email,'') FROM tenants ORDER BY name",
            )?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, p, e) = row?;
                data.push(vec![n, p, e]);
            }
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                println!("{}", pretty_table(&["Name", "Phone", "Email"], data));
            }
        }
        _ => {}
    }
    Ok(())
}
