// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::parse_period;
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("invoices", sub)) => export_invoices(conn, sub),
        _ => Ok(()),
    }
}

fn export_invoices(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let period = sub
        .get_one::<String>("period")
        .map(|s| parse_period(s))
        .transpose()?;

    let mut sql = String::from(
        "SELECT i.period, r.name, t.name, d.item_type, d.description, d.quantity,
                d.unit_price, d.line_total, i.status
         FROM invoice_details d
         JOIN invoices i ON d.invoice_id=i.id
         JOIN contracts c ON i.contract_id=c.id
         JOIN rooms r ON c.room_id=r.id
         JOIN tenants t ON c.tenant_id=t.id",
    );
    if period.is_some() {
        sql.push_str(" WHERE i.period=?1");
    }
    sql.push_str(" ORDER BY i.period, r.name, d.id");

    let mut stmt = conn.prepare(&sql)?;
    let map_row = |r: &rusqlite::Row<'_>| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, String>(7)?,
            r.get::<_, String>(8)?,
        ))
    };
    let rows: Vec<_> = match period {
        Some(p) => stmt
            .query_map([p.to_string()], map_row)?
            .collect::<Result<_, _>>()?,
        None => stmt.query_map([], map_row)?.collect::<Result<_, _>>()?,
    };

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "period",
                "room",
                "tenant",
                "item_type",
                "description",
                "quantity",
                "unit_price",
                "line_total",
                "status",
            ])?;
            for (p, room, tenant, kind, desc, qty, price, total, status) in rows {
                wtr.write_record([p, room, tenant, kind, desc, qty, price, total, status])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for (p, room, tenant, kind, desc, qty, price, total, status) in rows {
                items.push(json!({
                    "period": p, "room": room, "tenant": tenant, "item_type": kind,
                    "description": desc, "quantity": qty, "unit_price": price,
                    "line_total": total, "status": status
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported invoice lines to {}", out);
    Ok(())
}
