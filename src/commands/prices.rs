// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{billable_item, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Append a price record. The previous open record for the item is closed
/// at `from - 1 day`; superseded records are never edited or deleted, so
/// past invoices stay reproducible.
fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let item_name = sub.get_one::<String>("item").unwrap().trim();
    let price = parse_decimal(sub.get_one::<String>("price").unwrap().trim())?;
    let from = parse_date(sub.get_one::<String>("from").unwrap().trim())?;

    let item = billable_item(conn, item_name)?;
    let tx = conn.unchecked_transaction()?;

    let open: Option<(i64, String)> = tx
        .query_row(
            "SELECT id, effective_from FROM price_history
             WHERE item_type=?1 AND (service_id=?2 OR (?2 IS NULL AND service_id IS NULL))
               AND effective_to IS NULL",
            params![item.item_type(), item.service_id()],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;

    if let Some((open_id, open_from)) = open {
        let open_from = parse_date(&open_from)?;
        if open_from >= from {
            return Err(anyhow!(
                "A price for {} already takes effect on {}; new prices must start later",
                item,
                open_from
            ));
        }
        let close = from
            .pred_opt()
            .ok_or_else(|| anyhow!("Invalid effective date {}", from))?;
        tx.execute(
            "UPDATE price_history SET effective_to=?2 WHERE id=?1",
            params![open_id, close.to_string()],
        )?;
    }

    tx.execute(
        "INSERT INTO price_history(item_type, service_id, unit_price, effective_from)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            item.item_type(),
            item.service_id(),
            price.to_string(),
            from.to_string()
        ],
    )?;
    tx.commit()?;
    println!("Price for {} is {} from {}", item, price, from);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut sql = String::from(
        "SELECT CASE p.item_type WHEN 'service' THEN s.name ELSE p.item_type END,
                p.unit_price, p.effective_from, COALESCE(p.effective_to,'')
         FROM price_history p LEFT JOIN services s ON p.service_id=s.id",
    );
    let mut data = Vec::new();
    if let Some(item_name) = sub.get_one::<String>("item") {
        let item = billable_item(conn, item_name.trim())?;
        sql.push_str(
            " WHERE p.item_type=?1 AND (p.service_id=?2 OR (?2 IS NULL AND p.service_id IS NULL))
              ORDER BY p.effective_from",
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![item.item_type(), item.service_id()], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
            ))
        })?;
        for row in rows {
            let (i, p, f, t) = row?;
            data.push(vec![i, p, f, t]);
        }
    } else {
        sql.push_str(" ORDER BY p.item_type, s.name, p.effective_from");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
            ))
        })?;
        for row in rows {
            let (i, p, f, t) = row?;
            data.push(vec![i, p, f, t]);
        }
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(&["Item", "Unit Price", "From", "To"], data)
        );
    }
    Ok(())
}
