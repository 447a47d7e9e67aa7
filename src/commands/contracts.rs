// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    id_for_room, id_for_service, id_for_tenant, maybe_print_json, parse_date, parse_decimal,
    pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("end", sub)) => end(conn, sub)?,
        Some(("subscribe", sub)) => subscribe(conn, sub)?,
        Some(("services", sub)) => services(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_contract_id(sub: &clap::ArgMatches, arg: &str) -> Result<i64> {
    let raw = sub.get_one::<String>(arg).unwrap().trim();
    raw.parse::<i64>()
        .with_context(|| format!("Invalid contract id '{}'", raw))
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let room = sub.get_one::<String>("room").unwrap().trim();
    let tenant = sub.get_one::<String>("tenant").unwrap().trim();
    let start = parse_date(sub.get_one::<String>("start").unwrap().trim())?;
    let end = sub
        .get_one::<String>("end")
        .map(|s| parse_date(s.trim()))
        .transpose()?;
    let rent = sub
        .get_one::<String>("rent")
        .map(|s| parse_decimal(s.trim()))
        .transpose()?
        .unwrap_or(Decimal::ZERO);

    let room_id = id_for_room(conn, room)?;
    let tenant_id = id_for_tenant(conn, tenant)?;
    conn.execute(
        "INSERT INTO contracts(room_id, tenant_id, start_date, end_date, monthly_rent)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            room_id,
            tenant_id,
            start.to_string(),
            end.map(|d| d.to_string()),
            rent.to_string()
        ],
    )?;
    let id = conn.last_insert_rowid();
    println!(
        "Contract {} created: {} in {} from {} (rent {})",
        id, tenant, room, start, rent
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare(
        "SELECT c.id, r.name, t.name, c.start_date, COALESCE(c.end_date,''), c.monthly_rent
         FROM contracts c
         JOIN rooms r ON c.room_id=r.id
         JOIN tenants t ON c.tenant_id=t.id
         ORDER BY c.start_date DESC, c.id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (id, room, tenant, start, end, rent) = row?;
        data.push(vec![id.to_string(), room, tenant, start, end, rent]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(&["ID", "Room", "Tenant", "Start", "End", "Rent"], data)
        );
    }
    Ok(())
}

fn end(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_contract_id(sub, "id")?;
    let date = parse_date(sub.get_one::<String>("date").unwrap().trim())?;
    let n = conn.execute(
        "UPDATE contracts SET end_date=?2 WHERE id=?1",
        params![id, date.to_string()],
    )?;
    if n == 0 {
        return Err(anyhow::anyhow!("Contract {} not found", id));
    }
    println!("Contract {} ends {}", id, date);
    Ok(())
}

fn subscribe(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_contract_id(sub, "id")?;
    let service = sub.get_one::<String>("service").unwrap().trim();
    let quantity = sub
        .get_one::<String>("quantity")
        .map(|s| parse_decimal(s.trim()))
        .transpose()?
        .unwrap_or(Decimal::ONE);
    let service_id = id_for_service(conn, service)?;
    conn.execute(
        "INSERT INTO contract_services(contract_id, service_id, quantity) VALUES (?1,?2,?3)
         ON CONFLICT(contract_id, service_id) DO UPDATE SET quantity=excluded.quantity",
        params![id, service_id, quantity.to_string()],
    )?;
    println!(
        "Contract {} subscribed to '{}' (quantity {})",
        id, service, quantity
    );
    Ok(())
}

fn services(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let id = parse_contract_id(sub, "id")?;
    let mut stmt = conn.prepare(
        "SELECT s.name, s.kind, cs.quantity
         FROM contract_services cs JOIN services s ON cs.service_id=s.id
         WHERE cs.contract_id=?1 ORDER BY cs.id",
    )?;
    let rows = stmt.query_map(params![id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (n, k, q) = row?;
        data.push(vec![n, k, q]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Service", "Kind", "Quantity"], data));
    }
    Ok(())
}
