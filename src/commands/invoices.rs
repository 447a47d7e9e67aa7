// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::billing::generate_invoice;
use crate::store::SqliteStore;
use crate::utils::{fmt_money, get_currency, maybe_print_json, parse_date, parse_period, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("generate", sub)) => generate(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("issue", sub)) => issue(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn contract_and_period(sub: &clap::ArgMatches) -> Result<(i64, crate::billing::Period)> {
    let raw = sub.get_one::<String>("contract").unwrap().trim();
    let contract_id: i64 = raw
        .parse()
        .with_context(|| format!("Invalid contract id '{}'", raw))?;
    let period = parse_period(sub.get_one::<String>("period").unwrap())?;
    Ok((contract_id, period))
}

fn generate(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (contract_id, period) = contract_and_period(sub)?;
    let store = SqliteStore::new(conn);
    let invoice = generate_invoice(&store, contract_id, period)?;
    let id = store.save_draft(&invoice)?;
    let ccy = get_currency(conn)?;
    println!(
        "Draft invoice {} for contract {} period {}: {} line(s), total {}",
        id,
        contract_id,
        period,
        invoice.details.len(),
        fmt_money(&invoice.total, &ccy)
    );
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (contract_id, period) = contract_and_period(sub)?;
    let store = SqliteStore::new(conn);
    let invoice = store
        .find_invoice(contract_id, period)?
        .with_context(|| format!("No invoice for contract {} period {}", contract_id, period))?;

    if maybe_print_json(json_flag, jsonl_flag, &invoice)? {
        return Ok(());
    }

    let ccy = get_currency(conn)?;
    let mut data = Vec::new();
    for d in &invoice.details {
        data.push(vec![
            d.description.clone(),
            d.quantity.to_string(),
            d.unit_price.to_string(),
            fmt_money(&d.line_total, &ccy),
        ]);
    }
    println!(
        "Invoice {}: contract {}, period {}, status {}",
        invoice.id, invoice.contract_id, invoice.period, invoice.status
    );
    println!(
        "{}",
        pretty_table(&["Item", "Quantity", "Unit Price", "Total"], data)
    );
    println!("Total: {}", fmt_money(&invoice.total, &ccy));
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut sql = String::from(
        "SELECT i.id, i.contract_id, r.name, i.period, i.status, i.total,
                COALESCE(i.due_date,'')
         FROM invoices i
         JOIN contracts c ON i.contract_id=c.id
         JOIN rooms r ON c.room_id=r.id
         WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(period) = sub.get_one::<String>("period") {
        let period = parse_period(period)?;
        sql.push_str(" AND i.period=?");
        params_vec.push(period.to_string());
    }
    if let Some(status) = sub.get_one::<String>("status") {
        sql.push_str(" AND i.status=?");
        params_vec.push(status.trim().to_string());
    }
    sql.push_str(" ORDER BY i.period DESC, r.name");

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let contract: i64 = r.get(1)?;
        let room: String = r.get(2)?;
        let period: String = r.get(3)?;
        let status: String = r.get(4)?;
        let total: String = r.get(5)?;
        let due: String = r.get(6)?;
        data.push(vec![
            id.to_string(),
            contract.to_string(),
            room,
            period,
            status,
            total,
            due,
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(
                &["ID", "Contract", "Room", "Period", "Status", "Total", "Due"],
                data
            )
        );
    }
    Ok(())
}

fn issue(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (contract_id, period) = contract_and_period(sub)?;
    let due = sub
        .get_one::<String>("due")
        .map(|s| parse_date(s.trim()))
        .transpose()?;
    let store = SqliteStore::new(conn);
    store.issue_invoice(contract_id, period, due)?;
    println!(
        "Issued invoice for contract {} period {}{}",
        contract_id,
        period,
        due.map(|d| format!(", due {}", d)).unwrap_or_default()
    );
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (contract_id, period) = contract_and_period(sub)?;
    let date = sub
        .get_one::<String>("date")
        .map(|s| parse_date(s.trim()))
        .transpose()?
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let store = SqliteStore::new(conn);
    store.mark_paid(contract_id, period, date)?;
    println!(
        "Invoice for contract {} period {} paid on {}",
        contract_id, period, date
    );
    Ok(())
}
