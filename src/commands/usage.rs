// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_service, maybe_print_json, parse_decimal, parse_period, pretty_table};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let raw = sub.get_one::<String>("contract").unwrap().trim();
    let contract_id: i64 = raw
        .parse()
        .with_context(|| format!("Invalid contract id '{}'", raw))?;
    let service = sub.get_one::<String>("service").unwrap().trim();
    let period = parse_period(sub.get_one::<String>("period").unwrap())?;
    let quantity = parse_decimal(sub.get_one::<String>("quantity").unwrap().trim())?;
    let service_id = id_for_service(conn, service)?;

    conn.execute(
        "INSERT INTO service_usage(contract_id, service_id, period, quantity)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            contract_id,
            service_id,
            period.to_string(),
            quantity.to_string()
        ],
    )?;
    println!(
        "Recorded {} x '{}' for contract {} in {}",
        quantity, service, contract_id, period
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut sql = String::from(
        "SELECT u.contract_id, s.name, u.period, u.quantity, u.invoiced
         FROM service_usage u JOIN services s ON u.service_id=s.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(contract) = sub.get_one::<String>("contract") {
        sql.push_str(" AND u.contract_id=?");
        params_vec.push(contract.trim().to_string());
    }
    if let Some(period) = sub.get_one::<String>("period") {
        let period = parse_period(period)?;
        sql.push_str(" AND u.period=?");
        params_vec.push(period.to_string());
    }
    sql.push_str(" ORDER BY u.period DESC, u.contract_id, u.id");

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let contract: i64 = r.get(0)?;
        let service: String = r.get(1)?;
        let period: String = r.get(2)?;
        let quantity: String = r.get(3)?;
        let invoiced: bool = r.get(4)?;
        data.push(vec![
            contract.to_string(),
            service,
            period,
            quantity,
            if invoiced { "yes".into() } else { "no".into() },
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(
                &["Contract", "Service", "Period", "Quantity", "Invoiced"],
                data
            )
        );
    }
    Ok(())
}
