// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::billing::ReadingStore;
use crate::models::UtilityKind;
use crate::store::SqliteStore;
use crate::utils::{
    id_for_room, maybe_print_json, parse_date, parse_decimal, parse_period, pretty_table,
};
use anyhow::{Result, anyhow};
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
    let room = sub.get_one::<String>("room").unwrap().trim();
    let utility: UtilityKind = sub.get_one::<String>("utility").unwrap().trim().parse()?;
    let period = parse_period(sub.get_one::<String>("period").unwrap())?;
    let value = parse_decimal(sub.get_one::<String>("value").unwrap().trim())?;
    let date = sub
        .get_one::<String>("date")
        .map(|s| parse_date(s.trim()))
        .transpose()?
        .unwrap_or_else(|| period.end());
    let reset = sub.get_flag("reset");

    let room_id = id_for_room(conn, room)?;

    // Catch reading-order entry mistakes at the door; the aggregator
    // enforces the same invariant again at billing time.
    if !reset {
        let store = SqliteStore::new(conn);
        if let Some(prev) = store.latest_reading_before(room_id, utility, period)? {
            if value < prev.value {
                return Err(anyhow!(
                    "{} reading {} for {} is below the {} reading {}; \
                     pass --reset if the meter was replaced",
                    utility,
                    value,
                    period,
                    prev.period,
                    prev.value
                ));
            }
        }
    }

    // Re-entry is allowed until an issued invoice has consumed the row.
    let n = conn.execute(
        "INSERT INTO readings(room_id, utility, period, value, reading_date, meter_reset)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(room_id, utility, period) DO UPDATE SET
             value=excluded.value,
             reading_date=excluded.reading_date,
             meter_reset=excluded.meter_reset
         WHERE readings.invoiced=0",
        params![
            room_id,
            utility.as_str(),
            period.to_string(),
            value.to_string(),
            date.to_string(),
            reset
        ],
    )?;
    if n == 0 {
        return Err(anyhow!(
            "{} reading for room '{}' period {} is already on an issued invoice",
            utility,
            room,
            period
        ));
    }
    println!(
        "Recorded {} reading {} for room '{}' period {}{}",
        utility,
        value,
        room,
        period,
        if reset { " (meter reset)" } else { "" }
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut sql = String::from(
        "SELECT r.name, d.utility, d.period, d.value, d.reading_date, d.meter_reset, d.invoiced
         FROM readings d JOIN rooms r ON d.room_id=r.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(room) = sub.get_one::<String>("room") {
        sql.push_str(" AND r.name=?");
        params_vec.push(room.trim().to_string());
    }
    if let Some(period) = sub.get_one::<String>("period") {
        let period = parse_period(period)?;
        sql.push_str(" AND d.period=?");
        params_vec.push(period.to_string());
    }
    sql.push_str(" ORDER BY d.period DESC, r.name, d.utility");

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let room: String = r.get(0)?;
        let utility: String = r.get(1)?;
        let period: String = r.get(2)?;
        let value: String = r.get(3)?;
        let date: String = r.get(4)?;
        let reset: bool = r.get(5)?;
        let invoiced: bool = r.get(6)?;
        data.push(vec![
            room,
            utility,
            period,
            value,
            date,
            if reset { "reset".into() } else { String::new() },
            if invoiced { "yes".into() } else { "no".into() },
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(
                &["Room", "Utility", "Period", "Value", "Date", "Reset", "Invoiced"],
                data
            )
        );
    }
    Ok(())
}
