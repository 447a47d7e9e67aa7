// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::UtilityKind;
use crate::utils::{parse_date, parse_decimal, parse_period};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use rusqlite::{Connection, params};
use std::collections::{HashMap, hash_map::Entry};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("readings", sub)) => import_readings(conn, sub),
        _ => Ok(()),
    }
}

/// Bulk meter-reading entry: `room,utility,period,value,date,reset` with a
/// header row. The whole file lands in one transaction; a bad row aborts
/// the import.
fn import_readings(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut room_cache: HashMap<String, i64> = HashMap::new();
    let mut imported = 0usize;

    for result in rdr.records() {
        let rec = result?;
        let room = rec.get(0).context("room missing")?.trim().to_string();
        let utility_raw = rec.get(1).context("utility missing")?.trim();
        let period_raw = rec.get(2).context("period missing")?.trim();
        let value_raw = rec.get(3).context("value missing")?.trim();
        let date_raw = rec.get(4).map(|s| s.trim()).filter(|s| !s.is_empty());
        let reset = rec
            .get(5)
            .map(|s| s.trim())
            .is_some_and(|s| s.eq_ignore_ascii_case("true") || s == "1");

        let utility: UtilityKind = utility_raw.parse()?;
        let period = parse_period(period_raw)?;
        let value = parse_decimal(value_raw)
            .with_context(|| format!("Invalid value '{}' for room {}", value_raw, room))?;
        let date = match date_raw {
            Some(d) => parse_date(d).with_context(|| format!("Invalid reading date '{}'", d))?,
            None => period.end(),
        };

        let room_id = match room_cache.entry(room.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id: i64 = tx
                    .query_row("SELECT id FROM rooms WHERE name=?1", params![&room], |r| {
                        r.get(0)
                    })
                    .with_context(|| format!("Room '{}' not found", room))?;
                *entry.insert(id)
            }
        };

        let n = tx.execute(
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
        imported += 1;
    }
    tx.commit()?;
    println!("Imported {} reading(s) from {}", imported, path);
    Ok(())
}
