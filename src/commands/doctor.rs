// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::billing::Period;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();
    let today = chrono::Utc::now().date_naive();
    let last_month = Period::containing(today).prev();

    // 1) Stale meters: rooms with a meter but no reading since last month
    let mut stmt = conn.prepare(
        "SELECT r.name, d.utility, MAX(d.period)
         FROM readings d JOIN rooms r ON d.room_id=r.id
         GROUP BY d.room_id, d.utility",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let room: String = r.get(0)?;
        let utility: String = r.get(1)?;
        let latest: String = r.get(2)?;
        if latest < last_month.to_string() {
            rows.push(vec![
                "stale_meter".into(),
                format!("{} {} last read {}", room, utility, latest),
            ]);
        }
    }

    // 2) Utilities read but never priced
    let mut stmt2 = conn.prepare(
        "SELECT DISTINCT utility FROM readings
         EXCEPT SELECT item_type FROM price_history WHERE service_id IS NULL",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let utility: String = r.get(0)?;
        rows.push(vec!["missing_price".into(), utility]);
    }

    // 3) Subscribed services with no price record
    let mut stmt3 = conn.prepare(
        "SELECT DISTINCT s.name FROM contract_services cs
         JOIN services s ON cs.service_id=s.id
         WHERE cs.service_id NOT IN
            (SELECT service_id FROM price_history WHERE service_id IS NOT NULL)",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let service: String = r.get(0)?;
        rows.push(vec!["missing_price".into(), format!("service {}", service)]);
    }

    // 4) Issued invoices past due
    let mut stmt4 = conn.prepare(
        "SELECT i.contract_id, i.period, i.due_date FROM invoices i
         WHERE i.status='issued' AND i.due_date IS NOT NULL AND i.due_date < ?1
         ORDER BY i.due_date",
    )?;
    let mut cur4 = stmt4.query([today.to_string()])?;
    while let Some(r) = cur4.next()? {
        let contract: i64 = r.get(0)?;
        let period: String = r.get(1)?;
        let due: String = r.get(2)?;
        rows.push(vec![
            "overdue_invoice".into(),
            format!("contract {} period {} was due {}", contract, period, due),
        ]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
