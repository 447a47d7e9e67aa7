// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::billing::{
    BillingContext, BillingError, ContractStore, Period, PriceStore, ReadingStore,
    SubscribedService,
};
use crate::models::{
    BillableItem, Invoice, InvoiceDetail, InvoiceStatus, PriceRecord, ServiceUsageEvent,
    UsageReading, UtilityKind,
};
use crate::utils::{parse_date, parse_decimal};
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

impl From<rusqlite::Error> for BillingError {
    fn from(e: rusqlite::Error) -> Self {
        BillingError::Store(e.into())
    }
}

/// The rusqlite implementation of the billing store traits, plus invoice
/// persistence (draft save/replace, issue, pay).
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        SqliteStore { conn }
    }

    pub fn find_invoice(&self, contract_id: i64, period: Period) -> Result<Option<Invoice>> {
        let header: Option<(i64, String, String, Option<String>)> = self
            .conn
            .query_row(
                "SELECT id, status, total, due_date FROM invoices
                 WHERE contract_id=?1 AND period=?2",
                params![contract_id, period.to_string()],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
            )
            .optional()?;
        let Some((id, status, total, due)) = header else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT item_type, service_id, description, quantity, unit_price, line_total
             FROM invoice_details WHERE invoice_id=?1 ORDER BY id",
        )?;
        let mut rows = stmt.query(params![id])?;
        let mut details = Vec::new();
        while let Some(r) = rows.next()? {
            let item_type: String = r.get(0)?;
            let service_id: Option<i64> = r.get(1)?;
            let description: String = r.get(2)?;
            let quantity: String = r.get(3)?;
            let unit_price: String = r.get(4)?;
            let line_total: String = r.get(5)?;
            details.push(InvoiceDetail {
                item_type: item_type.parse()?,
                service_id,
                description,
                quantity: parse_decimal(&quantity)?,
                unit_price: parse_decimal(&unit_price)?,
                line_total: parse_decimal(&line_total)?,
            });
        }

        Ok(Some(Invoice {
            id,
            contract_id,
            period,
            status: status.parse()?,
            total: parse_decimal(&total)?,
            due_date: due.as_deref().map(parse_date).transpose()?,
            details,
        }))
    }

    /// Persist a draft: replace the lines of an existing draft for the same
    /// (contract, period), or insert a new row. The UNIQUE(contract_id,
    /// period) constraint means a concurrent duplicate attempt lands on the
    /// replace path instead of creating a second invoice. Saving over a
    /// finalized invoice is an `InvoiceConflict`.
    pub fn save_draft(&self, invoice: &Invoice) -> Result<i64, BillingError> {
        let tx = self.conn.unchecked_transaction()?;
        let existing: Option<(i64, String)> = tx
            .query_row(
                "SELECT id, status FROM invoices WHERE contract_id=?1 AND period=?2",
                params![invoice.contract_id, invoice.period.to_string()],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;

        let id = match existing {
            Some((id, status)) => {
                let status: InvoiceStatus = status.parse()?;
                if status != InvoiceStatus::Draft {
                    return Err(BillingError::InvoiceConflict {
                        contract_id: invoice.contract_id,
                        period: invoice.period,
                        status,
                    });
                }
                tx.execute("DELETE FROM invoice_details WHERE invoice_id=?1", [id])?;
                tx.execute(
                    "UPDATE invoices SET total=?2 WHERE id=?1",
                    params![id, invoice.total.to_string()],
                )?;
                id
            }
            None => {
                tx.execute(
                    "INSERT INTO invoices(contract_id, period, status, total)
                     VALUES (?1, ?2, 'draft', ?3)",
                    params![
                        invoice.contract_id,
                        invoice.period.to_string(),
                        invoice.total.to_string()
                    ],
                )?;
                tx.last_insert_rowid()
            }
        };

        for d in &invoice.details {
            tx.execute(
                "INSERT INTO invoice_details(invoice_id, item_type, service_id, description,
                     quantity, unit_price, line_total)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    d.item_type.as_str(),
                    d.service_id,
                    d.description,
                    d.quantity.to_string(),
                    d.unit_price.to_string(),
                    d.line_total.to_string()
                ],
            )?;
        }
        tx.commit()?;
        Ok(id)
    }

    /// Finalize a draft: draft becomes issued and the readings and usage
    /// events it consumed are flagged `invoiced`, freezing them against
    /// later re-entry.
    pub fn issue_invoice(
        &self,
        contract_id: i64,
        period: Period,
        due_date: Option<chrono::NaiveDate>,
    ) -> Result<(), BillingError> {
        let tx = self.conn.unchecked_transaction()?;
        let (id, status): (i64, String) = tx
            .query_row(
                "SELECT id, status FROM invoices WHERE contract_id=?1 AND period=?2",
                params![contract_id, period.to_string()],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?
            .with_context(|| {
                format!("No invoice for contract {} period {}", contract_id, period)
            })?;
        let status: InvoiceStatus = status.parse()?;
        if status != InvoiceStatus::Draft {
            return Err(BillingError::InvoiceConflict {
                contract_id,
                period,
                status,
            });
        }

        tx.execute(
            "UPDATE invoices SET status='issued', issued_at=datetime('now'), due_date=?2
             WHERE id=?1",
            params![id, due_date.map(|d| d.to_string())],
        )?;

        let room_id: i64 = tx.query_row(
            "SELECT room_id FROM contracts WHERE id=?1",
            params![contract_id],
            |r| r.get(0),
        )?;
        // Everything at or before the billed period is now load-bearing for
        // an issued invoice.
        tx.execute(
            "UPDATE readings SET invoiced=1 WHERE room_id=?1 AND period<=?2",
            params![room_id, period.to_string()],
        )?;
        tx.execute(
            "UPDATE service_usage SET invoiced=1 WHERE contract_id=?1 AND period<=?2",
            params![contract_id, period.to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn mark_paid(
        &self,
        contract_id: i64,
        period: Period,
        paid_date: chrono::NaiveDate,
    ) -> Result<(), BillingError> {
        let (id, status): (i64, String) = self
            .conn
            .query_row(
                "SELECT id, status FROM invoices WHERE contract_id=?1 AND period=?2",
                params![contract_id, period.to_string()],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?
            .with_context(|| {
                format!("No invoice for contract {} period {}", contract_id, period)
            })?;
        let status: InvoiceStatus = status.parse()?;
        if !matches!(status, InvoiceStatus::Issued | InvoiceStatus::Overdue) {
            return Err(BillingError::InvoiceConflict {
                contract_id,
                period,
                status,
            });
        }
        self.conn.execute(
            "UPDATE invoices SET status='paid', paid_at=?2 WHERE id=?1",
            params![id, paid_date.to_string()],
        )?;
        Ok(())
    }
}

impl PriceStore for SqliteStore<'_> {
    fn list_price_records(&self, item: &BillableItem) -> Result<Vec<PriceRecord>> {
        let sql = match item.service_id() {
            Some(_) => {
                "SELECT id, unit_price, effective_from, effective_to FROM price_history
                 WHERE item_type='service' AND service_id=?1 ORDER BY effective_from"
            }
            None => {
                "SELECT id, unit_price, effective_from, effective_to FROM price_history
                 WHERE item_type=?1 AND service_id IS NULL ORDER BY effective_from"
            }
        };
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = match item.service_id() {
            Some(sid) => stmt.query(params![sid])?,
            None => stmt.query(params![item.item_type()])?,
        };

        let mut records = Vec::new();
        while let Some(r) = rows.next()? {
            let id: i64 = r.get(0)?;
            let price: String = r.get(1)?;
            let from: String = r.get(2)?;
            let to: Option<String> = r.get(3)?;
            records.push(PriceRecord {
                id,
                item: item.clone(),
                unit_price: parse_decimal(&price)?,
                effective_from: parse_date(&from)?,
                effective_to: to.as_deref().map(parse_date).transpose()?,
            });
        }
        Ok(records)
    }
}

impl ReadingStore for SqliteStore<'_> {
    fn reading_for_period(
        &self,
        room_id: i64,
        utility: UtilityKind,
        period: Period,
    ) -> Result<Option<UsageReading>> {
        self.read_one(
            "SELECT id, period, value, reading_date, meter_reset, invoiced FROM readings
             WHERE room_id=?1 AND utility=?2 AND period=?3",
            room_id,
            utility,
            period,
        )
    }

    fn latest_reading_before(
        &self,
        room_id: i64,
        utility: UtilityKind,
        period: Period,
    ) -> Result<Option<UsageReading>> {
        self.read_one(
            "SELECT id, period, value, reading_date, meter_reset, invoiced FROM readings
             WHERE room_id=?1 AND utility=?2 AND period<?3 ORDER BY period DESC LIMIT 1",
            room_id,
            utility,
            period,
        )
    }

    fn has_meter(&self, room_id: i64, utility: UtilityKind) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM readings WHERE room_id=?1 AND utility=?2 LIMIT 1",
                params![room_id, utility.as_str()],
                |r| r.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn list_service_usage(
        &self,
        contract_id: i64,
        service_id: i64,
        period: Period,
    ) -> Result<Vec<ServiceUsageEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, quantity, invoiced FROM service_usage
             WHERE contract_id=?1 AND service_id=?2 AND period=?3 ORDER BY id",
        )?;
        let mut rows = stmt.query(params![contract_id, service_id, period.to_string()])?;
        let mut events = Vec::new();
        while let Some(r) = rows.next()? {
            let id: i64 = r.get(0)?;
            let quantity: String = r.get(1)?;
            let invoiced: bool = r.get(2)?;
            events.push(ServiceUsageEvent {
                id,
                contract_id,
                service_id,
                period,
                quantity: parse_decimal(&quantity)?,
                invoiced,
            });
        }
        Ok(events)
    }
}

impl SqliteStore<'_> {
    fn read_one(
        &self,
        sql: &str,
        room_id: i64,
        utility: UtilityKind,
        period: Period,
    ) -> Result<Option<UsageReading>> {
        let row: Option<(i64, String, String, String, bool, bool)> = self
            .conn
            .query_row(
                sql,
                params![room_id, utility.as_str(), period.to_string()],
                |r| {
                    Ok((
                        r.get(0)?,
                        r.get(1)?,
                        r.get(2)?,
                        r.get(3)?,
                        r.get(4)?,
                        r.get(5)?,
                    ))
                },
            )
            .optional()?;
        let Some((id, period_s, value, date, meter_reset, invoiced)) = row else {
            return Ok(None);
        };
        Ok(Some(UsageReading {
            id,
            room_id,
            utility,
            period: period_s
                .parse()
                .with_context(|| format!("Invalid period '{}' in readings", period_s))?,
            value: parse_decimal(&value)?,
            reading_date: parse_date(&date)?,
            meter_reset,
            invoiced,
        }))
    }
}

impl ContractStore for SqliteStore<'_> {
    fn billing_context(
        &self,
        contract_id: i64,
        period: Period,
    ) -> Result<Option<BillingContext>> {
        let row: Option<(i64, String, String, String, Option<String>)> = self
            .conn
            .query_row(
                "SELECT c.room_id, r.name, c.monthly_rent, c.start_date, c.end_date
                 FROM contracts c JOIN rooms r ON c.room_id=r.id
                 WHERE c.id=?1",
                params![contract_id],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
            )
            .optional()?;
        let Some((room_id, room_name, rent, start, end)) = row else {
            return Ok(None);
        };

        let start = parse_date(&start)?;
        let end = end.as_deref().map(parse_date).transpose()?;
        let active = start <= period.end() && end.is_none_or(|e| e >= period.start());
        if !active {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            "SELECT cs.service_id, s.name, s.kind, cs.quantity
             FROM contract_services cs JOIN services s ON cs.service_id=s.id
             WHERE cs.contract_id=?1 ORDER BY cs.id",
        )?;
        let mut rows = stmt.query(params![contract_id])?;
        let mut services = Vec::new();
        while let Some(r) = rows.next()? {
            let service_id: i64 = r.get(0)?;
            let name: String = r.get(1)?;
            let kind: String = r.get(2)?;
            let quantity: String = r.get(3)?;
            services.push(SubscribedService {
                service_id,
                name,
                kind: kind.parse()?,
                quantity: parse_decimal(&quantity)?,
            });
        }

        Ok(Some(BillingContext {
            contract_id,
            room_id,
            room_name,
            monthly_rent: parse_decimal(&rent)?,
            services,
        }))
    }
}
