// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rentledger::billing::{BillingError, Period, generate_invoice};
use rentledger::models::{InvoiceStatus, LineKind};
use rentledger::store::SqliteStore;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    rentledger::db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO properties(name) VALUES ('Main')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO rooms(property_id, name) VALUES (1, 'R101')",
        [],
    )
    .unwrap();
    conn.execute("INSERT INTO tenants(name) VALUES ('An')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO contracts(room_id, tenant_id, start_date, monthly_rent)
         VALUES (1, 1, '2025-01-01', '0')",
        [],
    )
    .unwrap();
    conn
}

fn add_reading(conn: &Connection, utility: &str, period: &str, value: &str) {
    conn.execute(
        "INSERT INTO readings(room_id, utility, period, value, reading_date)
         VALUES (1, ?1, ?2, ?3, ?2 || '-28')",
        params![utility, period, value],
    )
    .unwrap();
}

fn add_price(conn: &Connection, item_type: &str, price: &str, from: &str, to: Option<&str>) {
    conn.execute(
        "INSERT INTO price_history(item_type, service_id, unit_price, effective_from, effective_to)
         VALUES (?1, NULL, ?2, ?3, ?4)",
        params![item_type, price, from, to],
    )
    .unwrap();
}

#[test]
fn electric_scenario_30_units_at_4000() {
    let conn = setup();
    add_reading(&conn, "electric", "2025-05", "120");
    add_reading(&conn, "electric", "2025-06", "150");
    add_price(&conn, "electric", "4000", "2025-01-01", None);

    let store = SqliteStore::new(&conn);
    let june: Period = "2025-06".parse().unwrap();
    let invoice = generate_invoice(&store, 1, june).unwrap();

    assert_eq!(invoice.status, InvoiceStatus::Draft);
    assert_eq!(invoice.details.len(), 1);
    let line = &invoice.details[0];
    assert_eq!(line.item_type, LineKind::Electric);
    assert_eq!(line.quantity, Decimal::from(30));
    assert_eq!(line.unit_price, Decimal::from(4000));
    assert_eq!(line.line_total, Decimal::from(120_000));
    assert_eq!(invoice.total, Decimal::from(120_000));
}

#[test]
fn mid_period_price_change_not_prorated() {
    let conn = setup();
    add_reading(&conn, "electric", "2025-05", "120");
    add_reading(&conn, "electric", "2025-06", "150");
    add_price(&conn, "electric", "4000", "2025-01-01", Some("2025-06-14"));
    add_price(&conn, "electric", "4200", "2025-06-15", None);

    let store = SqliteStore::new(&conn);
    let june: Period = "2025-06".parse().unwrap();
    let invoice = generate_invoice(&store, 1, june).unwrap();
    // Whole of June at the price effective on June 1.
    assert_eq!(invoice.details[0].unit_price, Decimal::from(4000));
    assert_eq!(invoice.total, Decimal::from(120_000));
}

#[test]
fn regeneration_is_idempotent() {
    let conn = setup();
    add_reading(&conn, "electric", "2025-05", "120");
    add_reading(&conn, "electric", "2025-06", "150");
    add_reading(&conn, "water", "2025-05", "30");
    add_reading(&conn, "water", "2025-06", "42");
    add_price(&conn, "electric", "4000", "2025-01-01", None);
    add_price(&conn, "water", "9500.50", "2025-01-01", None);
    conn.execute(
        "UPDATE contracts SET monthly_rent='3000000' WHERE id=1",
        [],
    )
    .unwrap();

    let store = SqliteStore::new(&conn);
    let june: Period = "2025-06".parse().unwrap();
    let a = generate_invoice(&store, 1, june).unwrap();
    let b = generate_invoice(&store, 1, june).unwrap();
    assert_eq!(a.details, b.details);
    assert_eq!(a.total, b.total);
}

#[test]
fn total_is_sum_of_line_totals() {
    let conn = setup();
    add_reading(&conn, "electric", "2025-05", "120");
    add_reading(&conn, "electric", "2025-06", "151");
    add_reading(&conn, "water", "2025-05", "30");
    add_reading(&conn, "water", "2025-06", "43");
    add_price(&conn, "electric", "3999.99", "2025-01-01", None);
    add_price(&conn, "water", "9500.505", "2025-01-01", None);
    conn.execute(
        "UPDATE contracts SET monthly_rent='2500000.25' WHERE id=1",
        [],
    )
    .unwrap();

    let store = SqliteStore::new(&conn);
    let june: Period = "2025-06".parse().unwrap();
    let invoice = generate_invoice(&store, 1, june).unwrap();
    let sum: Decimal = invoice.details.iter().map(|d| d.line_total).sum();
    assert_eq!(invoice.total, sum);
    // Each line is already rounded to the minor unit.
    for d in &invoice.details {
        assert_eq!(d.line_total, d.line_total.round_dp(2));
    }
}

#[test]
fn missing_period_reading_aborts_whole_invoice() {
    let conn = setup();
    add_reading(&conn, "electric", "2025-05", "120");
    add_reading(&conn, "electric", "2025-06", "150");
    // Water meter exists but June was never read.
    add_reading(&conn, "water", "2025-05", "30");
    add_price(&conn, "electric", "4000", "2025-01-01", None);
    add_price(&conn, "water", "9500", "2025-01-01", None);

    let store = SqliteStore::new(&conn);
    let june: Period = "2025-06".parse().unwrap();
    let err = generate_invoice(&store, 1, june).unwrap_err();
    assert!(matches!(err, BillingError::IncompleteBillingData { .. }));
}

#[test]
fn room_without_water_meter_skips_water_line() {
    let conn = setup();
    add_reading(&conn, "electric", "2025-05", "120");
    add_reading(&conn, "electric", "2025-06", "150");
    add_price(&conn, "electric", "4000", "2025-01-01", None);

    let store = SqliteStore::new(&conn);
    let june: Period = "2025-06".parse().unwrap();
    let invoice = generate_invoice(&store, 1, june).unwrap();
    assert!(
        invoice
            .details
            .iter()
            .all(|d| d.item_type != LineKind::Water)
    );
}

#[test]
fn rent_and_services_become_lines() {
    let conn = setup();
    conn.execute(
        "UPDATE contracts SET monthly_rent='3000000' WHERE id=1",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO services(name, kind) VALUES ('Internet', 'flat')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO services(name, kind, unit) VALUES ('Laundry', 'usage', 'load')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO contract_services(contract_id, service_id, quantity) VALUES (1, 1, '1')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO contract_services(contract_id, service_id, quantity) VALUES (1, 2, '1')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO price_history(item_type, service_id, unit_price, effective_from)
         VALUES ('service', 1, '200000', '2025-01-01')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO price_history(item_type, service_id, unit_price, effective_from)
         VALUES ('service', 2, '15000', '2025-01-01')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO service_usage(contract_id, service_id, period, quantity)
         VALUES (1, 2, '2025-06', '4')",
        [],
    )
    .unwrap();

    let store = SqliteStore::new(&conn);
    let june: Period = "2025-06".parse().unwrap();
    let invoice = generate_invoice(&store, 1, june).unwrap();

    // Rent first, then the two service lines; no meters exist for this room.
    assert_eq!(invoice.details.len(), 3);
    assert_eq!(invoice.details[0].item_type, LineKind::Rent);
    assert_eq!(invoice.details[0].line_total, Decimal::from(3_000_000));
    assert_eq!(invoice.details[1].description, "Internet");
    assert_eq!(invoice.details[1].line_total, Decimal::from(200_000));
    assert_eq!(invoice.details[2].description, "Laundry");
    assert_eq!(invoice.details[2].quantity, Decimal::from(4));
    assert_eq!(invoice.details[2].line_total, Decimal::from(60_000));
    assert_eq!(invoice.total, Decimal::from(3_260_000));
}

#[test]
fn usage_service_with_empty_month_is_omitted() {
    let conn = setup();
    conn.execute(
        "INSERT INTO services(name, kind, unit) VALUES ('Laundry', 'usage', 'load')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO contract_services(contract_id, service_id) VALUES (1, 1)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO price_history(item_type, service_id, unit_price, effective_from)
         VALUES ('service', 1, '15000', '2025-01-01')",
        [],
    )
    .unwrap();

    let store = SqliteStore::new(&conn);
    let june: Period = "2025-06".parse().unwrap();
    let invoice = generate_invoice(&store, 1, june).unwrap();
    assert!(invoice.details.is_empty());
    assert_eq!(invoice.total, Decimal::ZERO);
}

#[test]
fn inactive_contract_cannot_be_billed() {
    let conn = setup();
    conn.execute(
        "UPDATE contracts SET end_date='2025-03-31' WHERE id=1",
        [],
    )
    .unwrap();

    let store = SqliteStore::new(&conn);
    let june: Period = "2025-06".parse().unwrap();
    let err = generate_invoice(&store, 1, june).unwrap_err();
    assert!(matches!(err, BillingError::IncompleteBillingData { .. }));
}

#[test]
fn banker_rounding_on_fractional_line_totals() {
    let conn = setup();
    add_reading(&conn, "electric", "2025-05", "0");
    add_reading(&conn, "electric", "2025-06", "3");
    // 3 * 1.675 = 5.025 -> rounds to even: 5.02
    add_price(&conn, "electric", "1.675", "2025-01-01", None);

    let store = SqliteStore::new(&conn);
    let june: Period = "2025-06".parse().unwrap();
    let invoice = generate_invoice(&store, 1, june).unwrap();
    assert_eq!(invoice.details[0].line_total, Decimal::new(502, 2));
}
