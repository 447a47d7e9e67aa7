// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rentledger::billing::{BillingError, Period, resolve_price};
use rentledger::models::{BillableItem, UtilityKind};
use rentledger::store::SqliteStore;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    rentledger::db::init_schema(&mut conn).unwrap();
    conn
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
fn resolves_record_covering_the_period() {
    let conn = setup();
    add_price(&conn, "electric", "4000", "2025-01-01", None);

    let store = SqliteStore::new(&conn);
    let period: Period = "2025-06".parse().unwrap();
    let price = resolve_price(
        &store,
        &BillableItem::Utility(UtilityKind::Electric),
        period.start(),
        period.end(),
    )
    .unwrap();
    assert_eq!(price, Decimal::from(4000));
}

#[test]
fn monotonic_lookup_across_many_records() {
    let conn = setup();
    add_price(&conn, "electric", "3500", "2024-01-01", Some("2024-12-31"));
    add_price(&conn, "electric", "4000", "2025-01-01", Some("2025-05-31"));
    add_price(&conn, "electric", "4200", "2025-06-01", None);

    let store = SqliteStore::new(&conn);
    let item = BillableItem::Utility(UtilityKind::Electric);

    let march: Period = "2024-03".parse().unwrap();
    let feb: Period = "2025-02".parse().unwrap();
    let july: Period = "2025-07".parse().unwrap();
    assert_eq!(
        resolve_price(&store, &item, march.start(), march.end()).unwrap(),
        Decimal::from(3500)
    );
    assert_eq!(
        resolve_price(&store, &item, feb.start(), feb.end()).unwrap(),
        Decimal::from(4000)
    );
    assert_eq!(
        resolve_price(&store, &item, july.start(), july.end()).unwrap(),
        Decimal::from(4200)
    );
}

#[test]
fn mid_period_change_bills_at_period_start_price() {
    let conn = setup();
    add_price(&conn, "electric", "4000", "2025-01-01", Some("2025-06-14"));
    add_price(&conn, "electric", "4200", "2025-06-15", None);

    let store = SqliteStore::new(&conn);
    let june: Period = "2025-06".parse().unwrap();
    let price = resolve_price(
        &store,
        &BillableItem::Utility(UtilityKind::Electric),
        june.start(),
        june.end(),
    )
    .unwrap();
    // No pro-rating: the price in effect on June 1 covers all of June.
    assert_eq!(price, Decimal::from(4000));
}

#[test]
fn errors_when_item_never_priced_before_period() {
    let conn = setup();
    add_price(&conn, "electric", "4000", "2025-07-01", None);

    let store = SqliteStore::new(&conn);
    let june: Period = "2025-06".parse().unwrap();
    let err = resolve_price(
        &store,
        &BillableItem::Utility(UtilityKind::Electric),
        june.start(),
        june.end(),
    )
    .unwrap_err();
    assert!(matches!(err, BillingError::PriceNotFound { .. }));
}

#[test]
fn errors_when_price_expired_before_period() {
    let conn = setup();
    add_price(&conn, "water", "9000", "2024-01-01", Some("2024-12-31"));

    let store = SqliteStore::new(&conn);
    let june: Period = "2025-06".parse().unwrap();
    let err = resolve_price(
        &store,
        &BillableItem::Utility(UtilityKind::Water),
        june.start(),
        june.end(),
    )
    .unwrap_err();
    assert!(matches!(err, BillingError::PriceNotFound { .. }));
}

#[test]
fn utility_prices_do_not_leak_across_items() {
    let conn = setup();
    add_price(&conn, "electric", "4000", "2025-01-01", None);
    conn.execute(
        "INSERT INTO services(name, kind) VALUES ('Internet', 'flat')",
        [],
    )
    .unwrap();
    let service_id: i64 = conn
        .query_row("SELECT id FROM services WHERE name='Internet'", [], |r| {
            r.get(0)
        })
        .unwrap();
    conn.execute(
        "INSERT INTO price_history(item_type, service_id, unit_price, effective_from)
         VALUES ('service', ?1, '100000', '2025-01-01')",
        params![service_id],
    )
    .unwrap();

    let store = SqliteStore::new(&conn);
    let june: Period = "2025-06".parse().unwrap();
    assert_eq!(
        resolve_price(
            &store,
            &BillableItem::Utility(UtilityKind::Electric),
            june.start(),
            june.end()
        )
        .unwrap(),
        Decimal::from(4000)
    );
    assert_eq!(
        resolve_price(
            &store,
            &BillableItem::Service {
                id: service_id,
                name: "Internet".into()
            },
            june.start(),
            june.end()
        )
        .unwrap(),
        Decimal::from(100000)
    );
}

#[test]
fn price_set_command_closes_previous_open_record() {
    let conn = setup();
    let cli = rentledger::cli::build_cli();
    let matches = cli.get_matches_from([
        "rentledger",
        "price",
        "set",
        "--item",
        "electric",
        "--price",
        "4000",
        "--from",
        "2025-01-01",
    ]);
    if let Some(("price", sub)) = matches.subcommand() {
        rentledger::commands::prices::handle(&conn, sub).unwrap();
    } else {
        panic!("no price subcommand");
    }

    let cli = rentledger::cli::build_cli();
    let matches = cli.get_matches_from([
        "rentledger",
        "price",
        "set",
        "--item",
        "electric",
        "--price",
        "4200",
        "--from",
        "2025-06-15",
    ]);
    if let Some(("price", sub)) = matches.subcommand() {
        rentledger::commands::prices::handle(&conn, sub).unwrap();
    }

    let (to, count): (String, i64) = conn
        .query_row(
            "SELECT COALESCE((SELECT effective_to FROM price_history
                              WHERE unit_price='4000'), ''),
                    (SELECT COUNT(*) FROM price_history)",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(to, "2025-06-14");
    assert_eq!(count, 2);
}
