// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rentledger::{cli, commands::readings};
use rusqlite::Connection;

fn base_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    rentledger::db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO properties(name) VALUES ('Main')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO rooms(property_id, name) VALUES (1, 'R101')",
        [],
    )
    .unwrap();
    conn
}

fn run_add(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["rentledger", "reading", "add"];
    argv.extend_from_slice(args);
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(argv);
    if let Some(("reading", sub)) = matches.subcommand() {
        readings::handle(conn, sub)
    } else {
        panic!("no reading subcommand");
    }
}

#[test]
fn add_defaults_reading_date_to_period_end() {
    let conn = base_conn();
    run_add(
        &conn,
        &[
            "--room", "R101", "--utility", "electric", "--period", "2025-06", "--value", "150",
        ],
    )
    .unwrap();

    let date: String = conn
        .query_row("SELECT reading_date FROM readings", [], |r| r.get(0))
        .unwrap();
    assert_eq!(date, "2025-06-30");
}

#[test]
fn decreasing_value_is_rejected_at_entry() {
    let conn = base_conn();
    run_add(
        &conn,
        &[
            "--room", "R101", "--utility", "electric", "--period", "2025-05", "--value", "120",
        ],
    )
    .unwrap();

    let err = run_add(
        &conn,
        &[
            "--room", "R101", "--utility", "electric", "--period", "2025-06", "--value", "90",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("--reset"));

    // With the reset flag the same value is accepted.
    run_add(
        &conn,
        &[
            "--room", "R101", "--utility", "electric", "--period", "2025-06", "--value", "90",
            "--reset",
        ],
    )
    .unwrap();
    let reset: bool = conn
        .query_row(
            "SELECT meter_reset FROM readings WHERE period='2025-06'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert!(reset);
}

#[test]
fn reentry_is_blocked_once_invoiced() {
    let conn = base_conn();
    run_add(
        &conn,
        &[
            "--room", "R101", "--utility", "electric", "--period", "2025-06", "--value", "150",
        ],
    )
    .unwrap();
    conn.execute("UPDATE readings SET invoiced=1", []).unwrap();

    let err = run_add(
        &conn,
        &[
            "--room", "R101", "--utility", "electric", "--period", "2025-06", "--value", "160",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("issued invoice"));

    let value: String = conn
        .query_row("SELECT value FROM readings", [], |r| r.get(0))
        .unwrap();
    assert_eq!(value, "150");
}
