// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rentledger::{cli, commands::importer};
use rusqlite::Connection;
use std::io::Write;
use tempfile::NamedTempFile;

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

fn run_import(conn: &mut Connection, path: &str) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["rentledger", "import", "readings", "--path", path]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn imports_readings_with_defaults() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "room,utility,period,value,date,reset\n\
         R101,electric,2025-05,120,2025-05-31,\n\
         R101,electric,2025-06,150,,\n\
         R101,water,2025-06,42,2025-06-30,true"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM readings", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 3);

    // Missing date defaults to the period's last day.
    let date: String = conn
        .query_row(
            "SELECT reading_date FROM readings WHERE utility='electric' AND period='2025-06'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(date, "2025-06-30");

    let reset: bool = conn
        .query_row(
            "SELECT meter_reset FROM readings WHERE utility='water'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert!(reset);
}

#[test]
fn unknown_room_aborts_the_whole_file() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "room,utility,period,value,date,reset\n\
         R101,electric,2025-05,120,,\n\
         R999,electric,2025-05,80,,"
    )
    .unwrap();
    file.flush().unwrap();

    let err = run_import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("R999"));

    // Transactional: the valid first row must not have landed either.
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM readings", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn reimport_updates_rows_not_yet_invoiced() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "room,utility,period,value,date,reset\nR101,electric,2025-06,150,,"
    )
    .unwrap();
    file.flush().unwrap();
    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();

    let mut file2 = NamedTempFile::new().unwrap();
    writeln!(
        file2,
        "room,utility,period,value,date,reset\nR101,electric,2025-06,155,,"
    )
    .unwrap();
    file2.flush().unwrap();
    run_import(&mut conn, file2.path().to_str().unwrap()).unwrap();

    let (count, value): (i64, String) = conn
        .query_row(
            "SELECT COUNT(*), MAX(value) FROM readings WHERE period='2025-06'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(value, "155");
}
