// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rentledger::billing::Period;

#[test]
fn parse_and_bounds() {
    let p: Period = "2025-06".parse().unwrap();
    assert_eq!(p.start(), NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    assert_eq!(p.end(), NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
    assert_eq!(p.to_string(), "2025-06");
}

#[test]
fn leap_february() {
    let p: Period = "2024-02".parse().unwrap();
    assert_eq!(p.end(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
}

#[test]
fn year_rollover() {
    let p: Period = "2025-12".parse().unwrap();
    assert_eq!(p.next().to_string(), "2026-01");
    assert_eq!(p.next().prev(), p);
}

#[test]
fn rejects_bad_labels() {
    assert!("2025-13".parse::<Period>().is_err());
    assert!("2025-6".parse::<Period>().is_err());
    assert!("garbage".parse::<Period>().is_err());
}

#[test]
fn label_order_is_chronological() {
    let a: Period = "2025-09".parse().unwrap();
    let b: Period = "2025-10".parse().unwrap();
    assert!(a < b);
    assert!(a.to_string() < b.to_string());
}

#[test]
fn containing_maps_date_to_month() {
    let d = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    assert_eq!(Period::containing(d).to_string(), "2025-06");
}
