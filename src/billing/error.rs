// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::billing::period::Period;
use crate::models::{BillableItem, InvoiceStatus, UtilityKind};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Failures of the billing computation. All are recoverable by the caller:
/// a batch run catches per-contract errors and keeps going.
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("no price for {item} in effect on {period_start}")]
    PriceNotFound {
        item: BillableItem,
        period_start: NaiveDate,
    },

    #[error("no baseline {utility} reading for room {room_id} before {period}")]
    MissingBaselineReading {
        room_id: i64,
        utility: UtilityKind,
        period: Period,
    },

    #[error(
        "negative {utility} usage for room {room_id} in {period}: \
         current {current} < previous {previous} and no meter reset recorded"
    )]
    NegativeUsage {
        room_id: i64,
        utility: UtilityKind,
        period: Period,
        previous: Decimal,
        current: Decimal,
    },

    #[error("incomplete billing data for {period}: {detail}")]
    IncompleteBillingData { period: Period, detail: String },

    #[error("invoice for contract {contract_id} period {period} is already {status}")]
    InvoiceConflict {
        contract_id: i64,
        period: Period,
        status: InvoiceStatus,
    },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
