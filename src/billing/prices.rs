// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::billing::{BillingError, PriceStore};
use crate::models::BillableItem;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Resolve the unit price in effect for `item` over `[period_start, period_end]`.
///
/// Policy: the record in effect on `period_start` governs the whole period.
/// A price change mid-period is not pro-rated; the new price first applies
/// to the following billing period.
pub fn resolve_price<S: PriceStore>(
    store: &S,
    item: &BillableItem,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Result<Decimal, BillingError> {
    debug_assert!(period_start <= period_end);

    let records = store.list_price_records(item)?;
    // Records are ascending by effective_from and never overlap, so the
    // last one starting at-or-before period_start is the candidate.
    let candidate = records
        .iter()
        .rev()
        .find(|r| r.effective_from <= period_start);

    match candidate {
        Some(r) if r.effective_to.is_none_or(|to| to >= period_start) => Ok(r.unit_price),
        _ => Err(BillingError::PriceNotFound {
            item: item.clone(),
            period_start,
        }),
    }
}
