// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::billing::{BillingError, Period, ReadingStore};
use crate::models::{ServiceKind, UtilityKind};
use rust_decimal::Decimal;

/// Metered consumption for one room+utility in a period: the delta between
/// the period's reading and the latest earlier one.
///
/// A reading flagged `meter_reset` bills its own value (the counter
/// restarted at zero); the flag also serves as the explicit baseline for a
/// room's first billed cycle. Without the flag, a missing earlier reading
/// is an error rather than an implicit zero, so data-entry gaps surface
/// instead of producing a silently inflated bill.
pub fn aggregate_utility<S: ReadingStore>(
    store: &S,
    room_id: i64,
    utility: UtilityKind,
    period: Period,
) -> Result<Decimal, BillingError> {
    let current = store
        .reading_for_period(room_id, utility, period)?
        .ok_or_else(|| BillingError::IncompleteBillingData {
            period,
            detail: format!("room {} has no {} reading for {}", room_id, utility, period),
        })?;

    if current.meter_reset {
        return Ok(current.value);
    }

    let previous = store
        .latest_reading_before(room_id, utility, period)?
        .ok_or(BillingError::MissingBaselineReading {
            room_id,
            utility,
            period,
        })?;

    let delta = current.value - previous.value;
    if delta < Decimal::ZERO {
        return Err(BillingError::NegativeUsage {
            room_id,
            utility,
            period,
            previous: previous.value,
            current: current.value,
        });
    }
    Ok(delta)
}

/// Billable quantity of one subscribed service for a period.
///
/// Flat services bill the subscription quantity as-is. Usage services sum
/// their recorded events; an empty month sums to zero and the generator
/// omits the line.
pub fn aggregate_service<S: ReadingStore>(
    store: &S,
    contract_id: i64,
    service_id: i64,
    kind: ServiceKind,
    subscribed_quantity: Decimal,
    period: Period,
) -> Result<Decimal, BillingError> {
    match kind {
        ServiceKind::Flat => Ok(subscribed_quantity),
        ServiceKind::Usage => {
            let events = store.list_service_usage(contract_id, service_id, period)?;
            Ok(events.iter().map(|e| e.quantity).sum())
        }
    }
}
