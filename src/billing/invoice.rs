// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::billing::{
    BillingError, ContractStore, Period, PriceStore, ReadingStore, aggregate_service,
    aggregate_utility, resolve_price,
};
use crate::models::{
    BillableItem, Invoice, InvoiceDetail, InvoiceStatus, LineKind, ServiceKind, UtilityKind,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// What a contract gets billed for in a period: its room, rent, and
/// subscribed services. Produced by a `ContractStore`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingContext {
    pub contract_id: i64,
    pub room_id: i64,
    pub room_name: String,
    pub monthly_rent: Decimal,
    pub services: Vec<SubscribedService>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribedService {
    pub service_id: i64,
    pub name: String,
    pub kind: ServiceKind,
    pub quantity: Decimal,
}

/// Line totals round to the currency's minor unit with banker's rounding.
/// The policy is fixed so regenerating a draft from the same snapshot is
/// byte-for-byte idempotent.
fn round_line(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Generate a draft invoice for one contract and period.
///
/// Lines are produced in a fixed order: rent, electricity, water, then
/// services in subscription order. Any missing required reading aborts the
/// whole generation; a partial bill is worse than a delayed one. The
/// returned invoice has id 0 until persisted.
pub fn generate_invoice<S>(
    store: &S,
    contract_id: i64,
    period: Period,
) -> Result<Invoice, BillingError>
where
    S: PriceStore + ReadingStore + ContractStore,
{
    let ctx = store
        .billing_context(contract_id, period)?
        .ok_or_else(|| BillingError::IncompleteBillingData {
            period,
            detail: format!("contract {} is not active during {}", contract_id, period),
        })?;

    let mut details: Vec<InvoiceDetail> = Vec::new();

    if ctx.monthly_rent > Decimal::ZERO {
        details.push(InvoiceDetail {
            item_type: LineKind::Rent,
            service_id: None,
            description: format!("Room rent ({})", ctx.room_name),
            quantity: Decimal::ONE,
            unit_price: ctx.monthly_rent,
            line_total: round_line(ctx.monthly_rent),
        });
    }

    for utility in UtilityKind::ALL {
        // No reading rows at all means no meter for this utility; skip
        // rather than demand a reading that can never exist.
        if !store.has_meter(ctx.room_id, utility)? {
            continue;
        }
        let quantity = aggregate_utility(store, ctx.room_id, utility, period)?;
        let item = BillableItem::Utility(utility);
        let unit_price = resolve_price(store, &item, period.start(), period.end())?;
        details.push(InvoiceDetail {
            item_type: utility.into(),
            service_id: None,
            description: match utility {
                UtilityKind::Electric => "Electricity".to_string(),
                UtilityKind::Water => "Water".to_string(),
            },
            quantity,
            unit_price,
            line_total: round_line(quantity * unit_price),
        });
    }

    for svc in &ctx.services {
        let quantity = aggregate_service(
            store,
            ctx.contract_id,
            svc.service_id,
            svc.kind,
            svc.quantity,
            period,
        )?;
        if quantity.is_zero() {
            continue;
        }
        let item = BillableItem::Service {
            id: svc.service_id,
            name: svc.name.clone(),
        };
        let unit_price = resolve_price(store, &item, period.start(), period.end())?;
        details.push(InvoiceDetail {
            item_type: LineKind::Service,
            service_id: Some(svc.service_id),
            description: svc.name.clone(),
            quantity,
            unit_price,
            line_total: round_line(quantity * unit_price),
        });
    }

    let total: Decimal = details.iter().map(|d| d.line_total).sum();

    Ok(Invoice {
        id: 0,
        contract_id: ctx.contract_id,
        period,
        status: InvoiceStatus::Draft,
        total,
        due_date: None,
        details,
    })
}
