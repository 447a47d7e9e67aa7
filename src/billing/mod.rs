// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The billing core: price-history resolution, usage aggregation, and
//! invoice line generation. Pure computation over the store traits below;
//! no SQL in this module tree (see `crate::store` for the SQLite side).

pub mod error;
pub mod invoice;
pub mod period;
pub mod prices;
pub mod usage;

pub use error::BillingError;
pub use invoice::{BillingContext, SubscribedService, generate_invoice};
pub use period::Period;
pub use prices::resolve_price;
pub use usage::{aggregate_service, aggregate_utility};

use crate::models::{BillableItem, PriceRecord, ServiceUsageEvent, UsageReading, UtilityKind};
use anyhow::Result;

/// Read access to price history for one billable item.
pub trait PriceStore {
    /// All price records for the item, ascending by `effective_from`.
    fn list_price_records(&self, item: &BillableItem) -> Result<Vec<PriceRecord>>;
}

/// Read access to meter readings and service-usage events.
pub trait ReadingStore {
    fn reading_for_period(
        &self,
        room_id: i64,
        utility: UtilityKind,
        period: Period,
    ) -> Result<Option<UsageReading>>;

    /// Latest reading with a period strictly before `period`.
    fn latest_reading_before(
        &self,
        room_id: i64,
        utility: UtilityKind,
        period: Period,
    ) -> Result<Option<UsageReading>>;

    /// Whether any reading exists at all for this room+utility, i.e. a
    /// meter is installed.
    fn has_meter(&self, room_id: i64, utility: UtilityKind) -> Result<bool>;

    fn list_service_usage(
        &self,
        contract_id: i64,
        service_id: i64,
        period: Period,
    ) -> Result<Vec<ServiceUsageEvent>>;
}

/// Resolution of a contract into what it gets billed for.
pub trait ContractStore {
    /// The contract's room, rent, and subscribed services, if the contract
    /// is active during `period`.
    fn billing_context(&self, contract_id: i64, period: Period)
    -> Result<Option<BillingContext>>;
}
