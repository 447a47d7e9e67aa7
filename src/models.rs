// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::billing::period::Period;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub property_id: i64,
    pub name: String,
    pub floor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: i64,
    pub room_id: i64,
    pub tenant_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub monthly_rent: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Flat,
    Usage,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Flat => "flat",
            ServiceKind::Usage => "usage",
        }
    }
}

impl FromStr for ServiceKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(ServiceKind::Flat),
            "usage" => Ok(ServiceKind::Usage),
            other => Err(anyhow::anyhow!(
                "Invalid service kind '{}', expected flat|usage",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub kind: ServiceKind,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilityKind {
    Electric,
    Water,
}

impl UtilityKind {
    pub const ALL: [UtilityKind; 2] = [UtilityKind::Electric, UtilityKind::Water];

    pub fn as_str(&self) -> &'static str {
        match self {
            UtilityKind::Electric => "electric",
            UtilityKind::Water => "water",
        }
    }
}

impl fmt::Display for UtilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UtilityKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "electric" => Ok(UtilityKind::Electric),
            "water" => Ok(UtilityKind::Water),
            other => Err(anyhow::anyhow!(
                "Invalid utility '{}', expected electric|water",
                other
            )),
        }
    }
}

/// An item a price record can attach to: a metered utility or a named service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillableItem {
    Utility(UtilityKind),
    Service { id: i64, name: String },
}

impl BillableItem {
    pub fn item_type(&self) -> &'static str {
        match self {
            BillableItem::Utility(u) => u.as_str(),
            BillableItem::Service { .. } => "service",
        }
    }

    pub fn service_id(&self) -> Option<i64> {
        match self {
            BillableItem::Utility(_) => None,
            BillableItem::Service { id, .. } => Some(*id),
        }
    }
}

impl fmt::Display for BillableItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillableItem::Utility(u) => f.write_str(u.as_str()),
            BillableItem::Service { name, .. } => write!(f, "service '{}'", name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    pub id: i64,
    pub item: BillableItem,
    pub unit_price: Decimal,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageReading {
    pub id: i64,
    pub room_id: i64,
    pub utility: UtilityKind,
    pub period: Period,
    pub value: Decimal,
    pub reading_date: NaiveDate,
    pub meter_reset: bool,
    pub invoiced: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceUsageEvent {
    pub id: i64,
    pub contract_id: i64,
    pub service_id: i64,
    pub period: Period,
    pub quantity: Decimal,
    pub invoiced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Issued,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Issued => "issued",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(InvoiceStatus::Draft),
            "issued" => Ok(InvoiceStatus::Issued),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            other => Err(anyhow::anyhow!("Invalid invoice status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Rent,
    Electric,
    Water,
    Service,
}

impl LineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Rent => "rent",
            LineKind::Electric => "electric",
            LineKind::Water => "water",
            LineKind::Service => "service",
        }
    }
}

impl FromStr for LineKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rent" => Ok(LineKind::Rent),
            "electric" => Ok(LineKind::Electric),
            "water" => Ok(LineKind::Water),
            "service" => Ok(LineKind::Service),
            other => Err(anyhow::anyhow!("Invalid line kind '{}'", other)),
        }
    }
}

impl From<UtilityKind> for LineKind {
    fn from(u: UtilityKind) -> Self {
        match u {
            UtilityKind::Electric => LineKind::Electric,
            UtilityKind::Water => LineKind::Water,
        }
    }
}

/// One billed line; derived by the generator, never authored directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub item_type: LineKind,
    pub service_id: Option<i64>,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub contract_id: i64,
    pub period: Period,
    pub status: InvoiceStatus,
    pub total: Decimal,
    pub due_date: Option<NaiveDate>,
    pub details: Vec<InvoiceDetail>,
}
