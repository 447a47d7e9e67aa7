// Copyright (c) 2025 Rentledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod properties;
pub mod rooms;
pub mod tenants;
pub mod contracts;
pub mod services;
pub mod prices;
pub mod readings;
pub mod usage;
pub mod invoices;
pub mod importer;
pub mod exporter;
pub mod doctor;
