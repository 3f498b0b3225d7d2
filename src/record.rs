// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Ledger record types and id allocation.
//!
//! Three record kinds make up the ledger:
//! - [`CashFlow`]: one movement of cash into or out of the main balance
//! - [`Debt`]: an outstanding obligation owed to the user
//! - [`Transaction`]: a free-form ledger line with no balance effect
//!
//! Each kind lives in its own collection with its own id sequence; ids are
//! not unique across kinds.

use crate::base::{RecordId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A record carrying a collection-scoped id.
pub trait Keyed {
    fn key(&self) -> u32;
}

/// Returns the next free id for a collection: `max(id) + 1`, or `1` when
/// the collection is empty. Deleted ids are never reused.
///
/// Pure function. Callers must hold the collection's lock across the
/// allocation and the subsequent append so two adds cannot observe the
/// same maximum.
pub fn next_id<T: Keyed>(records: &[T]) -> RecordId {
    RecordId(records.iter().map(Keyed::key).max().map_or(1, |max| max + 1))
}

/// One movement of cash into or out of the main balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    pub id: RecordId,
    pub user_id: UserId,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    /// Source of an inflow, or spending category of an outflow.
    pub category: String,
    pub description: String,
    /// Partitions the collection into inflows and outflows.
    pub is_inflow: bool,
}

impl Keyed for CashFlow {
    fn key(&self) -> u32 {
        self.id.0
    }
}

/// An outstanding obligation owed to the user.
///
/// While uncleared, the debt amount counts toward the main balance as
/// expected liquidity. `paid_amount` is informational only and is never
/// reconciled against `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub id: RecordId,
    pub user_id: UserId,
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub date: DateTime<Utc>,
    pub description: String,
    pub is_cleared: bool,
}

impl Keyed for Debt {
    fn key(&self) -> u32 {
        self.id.0
    }
}

/// A free-form ledger line.
///
/// Pure bookkeeping data; transactions do not participate in balance
/// computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    pub user_id: UserId,
    pub amount: Decimal,
    pub debit: Decimal,
    pub credit: Decimal,
    pub date: DateTime<Utc>,
    pub description: String,
    /// Free-text classification, e.g. "transfer" or "adjustment".
    pub kind: String,
}

impl Keyed for Transaction {
    fn key(&self) -> u32 {
        self.id.0
    }
}
