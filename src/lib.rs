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

//! # Cashbook
//!
//! A personal ledger: cash inflows and outflows, debts, and free-form
//! transactions for one or more users, persisted as JSON collections with a
//! derived running balance.
//!
//! ## Core Components
//!
//! - [`Ledger`]: the accounting engine enforcing the bookkeeping rules
//! - [`RecordStore`]: persistence seam, with [`JsonStore`] and
//!   [`MemoryStore`] implementations
//! - [`CashFlow`], [`Debt`], [`Transaction`]: the record kinds
//! - [`AuthenticationProvider`]: credential capability, implemented by
//!   [`UserDirectory`]
//!
//! ## Example
//!
//! ```
//! use cashbook::{CashFlow, Ledger, MemoryStore, RecordId, UserId};
//! use rust_decimal_macros::dec;
//!
//! let ledger = Ledger::new(MemoryStore::new());
//!
//! ledger.add_cash_inflow(CashFlow {
//!     id: RecordId(0), // assigned by the engine
//!     user_id: UserId(1),
//!     amount: dec!(100.00),
//!     date: chrono::Utc::now(),
//!     category: "Salary".to_string(),
//!     description: String::new(),
//!     is_inflow: true,
//! }).unwrap();
//!
//! assert_eq!(ledger.main_balance(), dec!(100.00));
//! ```
//!
//! ## Balance Policy
//!
//! The main balance is `inflows - outflows + uncleared debt`: an uncleared
//! debt is money owed *to* the user and counts as expected liquidity. An
//! outflow larger than the balance, or a debt-clear while total debt
//! exceeds the balance, is rejected without mutating anything.

pub mod auth;
pub mod base;
pub mod engine;
pub mod error;
pub mod record;
pub mod store;

pub use auth::{AuthenticationProvider, User, UserDirectory};
pub use base::{RecordId, UserId};
pub use engine::Ledger;
pub use error::{AuthError, LedgerError, StoreError};
pub use record::{CashFlow, Debt, Keyed, Transaction, next_id};
pub use store::{JsonStore, MemoryStore, RecordKind, RecordStore, StoreConfig};
