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

//! Ledger accounting engine.
//!
//! The [`Ledger`] owns the three record collections and enforces the
//! bookkeeping rules that govern them:
//!
//! - **Cash flows** move money into or out of the main balance; an outflow
//!   that exceeds the balance is rejected before anything is mutated.
//! - **Debts** are obligations owed to the user. While uncleared they count
//!   toward the main balance as expected liquidity; clearing all of a
//!   user's debts requires the balance to cover the total outstanding debt
//!   across every user.
//! - **Transactions** are plain bookkeeping lines with no balance effect.
//!
//! Every mutating operation assigns ids, applies the change in memory, and
//! persists the full owning collection through the [`RecordStore`] before
//! returning.
//!
//! # Thread Safety
//!
//! Each collection sits behind its own [`Mutex`], so the precondition
//! check, the mutation, and the persistence write of one operation form a
//! single critical section. Operations that need more than one collection
//! always lock in the order cash flows → debts → transactions.

use crate::base::{RecordId, UserId};
use crate::error::LedgerError;
use crate::record::{CashFlow, Debt, Transaction, next_id};
use crate::store::{RecordKind, RecordStore};
use parking_lot::Mutex;
use rust_decimal::Decimal;

/// Ledger engine over a record store.
///
/// Collections are loaded once at construction and mirrored back to the
/// store after every mutation.
///
/// # Invariants
///
/// - Ids within one collection are unique, assigned `max + 1`, never reused.
/// - A rejected operation leaves all collections untouched.
/// - On a failed save the in-memory mutation is kept and the error is
///   returned; memory stays ahead of disk until the next successful save.
pub struct Ledger<S: RecordStore> {
    store: S,
    cash_flows: Mutex<Vec<CashFlow>>,
    debts: Mutex<Vec<Debt>>,
    transactions: Mutex<Vec<Transaction>>,
}

/// Sum of uncleared debt amounts.
fn outstanding(debts: &[Debt]) -> Decimal {
    debts
        .iter()
        .filter(|d| !d.is_cleared)
        .map(|d| d.amount)
        .sum()
}

/// Main balance: inflows minus outflows, plus uncleared debt.
///
/// Uncleared debt is money the user expects to receive and is counted as
/// spendable. This is the ledger's policy, not an accounting identity.
fn balance(cash_flows: &[CashFlow], debts: &[Debt]) -> Decimal {
    let inflow: Decimal = cash_flows
        .iter()
        .filter(|f| f.is_inflow)
        .map(|f| f.amount)
        .sum();
    let outflow: Decimal = cash_flows
        .iter()
        .filter(|f| !f.is_inflow)
        .map(|f| f.amount)
        .sum();
    inflow - outflow + outstanding(debts)
}

impl<S: RecordStore> Ledger<S> {
    /// Creates an engine over `store`, loading all three collections.
    ///
    /// Missing or corrupt collections start empty; construction never
    /// fails.
    pub fn new(store: S) -> Self {
        let cash_flows = store.load(RecordKind::CashFlows);
        let debts = store.load(RecordKind::Debts);
        let transactions = store.load(RecordKind::Transactions);

        Ledger {
            store,
            cash_flows: Mutex::new(cash_flows),
            debts: Mutex::new(debts),
            transactions: Mutex::new(transactions),
        }
    }

    fn persist<T: serde::Serialize>(
        &self,
        kind: RecordKind,
        records: &[T],
    ) -> Result<(), LedgerError> {
        self.store.save(kind, records).map_err(|e| {
            tracing::error!(%kind, error = %e, "save failed, in-memory state is ahead of disk");
            LedgerError::Store(e)
        })
    }

    // === Derived state ===

    /// Current main balance across all users.
    pub fn main_balance(&self) -> Decimal {
        let cash_flows = self.cash_flows.lock();
        let debts = self.debts.lock();
        balance(&cash_flows, &debts)
    }

    /// Total uncleared debt across all users.
    pub fn total_debt(&self) -> Decimal {
        outstanding(&self.debts.lock())
    }

    // === Cash flows ===

    /// Records a cash inflow. The entry's id and `is_inflow` flag are
    /// overwritten; everything else is stored as given.
    pub fn add_cash_inflow(&self, mut entry: CashFlow) -> Result<RecordId, LedgerError> {
        let mut cash_flows = self.cash_flows.lock();

        let id = next_id(&cash_flows);
        entry.id = id;
        entry.is_inflow = true;
        cash_flows.push(entry);

        self.persist(RecordKind::CashFlows, &cash_flows)?;
        Ok(id)
    }

    /// Records a cash outflow.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InsufficientFunds`] when the amount exceeds the
    /// current main balance; nothing is mutated in that case.
    pub fn add_cash_outflow(&self, mut entry: CashFlow) -> Result<RecordId, LedgerError> {
        let mut cash_flows = self.cash_flows.lock();
        let debts = self.debts.lock();

        if balance(&cash_flows, &debts) < entry.amount {
            return Err(LedgerError::InsufficientFunds);
        }

        let id = next_id(&cash_flows);
        entry.id = id;
        entry.is_inflow = false;
        cash_flows.push(entry);

        self.persist(RecordKind::CashFlows, &cash_flows)?;
        Ok(id)
    }

    /// Overwrites amount, date, category, and direction of the cash flow
    /// matching the given entry's id. Unknown ids are a no-op.
    pub fn update_cash_flow(&self, updated: CashFlow) -> Result<(), LedgerError> {
        let mut cash_flows = self.cash_flows.lock();

        let Some(entry) = cash_flows.iter_mut().find(|f| f.id == updated.id) else {
            return Ok(());
        };
        entry.amount = updated.amount;
        entry.date = updated.date;
        entry.category = updated.category;
        entry.is_inflow = updated.is_inflow;

        self.persist(RecordKind::CashFlows, &cash_flows)
    }

    /// Removes the cash flow with the given id. Unknown ids are a no-op.
    pub fn delete_cash_flow(&self, id: RecordId) -> Result<(), LedgerError> {
        let mut cash_flows = self.cash_flows.lock();

        let Some(pos) = cash_flows.iter().position(|f| f.id == id) else {
            return Ok(());
        };
        cash_flows.remove(pos);

        self.persist(RecordKind::CashFlows, &cash_flows)
    }

    /// Snapshot of all inflow entries.
    pub fn cash_inflows(&self) -> Vec<CashFlow> {
        self.cash_flows
            .lock()
            .iter()
            .filter(|f| f.is_inflow)
            .cloned()
            .collect()
    }

    /// Snapshot of all outflow entries.
    pub fn cash_outflows(&self) -> Vec<CashFlow> {
        self.cash_flows
            .lock()
            .iter()
            .filter(|f| !f.is_inflow)
            .cloned()
            .collect()
    }

    // === Debts ===

    /// Records a debt. No validation beyond id assignment.
    pub fn add_debt(&self, mut entry: Debt) -> Result<RecordId, LedgerError> {
        let mut debts = self.debts.lock();

        let id = next_id(&debts);
        entry.id = id;
        debts.push(entry);

        self.persist(RecordKind::Debts, &debts)?;
        Ok(id)
    }

    /// Clears every debt belonging to `user`.
    ///
    /// The precondition compares the main balance against the total
    /// outstanding debt of *all* users, not just `user`'s.
    ///
    /// # Errors
    ///
    /// [`LedgerError::DebtExceedsBalance`] when the balance does not cover
    /// the total; nothing is mutated in that case.
    pub fn clear_debts(&self, user: UserId) -> Result<(), LedgerError> {
        let cash_flows = self.cash_flows.lock();
        let mut debts = self.debts.lock();

        if balance(&cash_flows, &debts) < outstanding(&debts) {
            return Err(LedgerError::DebtExceedsBalance);
        }

        for debt in debts.iter_mut().filter(|d| d.user_id == user) {
            debt.is_cleared = true;
        }

        self.persist(RecordKind::Debts, &debts)
    }

    /// Clears a single debt by id.
    ///
    /// Idempotent: an unknown id or an already-cleared debt is a logged
    /// no-op and neither state nor file changes.
    pub fn clear_debt(&self, id: RecordId) -> Result<(), LedgerError> {
        let mut debts = self.debts.lock();

        let Some(debt) = debts.iter_mut().find(|d| d.id == id) else {
            tracing::warn!(%id, "debt not found, nothing to clear");
            return Ok(());
        };
        if debt.is_cleared {
            tracing::warn!(%id, "debt already cleared");
            return Ok(());
        }
        debt.is_cleared = true;

        self.persist(RecordKind::Debts, &debts)
    }

    /// Overwrites amount, paid amount, date, description, and cleared flag
    /// of the debt matching the given entry's id. Unknown ids are a no-op.
    pub fn update_debt(&self, updated: Debt) -> Result<(), LedgerError> {
        let mut debts = self.debts.lock();

        let Some(entry) = debts.iter_mut().find(|d| d.id == updated.id) else {
            return Ok(());
        };
        entry.amount = updated.amount;
        entry.paid_amount = updated.paid_amount;
        entry.date = updated.date;
        entry.description = updated.description;
        entry.is_cleared = updated.is_cleared;

        self.persist(RecordKind::Debts, &debts)
    }

    /// Removes the debt with the given id. Unknown ids are a no-op.
    pub fn delete_debt(&self, id: RecordId) -> Result<(), LedgerError> {
        let mut debts = self.debts.lock();

        let Some(pos) = debts.iter().position(|d| d.id == id) else {
            return Ok(());
        };
        debts.remove(pos);

        self.persist(RecordKind::Debts, &debts)
    }

    /// Snapshot of all debts, cleared and uncleared.
    pub fn debts(&self) -> Vec<Debt> {
        self.debts.lock().clone()
    }

    // === Transactions ===

    /// Records a transaction. Pure bookkeeping; the main balance is not
    /// affected.
    pub fn add_transaction(&self, mut entry: Transaction) -> Result<RecordId, LedgerError> {
        let mut transactions = self.transactions.lock();

        let id = next_id(&transactions);
        entry.id = id;
        transactions.push(entry);

        self.persist(RecordKind::Transactions, &transactions)?;
        Ok(id)
    }

    /// Overwrites all bookkeeping fields of the transaction matching the
    /// given entry's id. Unknown ids are a no-op.
    pub fn update_transaction(&self, updated: Transaction) -> Result<(), LedgerError> {
        let mut transactions = self.transactions.lock();

        let Some(entry) = transactions.iter_mut().find(|t| t.id == updated.id) else {
            return Ok(());
        };
        entry.amount = updated.amount;
        entry.debit = updated.debit;
        entry.credit = updated.credit;
        entry.date = updated.date;
        entry.description = updated.description;
        entry.kind = updated.kind;

        self.persist(RecordKind::Transactions, &transactions)
    }

    /// Removes the transaction with the given id. Unknown ids are a no-op.
    pub fn delete_transaction(&self, id: RecordId) -> Result<(), LedgerError> {
        let mut transactions = self.transactions.lock();

        let Some(pos) = transactions.iter().position(|t| t.id == id) else {
            return Ok(());
        };
        transactions.remove(pos);

        self.persist(RecordKind::Transactions, &transactions)
    }

    /// Snapshot of all transactions.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.lock().clone()
    }
}
