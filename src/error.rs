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

//! Error types for the ledger engine, the record store, and the
//! credential service.

use thiserror::Error;

/// Failures of the record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Writing the collection file failed.
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The collection could not be encoded for persistence.
    #[error("storage encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Ledger operation outcomes that are not plain success.
///
/// `InsufficientFunds` and `DebtExceedsBalance` are validation rejections:
/// the operation mutated nothing. `Store` reports a failed persistence
/// write; the in-memory mutation has already been applied and is kept.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Outflow amount exceeds the current main balance.
    #[error("insufficient funds for outflow")]
    InsufficientFunds,

    /// Total uncleared debt exceeds the current main balance.
    #[error("insufficient funds to clear debt")]
    DebtExceedsBalance,

    /// The mutated collection could not be persisted; memory is ahead of
    /// disk until the next successful save.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Credential service errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// A user with this email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The user collection could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}
