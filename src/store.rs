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

//! Record store adapter.
//!
//! The engine persists each collection as a whole after every mutation
//! through the [`RecordStore`] trait. Two implementations are provided:
//! [`JsonStore`] writes one pretty-printed JSON file per collection under a
//! configured directory, [`MemoryStore`] keeps everything in memory for
//! tests and demos.
//!
//! # Degradation policy
//!
//! `load` never fails: a missing file is an empty collection, and a file
//! that cannot be read or parsed is logged and treated as empty. `save`
//! returns a [`StoreError`] so callers can react to a persistence failure;
//! it never leaves a half-written file behind.

use crate::error::StoreError;
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The persisted collections, one file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    CashFlows,
    Debts,
    Transactions,
    Users,
}

impl RecordKind {
    /// File name of the collection inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            RecordKind::CashFlows => "cashflows.json",
            RecordKind::Debts => "debts.json",
            RecordKind::Transactions => "transactions.json",
            RecordKind::Users => "users.json",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Storage abstraction consumed by the engine and the credential service.
///
/// `save` overwrites the prior content with the full collection; the store
/// is a mirror of the in-memory state, not an append log.
pub trait RecordStore {
    /// Loads a collection, degrading to empty on missing or corrupt data.
    fn load<T: DeserializeOwned>(&self, kind: RecordKind) -> Vec<T>;

    /// Persists the full collection, replacing prior content.
    fn save<T: Serialize>(&self, kind: RecordKind, records: &[T]) -> Result<(), StoreError>;
}

impl<S: RecordStore> RecordStore for &S {
    fn load<T: DeserializeOwned>(&self, kind: RecordKind) -> Vec<T> {
        (**self).load(kind)
    }

    fn save<T: Serialize>(&self, kind: RecordKind, records: &[T]) -> Result<(), StoreError> {
        (**self).save(kind, records)
    }
}

/// Storage location configuration.
///
/// Passed explicitly into [`JsonStore::open`]; there is no process-wide
/// storage path.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the collection files. Created on open.
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/cashbook"),
        }
    }
}

/// File-backed store: one JSON document per collection.
#[derive(Debug)]
pub struct JsonStore {
    config: StoreConfig,
}

impl JsonStore {
    /// Opens the store, creating the data directory if needed.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Path of a collection file.
    pub fn path(&self, kind: RecordKind) -> PathBuf {
        self.config.data_dir.join(kind.file_name())
    }

    fn read_collection<T: DeserializeOwned>(path: &Path, kind: RecordKind) -> Vec<T> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(%kind, error = %e, "failed to read collection, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&json) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(%kind, error = %e, "corrupt collection file, starting empty");
                Vec::new()
            }
        }
    }
}

impl RecordStore for JsonStore {
    fn load<T: DeserializeOwned>(&self, kind: RecordKind) -> Vec<T> {
        Self::read_collection(&self.path(kind), kind)
    }

    fn save<T: Serialize>(&self, kind: RecordKind, records: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)?;

        // Write the full document to a sibling temp file and rename over the
        // target, so an interrupted save never corrupts the collection.
        let mut tmp = NamedTempFile::new_in(&self.config.data_dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path(kind)).map_err(|e| e.error)?;

        tracing::debug!(%kind, records = records.len(), "collection persisted");
        Ok(())
    }
}

/// In-memory store for tests and demos.
///
/// Collections are held as serialized JSON values, so load/save exercise the
/// same encode/decode path as [`JsonStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<RecordKind, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn load<T: DeserializeOwned>(&self, kind: RecordKind) -> Vec<T> {
        let collections = self.collections.lock();
        let Some(value) = collections.get(&kind) else {
            return Vec::new();
        };

        match serde_json::from_value(value.clone()) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(%kind, error = %e, "corrupt collection value, starting empty");
                Vec::new()
            }
        }
    }

    fn save<T: Serialize>(&self, kind: RecordKind, records: &[T]) -> Result<(), StoreError> {
        let value = serde_json::to_value(records)?;
        self.collections.lock().insert(kind, value);
        Ok(())
    }
}
