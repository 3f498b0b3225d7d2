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

//! JsonStore behavior against a real filesystem.

use cashbook::{
    CashFlow, Debt, JsonStore, Ledger, RecordId, RecordKind, RecordStore, StoreConfig, UserId,
};
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> JsonStore {
    JsonStore::open(StoreConfig {
        data_dir: dir.path().to_path_buf(),
    })
    .unwrap()
}

fn sample_flow(id: u32) -> CashFlow {
    CashFlow {
        id: RecordId(id),
        user_id: UserId(3),
        amount: dec!(1234.5678),
        date: "2024-03-01T12:30:45Z".parse().unwrap(),
        category: "Salary".to_string(),
        description: "March paycheck".to_string(),
        is_inflow: true,
    }
}

fn sample_debt(id: u32) -> Debt {
    Debt {
        id: RecordId(id),
        user_id: UserId(3),
        amount: dec!(0.01),
        paid_amount: dec!(0.00),
        date: "1999-12-31T23:59:59Z".parse().unwrap(),
        description: "penny owed".to_string(),
        is_cleared: false,
    }
}

#[test]
fn missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let flows: Vec<CashFlow> = store.load(RecordKind::CashFlows);
    assert!(flows.is_empty());
}

#[test]
fn save_then_load_is_field_identical() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let flows = vec![sample_flow(1), sample_flow(2)];
    store.save(RecordKind::CashFlows, &flows).unwrap();

    let loaded: Vec<CashFlow> = store.load(RecordKind::CashFlows);
    assert_eq!(loaded, flows);
}

#[test]
fn reload_from_fresh_store_preserves_precision_and_dates() {
    let dir = TempDir::new().unwrap();
    {
        let store = open_store(&dir);
        store.save(RecordKind::Debts, &[sample_debt(7)]).unwrap();
    }

    // A brand new store instance over the same directory sees the same data.
    let store = open_store(&dir);
    let loaded: Vec<Debt> = store.load(RecordKind::Debts);
    assert_eq!(loaded, vec![sample_debt(7)]);
    assert_eq!(loaded[0].amount, dec!(0.01));
}

#[test]
fn save_overwrites_prior_content() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store
        .save(RecordKind::CashFlows, &[sample_flow(1), sample_flow(2)])
        .unwrap();
    store.save(RecordKind::CashFlows, &[sample_flow(3)]).unwrap();

    let loaded: Vec<CashFlow> = store.load(RecordKind::CashFlows);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, RecordId(3));
}

#[test]
fn corrupt_file_degrades_to_empty() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.save(RecordKind::CashFlows, &[sample_flow(1)]).unwrap();

    std::fs::write(store.path(RecordKind::CashFlows), "{not json").unwrap();

    let loaded: Vec<CashFlow> = store.load(RecordKind::CashFlows);
    assert!(loaded.is_empty());
}

#[test]
fn collections_are_stored_independently() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store.save(RecordKind::CashFlows, &[sample_flow(1)]).unwrap();
    store.save(RecordKind::Debts, &[sample_debt(1)]).unwrap();

    // Corrupting one collection leaves the other intact.
    std::fs::write(store.path(RecordKind::Debts), "[]broken").unwrap();

    let flows: Vec<CashFlow> = store.load(RecordKind::CashFlows);
    let debts: Vec<Debt> = store.load(RecordKind::Debts);
    assert_eq!(flows.len(), 1);
    assert!(debts.is_empty());
}

#[test]
fn persisted_form_is_field_named_json() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.save(RecordKind::CashFlows, &[sample_flow(1)]).unwrap();

    let json = std::fs::read_to_string(store.path(RecordKind::CashFlows)).unwrap();
    assert!(json.contains("\"amount\": \"1234.5678\""));
    assert!(json.contains("\"category\": \"Salary\""));
    assert!(json.contains("\"is_inflow\": true"));
}

#[test]
fn no_temp_files_left_behind() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.save(RecordKind::CashFlows, &[sample_flow(1)]).unwrap();
    store.save(RecordKind::Debts, &[sample_debt(1)]).unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["cashflows.json", "debts.json"]);
}

#[test]
fn engine_round_trips_through_the_file_store() {
    let dir = TempDir::new().unwrap();
    {
        let ledger = Ledger::new(open_store(&dir));
        ledger.add_cash_inflow(sample_flow(0)).unwrap();
        ledger.add_debt(sample_debt(0)).unwrap();
    }

    let ledger = Ledger::new(open_store(&dir));
    assert_eq!(ledger.main_balance(), dec!(1234.5678) + dec!(0.01));
    assert_eq!(ledger.cash_inflows().len(), 1);
    assert_eq!(ledger.debts().len(), 1);
}

#[test]
fn clearing_a_cleared_debt_leaves_the_file_untouched() {
    let dir = TempDir::new().unwrap();
    let ledger = Ledger::new(open_store(&dir));
    ledger.add_cash_inflow(sample_flow(0)).unwrap();
    let id = ledger.add_debt(sample_debt(0)).unwrap();
    ledger.clear_debt(id).unwrap();

    let store = open_store(&dir);
    let before = std::fs::read_to_string(store.path(RecordKind::Debts)).unwrap();
    ledger.clear_debt(id).unwrap();
    let after = std::fs::read_to_string(store.path(RecordKind::Debts)).unwrap();

    assert_eq!(before, after);
}
