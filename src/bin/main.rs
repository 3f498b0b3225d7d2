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

use cashbook::{
    AuthenticationProvider, CashFlow, Debt, JsonStore, Ledger, RecordId, StoreConfig, Transaction,
    UserDirectory, UserId,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Cashbook - Personal ledger over JSON-file storage
///
/// Records cash inflows/outflows, debts, and transactions per user, and
/// derives the running main balance.
#[derive(Parser, Debug)]
#[command(name = "cashbook")]
#[command(about = "A personal ledger that tracks cash flows and debts", long_about = None)]
struct Args {
    /// Directory holding the persisted collections
    #[arg(long, value_name = "DIR", default_value = "./data/cashbook")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new user
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Verify credentials and print the user id
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Print the main balance and total outstanding debt
    Balance,
    /// Record a cash inflow
    Inflow {
        #[arg(long)]
        user: u32,
        #[arg(long)]
        amount: Decimal,
        /// Source of the inflow, e.g. "Salary"
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        /// RFC 3339 timestamp; defaults to now
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },
    /// Record a cash outflow (rejected if it exceeds the balance)
    Outflow {
        #[arg(long)]
        user: u32,
        #[arg(long)]
        amount: Decimal,
        /// Spending category, e.g. "Rent"
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },
    /// Record a debt owed to a user
    Debt {
        #[arg(long)]
        user: u32,
        #[arg(long)]
        amount: Decimal,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },
    /// Record a free-form transaction
    Txn {
        #[arg(long)]
        user: u32,
        #[arg(long)]
        amount: Decimal,
        #[arg(long, default_value = "0")]
        debit: Decimal,
        #[arg(long, default_value = "0")]
        credit: Decimal,
        #[arg(long, default_value = "")]
        kind: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },
    /// Clear all debts of a user (rejected if total debt exceeds the balance)
    ClearDebts {
        #[arg(long)]
        user: u32,
    },
    /// Clear a single debt by id (no-op if unknown or already cleared)
    ClearDebt {
        #[arg(long)]
        id: u32,
    },
    /// Print a collection as JSON
    List {
        #[arg(value_enum)]
        kind: ListKind,
    },
    /// Delete a record by id (no-op if unknown)
    Delete {
        #[arg(value_enum)]
        kind: DeleteKind,
        #[arg(long)]
        id: u32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ListKind {
    Inflows,
    Outflows,
    Debts,
    Transactions,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DeleteKind {
    Cashflow,
    Debt,
    Transaction,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonStore::open(StoreConfig {
        data_dir: args.data_dir,
    })?;

    match args.command {
        Command::Register { email, password } => {
            let directory = UserDirectory::new(store);
            let id = directory.register(&email, &password)?;
            println!("registered user {id}");
        }
        Command::Login { email, password } => {
            let directory = UserDirectory::new(store);
            let id = directory.authenticate(&email, &password)?;
            println!("user {id}");
        }
        Command::Balance => {
            let ledger = Ledger::new(store);
            println!("balance: {}", ledger.main_balance());
            println!("outstanding debt: {}", ledger.total_debt());
        }
        Command::Inflow {
            user,
            amount,
            category,
            description,
            date,
        } => {
            let ledger = Ledger::new(store);
            let id = ledger.add_cash_inflow(CashFlow {
                id: RecordId(0),
                user_id: UserId(user),
                amount,
                date: date.unwrap_or_else(Utc::now),
                category,
                description,
                is_inflow: true,
            })?;
            println!("inflow {id} recorded");
        }
        Command::Outflow {
            user,
            amount,
            category,
            description,
            date,
        } => {
            let ledger = Ledger::new(store);
            let id = ledger.add_cash_outflow(CashFlow {
                id: RecordId(0),
                user_id: UserId(user),
                amount,
                date: date.unwrap_or_else(Utc::now),
                category,
                description,
                is_inflow: false,
            })?;
            println!("outflow {id} recorded");
        }
        Command::Debt {
            user,
            amount,
            description,
            date,
        } => {
            let ledger = Ledger::new(store);
            let id = ledger.add_debt(Debt {
                id: RecordId(0),
                user_id: UserId(user),
                amount,
                paid_amount: Decimal::ZERO,
                date: date.unwrap_or_else(Utc::now),
                description,
                is_cleared: false,
            })?;
            println!("debt {id} recorded");
        }
        Command::Txn {
            user,
            amount,
            debit,
            credit,
            kind,
            description,
            date,
        } => {
            let ledger = Ledger::new(store);
            let id = ledger.add_transaction(Transaction {
                id: RecordId(0),
                user_id: UserId(user),
                amount,
                debit,
                credit,
                date: date.unwrap_or_else(Utc::now),
                description,
                kind,
            })?;
            println!("transaction {id} recorded");
        }
        Command::ClearDebts { user } => {
            let ledger = Ledger::new(store);
            ledger.clear_debts(UserId(user))?;
            println!("debts cleared for user {user}");
        }
        Command::ClearDebt { id } => {
            let ledger = Ledger::new(store);
            ledger.clear_debt(RecordId(id))?;
            println!("debt {id} cleared");
        }
        Command::List { kind } => {
            let ledger = Ledger::new(store);
            let json = match kind {
                ListKind::Inflows => serde_json::to_string_pretty(&ledger.cash_inflows())?,
                ListKind::Outflows => serde_json::to_string_pretty(&ledger.cash_outflows())?,
                ListKind::Debts => serde_json::to_string_pretty(&ledger.debts())?,
                ListKind::Transactions => serde_json::to_string_pretty(&ledger.transactions())?,
            };
            println!("{json}");
        }
        Command::Delete { kind, id } => {
            let ledger = Ledger::new(store);
            match kind {
                DeleteKind::Cashflow => ledger.delete_cash_flow(RecordId(id))?,
                DeleteKind::Debt => ledger.delete_debt(RecordId(id))?,
                DeleteKind::Transaction => ledger.delete_transaction(RecordId(id))?,
            }
            println!("{kind:?} {id} deleted");
        }
    }

    Ok(())
}
