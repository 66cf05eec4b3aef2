//! Ledger engine: owner-scoped accounts, transactions, categories, tags,
//! debts, subscriptions, and crypto holdings over a sea-orm store.
//!
//! Every mutating use-case runs inside a single database transaction;
//! account balances are denormalized and kept equal to the sum of the signed
//! effects of the live transactions touching them.

pub use accounts::{Account, AccountKind};
pub use categories::{Category, CategoryKind};
pub use commands::{
    NewAccountCmd, NewCategoryCmd, NewDebtCmd, NewHoldingCmd, NewSubscriptionCmd,
    NewTransactionCmd, SellHoldingCmd, SettleDebtCmd, UpdateAccountCmd, UpdateCategoryCmd,
    UpdateDebtCmd, UpdateHoldingCmd, UpdateSubscriptionCmd, UpdateTransactionCmd,
};
pub use crypto_holdings::{CryptoHolding, HoldingStatus};
pub use debts::Debt;
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{
    DueRunReport, Engine, EngineBuilder, ProcessedSubscription, SettledDebt, SoldHolding,
    TransactionListFilter,
};
pub use ops::statistics::{
    CategorySummary, DailyPoint, MonthlyPoint, Statistics, StatsPeriod, TopTransaction,
};
pub use recurrence::{monthly_equivalent, next_billing_date};
pub use subscriptions::{BillingFrequency, Subscription, SubscriptionStatus};
pub use tags::Tag;
pub use transactions::{Transaction, TransactionKind};

mod accounts;
mod categories;
mod commands;
mod crypto_holdings;
mod debts;
mod error;
mod money;
mod ops;
mod recurrence;
mod subscriptions;
mod tags;
mod transaction_tags;
mod transactions;
pub mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
