//! Input commands for the engine use-cases.
//!
//! Handlers build these from API payloads; the engine validates them before
//! touching the store. `Option` fields on update commands are patches: `None`
//! keeps the stored value.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    AccountKind, BillingFrequency, CategoryKind, MoneyCents, SubscriptionStatus, TransactionKind,
};

#[derive(Clone, Debug)]
pub struct NewAccountCmd {
    pub owner: String,
    pub name: String,
    pub kind: AccountKind,
    pub currency: Option<String>,
    pub initial_balance: Option<MoneyCents>,
}

#[derive(Clone, Debug)]
pub struct UpdateAccountCmd {
    pub account_id: Uuid,
    pub owner: String,
    pub name: Option<String>,
    pub kind: Option<AccountKind>,
    pub active: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub owner: String,
    pub account_id: Uuid,
    /// Destination account, required for transfers and rejected otherwise.
    pub to_account_id: Option<Uuid>,
    pub kind: TransactionKind,
    pub amount: MoneyCents,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
    pub tag_ids: Vec<Uuid>,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateTransactionCmd {
    pub transaction_id: Uuid,
    pub owner: String,
    pub amount: Option<MoneyCents>,
    pub kind: Option<TransactionKind>,
    pub account_id: Option<Uuid>,
    pub to_account_id: Option<Uuid>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub occurred_at: Option<DateTime<Utc>>,
    /// Replaces the whole tag set when present.
    pub tag_ids: Option<Vec<Uuid>>,
}

impl UpdateTransactionCmd {
    pub fn for_transaction(transaction_id: Uuid, owner: impl Into<String>) -> Self {
        Self {
            transaction_id,
            owner: owner.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewCategoryCmd {
    pub owner: String,
    pub name: String,
    pub kind: CategoryKind,
    pub parent_id: Option<Uuid>,
}

#[derive(Clone, Debug)]
pub struct UpdateCategoryCmd {
    pub category_id: Uuid,
    pub owner: String,
    pub name: Option<String>,
    pub parent_id: Option<Uuid>,
    /// Detaches the category from its parent; mutually exclusive with
    /// `parent_id`.
    pub clear_parent: bool,
}

#[derive(Clone, Debug)]
pub struct NewDebtCmd {
    pub owner: String,
    pub person_name: String,
    pub amount: MoneyCents,
}

#[derive(Clone, Debug)]
pub struct UpdateDebtCmd {
    pub debt_id: Uuid,
    pub owner: String,
    pub person_name: Option<String>,
    pub amount: Option<MoneyCents>,
}

#[derive(Clone, Debug)]
pub struct SettleDebtCmd {
    pub debt_id: Uuid,
    pub owner: String,
    /// Account receiving the repayment.
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub paid_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewSubscriptionCmd {
    pub owner: String,
    pub name: String,
    pub amount: MoneyCents,
    pub frequency: BillingFrequency,
    pub next_billing_date: NaiveDate,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateSubscriptionCmd {
    pub subscription_id: Uuid,
    pub owner: String,
    pub name: Option<String>,
    pub amount: Option<MoneyCents>,
    pub frequency: Option<BillingFrequency>,
    pub next_billing_date: Option<NaiveDate>,
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub status: Option<SubscriptionStatus>,
}

impl UpdateSubscriptionCmd {
    pub fn for_subscription(subscription_id: Uuid, owner: impl Into<String>) -> Self {
        Self {
            subscription_id,
            owner: owner.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewHoldingCmd {
    pub owner: String,
    pub symbol: String,
    pub quantity: f64,
    pub purchase_price: MoneyCents,
    /// When set, the purchase cost is booked as an expense on this account.
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct UpdateHoldingCmd {
    pub holding_id: Uuid,
    pub owner: String,
    pub quantity: Option<f64>,
    pub purchase_price: Option<MoneyCents>,
    pub current_price: Option<MoneyCents>,
}

#[derive(Clone, Debug)]
pub struct SellHoldingCmd {
    pub holding_id: Uuid,
    pub owner: String,
    /// Account receiving the proceeds.
    pub account_id: Uuid,
    pub sale_price: MoneyCents,
    pub category_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
}
