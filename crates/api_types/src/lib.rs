//! Wire types shared by the server and its clients.
//!
//! Amounts are integer minor units (cents) everywhere; timestamps are UTC.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Checking,
    Savings,
    CreditCard,
    Investment,
    Cash,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Expense,
    Income,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingFrequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingStatus {
    Active,
    Sold,
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        pub kind: AccountKind,
        pub currency: Option<String>,
        pub initial_balance_minor: Option<i64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AccountUpdate {
        pub name: Option<String>,
        pub kind: Option<AccountKind>,
        pub active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub kind: AccountKind,
        pub balance_minor: i64,
        pub currency: String,
        pub active: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AccountListQuery {
        /// Include archived accounts (default: false).
        pub include_inactive: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountsResponse {
        pub accounts: Vec<AccountView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TotalBalanceResponse {
        pub total_minor: i64,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub account_id: Uuid,
        /// Destination account, transfers only.
        pub to_account_id: Option<Uuid>,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub category_id: Option<Uuid>,
        pub occurred_at: DateTime<Utc>,
        pub tag_ids: Option<Vec<Uuid>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub amount_minor: Option<i64>,
        pub kind: Option<TransactionKind>,
        pub account_id: Option<Uuid>,
        pub to_account_id: Option<Uuid>,
        pub description: Option<String>,
        pub category_id: Option<Uuid>,
        pub occurred_at: Option<DateTime<Utc>>,
        pub tag_ids: Option<Vec<Uuid>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub account_id: Uuid,
        pub to_account_id: Option<Uuid>,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub category_id: Option<Uuid>,
        pub occurred_at: DateTime<Utc>,
        pub tag_ids: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub from: Option<DateTime<Utc>>,
        pub to: Option<DateTime<Utc>>,
        pub kind: Option<TransactionKind>,
        pub account_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        pub limit: Option<u64>,
        pub cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        pub next_cursor: Option<String>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub kind: CategoryKind,
        pub parent_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub parent_id: Option<Uuid>,
        /// Detach from the current parent; mutually exclusive with
        /// `parent_id`.
        #[serde(default)]
        pub clear_parent: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub kind: CategoryKind,
        pub parent_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        pub categories: Vec<CategoryView>,
    }
}

pub mod tag {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TagNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TagView {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TagsResponse {
        pub tags: Vec<TagView>,
    }
}

pub mod debt {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtNew {
        pub person_name: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DebtUpdate {
        pub person_name: Option<String>,
        pub amount_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtView {
        pub id: Uuid,
        pub person_name: String,
        pub amount_minor: i64,
        pub is_paid: bool,
        pub paid_at: Option<DateTime<Utc>>,
        pub transaction_id: Option<Uuid>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DebtListQuery {
        pub is_paid: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtsResponse {
        pub debts: Vec<DebtView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtSettle {
        /// Account receiving the repayment.
        pub account_id: Uuid,
        pub category_id: Option<Uuid>,
        /// Defaults to now.
        pub paid_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtSettled {
        pub debt: DebtView,
        pub transaction_id: Uuid,
    }
}

pub mod subscription {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubscriptionNew {
        pub name: String,
        pub amount_minor: i64,
        pub frequency: BillingFrequency,
        pub next_billing_date: NaiveDate,
        pub account_id: Uuid,
        pub category_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SubscriptionUpdate {
        pub name: Option<String>,
        pub amount_minor: Option<i64>,
        pub frequency: Option<BillingFrequency>,
        pub next_billing_date: Option<NaiveDate>,
        pub account_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        pub status: Option<SubscriptionStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubscriptionView {
        pub id: Uuid,
        pub name: String,
        pub amount_minor: i64,
        /// Amount normalized to a monthly figure for summaries.
        pub monthly_equivalent_minor: i64,
        pub frequency: BillingFrequency,
        pub next_billing_date: NaiveDate,
        pub account_id: Uuid,
        pub category_id: Option<Uuid>,
        pub status: SubscriptionStatus,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SubscriptionListQuery {
        pub status: Option<SubscriptionStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubscriptionsResponse {
        pub subscriptions: Vec<SubscriptionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubscriptionProcessed {
        pub subscription_id: Uuid,
        pub transaction_id: Uuid,
        pub next_billing_date: NaiveDate,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProcessDueRequest {
        /// Defaults to today.
        pub as_of: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DueRunResponse {
        pub processed: u32,
        pub failed: u32,
    }
}

pub mod crypto {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HoldingNew {
        pub symbol: String,
        pub quantity: f64,
        pub purchase_price_minor: i64,
        /// When set, the purchase cost is booked as an expense here.
        pub account_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        /// Defaults to now.
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct HoldingUpdate {
        pub quantity: Option<f64>,
        pub purchase_price_minor: Option<i64>,
        pub current_price_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HoldingView {
        pub id: Uuid,
        pub symbol: String,
        pub quantity: f64,
        pub purchase_price_minor: i64,
        pub current_price_minor: i64,
        /// quantity × current price, rounded to the cent.
        pub current_value_minor: i64,
        pub purchase_transaction_id: Option<Uuid>,
        pub sale_transaction_id: Option<Uuid>,
        pub status: HoldingStatus,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct HoldingListQuery {
        pub status: Option<HoldingStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HoldingsResponse {
        pub holdings: Vec<HoldingView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HoldingSell {
        /// Account receiving the proceeds.
        pub account_id: Uuid,
        pub sale_price_minor: i64,
        pub category_id: Option<Uuid>,
        /// Defaults to now.
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HoldingSold {
        pub holding: HoldingView,
        pub transaction_id: Uuid,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StatsQuery {
        /// `month`, `quarter`, `year`, or `all`; anything else means
        /// `month`.
        pub period: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySummaryView {
        pub category_id: Option<Uuid>,
        pub name: String,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyPointView {
        pub year: i32,
        pub month: u32,
        pub income_minor: i64,
        pub expenses_minor: i64,
        pub net_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyPointView {
        pub date: NaiveDate,
        pub expenses_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TopTransactionView {
        pub id: Uuid,
        pub description: Option<String>,
        pub category: Option<String>,
        pub amount_minor: i64,
        pub occurred_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Statistic {
        pub total_income_minor: i64,
        pub total_expenses_minor: i64,
        pub net_income_minor: i64,
        pub savings_rate: f64,
        pub net_worth_minor: i64,
        pub expense_breakdown: Vec<CategorySummaryView>,
        pub income_breakdown: Vec<CategorySummaryView>,
        pub monthly_trends: Vec<MonthlyPointView>,
        pub daily_trend: Vec<DailyPointView>,
        pub top_spending: Vec<TopTransactionView>,
    }
}
