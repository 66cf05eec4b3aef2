//! Subscription records.
//!
//! A subscription bills a fixed amount from an account on a recurring
//! schedule. Processing one advances `next_billing_date` and books the
//! charge as an expense transaction.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingFrequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

impl TryFrom<&str> for BillingFrequency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::InvalidInput(format!(
                "invalid billing frequency: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for SubscriptionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidInput(format!(
                "invalid subscription status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub owner: String,
    pub name: String,
    pub amount: MoneyCents,
    pub frequency: BillingFrequency,
    pub next_billing_date: NaiveDate,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub status: SubscriptionStatus,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner: String,
    pub name: String,
    pub amount_minor: i64,
    pub frequency: String,
    pub next_billing_date: Date,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Account,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Subscription> for ActiveModel {
    fn from(subscription: &Subscription) -> Self {
        Self {
            id: ActiveValue::Set(subscription.id),
            owner: ActiveValue::Set(subscription.owner.clone()),
            name: ActiveValue::Set(subscription.name.clone()),
            amount_minor: ActiveValue::Set(subscription.amount.cents()),
            frequency: ActiveValue::Set(subscription.frequency.as_str().to_string()),
            next_billing_date: ActiveValue::Set(subscription.next_billing_date),
            account_id: ActiveValue::Set(subscription.account_id),
            category_id: ActiveValue::Set(subscription.category_id),
            status: ActiveValue::Set(subscription.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for Subscription {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            owner: model.owner,
            name: model.name,
            amount: MoneyCents::new(model.amount_minor),
            frequency: BillingFrequency::try_from(model.frequency.as_str())?,
            next_billing_date: model.next_billing_date,
            account_id: model.account_id,
            category_id: model.category_id,
            status: SubscriptionStatus::try_from(model.status.as_str())?,
        })
    }
}
