//! Debt records.
//!
//! A debt tracks money someone owes the owner. Settling it marks the debt
//! paid and books the amount as an income transaction; a paid debt is
//! immutable.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MoneyCents;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub id: Uuid,
    pub owner: String,
    pub person_name: String,
    pub amount: MoneyCents,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    /// Income transaction booked at settlement, set exactly once.
    pub transaction_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "debts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner: String,
    pub person_name: String,
    pub amount_minor: i64,
    pub is_paid: bool,
    pub paid_at: Option<DateTimeUtc>,
    pub transaction_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Debt> for ActiveModel {
    fn from(debt: &Debt) -> Self {
        Self {
            id: ActiveValue::Set(debt.id),
            owner: ActiveValue::Set(debt.owner.clone()),
            person_name: ActiveValue::Set(debt.person_name.clone()),
            amount_minor: ActiveValue::Set(debt.amount.cents()),
            is_paid: ActiveValue::Set(debt.is_paid),
            paid_at: ActiveValue::Set(debt.paid_at),
            transaction_id: ActiveValue::Set(debt.transaction_id),
            created_at: ActiveValue::Set(debt.created_at),
        }
    }
}

impl From<Model> for Debt {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            owner: model.owner,
            person_name: model.person_name,
            amount: MoneyCents::new(model.amount_minor),
            is_paid: model.is_paid,
            paid_at: model.paid_at,
            transaction_id: model.transaction_id,
            created_at: model.created_at,
        }
    }
}
