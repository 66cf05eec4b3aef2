//! Crypto holding records.
//!
//! Quantities are fractional (f64); fiat prices stay in integer cents.
//! Buying and selling can be linked to the booked expense/income
//! transactions.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingStatus {
    Active,
    Sold,
}

impl HoldingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Sold => "sold",
        }
    }
}

impl TryFrom<&str> for HoldingStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "sold" => Ok(Self::Sold),
            other => Err(EngineError::InvalidInput(format!(
                "invalid holding status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CryptoHolding {
    pub id: Uuid,
    pub owner: String,
    pub symbol: String,
    pub quantity: f64,
    pub purchase_price: MoneyCents,
    pub current_price: MoneyCents,
    pub purchase_transaction_id: Option<Uuid>,
    pub sale_transaction_id: Option<Uuid>,
    pub status: HoldingStatus,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "crypto_holdings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner: String,
    pub symbol: String,
    pub quantity: f64,
    pub purchase_price_minor: i64,
    pub current_price_minor: i64,
    pub purchase_transaction_id: Option<Uuid>,
    pub sale_transaction_id: Option<Uuid>,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CryptoHolding> for ActiveModel {
    fn from(holding: &CryptoHolding) -> Self {
        Self {
            id: ActiveValue::Set(holding.id),
            owner: ActiveValue::Set(holding.owner.clone()),
            symbol: ActiveValue::Set(holding.symbol.clone()),
            quantity: ActiveValue::Set(holding.quantity),
            purchase_price_minor: ActiveValue::Set(holding.purchase_price.cents()),
            current_price_minor: ActiveValue::Set(holding.current_price.cents()),
            purchase_transaction_id: ActiveValue::Set(holding.purchase_transaction_id),
            sale_transaction_id: ActiveValue::Set(holding.sale_transaction_id),
            status: ActiveValue::Set(holding.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for CryptoHolding {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            owner: model.owner,
            symbol: model.symbol,
            quantity: model.quantity,
            purchase_price: MoneyCents::new(model.purchase_price_minor),
            current_price: MoneyCents::new(model.current_price_minor),
            purchase_transaction_id: model.purchase_transaction_id,
            sale_transaction_id: model.sale_transaction_id,
            status: HoldingStatus::try_from(model.status.as_str())?,
        })
    }
}
