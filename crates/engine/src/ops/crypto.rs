use std::collections::HashMap;

use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    CryptoHolding, EngineError, HoldingStatus, MoneyCents, NewHoldingCmd, ResultEngine,
    SellHoldingCmd, Transaction, TransactionKind, UpdateHoldingCmd, crypto_holdings, util,
};

use super::transactions::insert_transaction_with_effects;
use super::{Engine, require_holding, with_tx};

/// Result of selling a holding: the updated record plus the income
/// transaction that booked the proceeds.
#[derive(Clone, Debug, PartialEq)]
pub struct SoldHolding {
    pub holding: CryptoHolding,
    pub transaction_id: Uuid,
}

fn normalize_symbol(symbol: &str) -> ResultEngine<String> {
    let symbol = util::required_name(symbol, "symbol")?;
    Ok(symbol.to_uppercase())
}

fn ensure_positive_quantity(quantity: f64) -> ResultEngine<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(EngineError::InvalidInput(
            "quantity must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Fiat value of `quantity` units at `price`, rounded to the nearest cent.
fn fiat_value(quantity: f64, price: MoneyCents) -> ResultEngine<MoneyCents> {
    let value = quantity * price.cents() as f64;
    if !value.is_finite() || value > i64::MAX as f64 {
        return Err(EngineError::InvalidInput("value out of range".to_string()));
    }
    Ok(MoneyCents::new(value.round() as i64))
}

fn ensure_active(model: &crypto_holdings::Model) -> ResultEngine<()> {
    if model.status != HoldingStatus::Active.as_str() {
        return Err(EngineError::AlreadySettled(format!(
            "holding '{}' is already sold",
            model.symbol
        )));
    }
    Ok(())
}

impl Engine {
    /// Records a crypto holding, optionally booking the purchase cost as an
    /// expense on the given account.
    pub async fn new_holding(&self, cmd: NewHoldingCmd) -> ResultEngine<CryptoHolding> {
        let symbol = normalize_symbol(&cmd.symbol)?;
        ensure_positive_quantity(cmd.quantity)?;
        if !cmd.purchase_price.is_positive() {
            return Err(EngineError::InvalidInput(
                "purchase price must be > 0".to_string(),
            ));
        }
        if cmd.account_id.is_none() && cmd.category_id.is_some() {
            return Err(EngineError::InvalidInput(
                "category requires an account to book the purchase".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let purchase_transaction_id = match cmd.account_id {
                Some(account_id) => {
                    let cost = fiat_value(cmd.quantity, cmd.purchase_price)?;
                    let tx = Transaction::new(
                        cmd.owner.clone(),
                        account_id,
                        None,
                        TransactionKind::Expense,
                        cost,
                        Some(format!("Buy {} {symbol}", cmd.quantity)),
                        cmd.category_id,
                        cmd.occurred_at,
                    )?;
                    Some(insert_transaction_with_effects(&db_tx, &tx).await?)
                }
                None => None,
            };

            let holding = CryptoHolding {
                id: Uuid::new_v4(),
                owner: cmd.owner.clone(),
                symbol: symbol.clone(),
                quantity: cmd.quantity,
                purchase_price: cmd.purchase_price,
                current_price: cmd.purchase_price,
                purchase_transaction_id,
                sale_transaction_id: None,
                status: HoldingStatus::Active,
            };
            crypto_holdings::ActiveModel::from(&holding)
                .insert(&db_tx)
                .await?;
            Ok(holding)
        })
    }

    /// Fetches a single holding.
    pub async fn holding(&self, holding_id: Uuid, owner: &str) -> ResultEngine<CryptoHolding> {
        let model = require_holding(&self.database, holding_id, owner).await?;
        CryptoHolding::try_from(model)
    }

    /// Lists the owner's holdings, optionally filtered by status.
    pub async fn holdings(
        &self,
        owner: &str,
        status: Option<HoldingStatus>,
    ) -> ResultEngine<Vec<CryptoHolding>> {
        let mut query = crypto_holdings::Entity::find()
            .filter(crypto_holdings::Column::Owner.eq(owner.to_string()))
            .order_by_asc(crypto_holdings::Column::Symbol);
        if let Some(status) = status {
            query =
                query.filter(crypto_holdings::Column::Status.eq(status.as_str().to_string()));
        }
        let models = query.all(&self.database).await?;
        models.into_iter().map(CryptoHolding::try_from).collect()
    }

    /// Updates an active holding's quantity or prices.
    pub async fn update_holding(&self, cmd: UpdateHoldingCmd) -> ResultEngine<CryptoHolding> {
        with_tx!(self, |db_tx| {
            let model = require_holding(&db_tx, cmd.holding_id, &cmd.owner).await?;
            ensure_active(&model)?;

            let quantity = match cmd.quantity {
                Some(quantity) => {
                    ensure_positive_quantity(quantity)?;
                    quantity
                }
                None => model.quantity,
            };
            let purchase_price_minor = match cmd.purchase_price {
                Some(price) => {
                    if !price.is_positive() {
                        return Err(EngineError::InvalidInput(
                            "purchase price must be > 0".to_string(),
                        ));
                    }
                    price.cents()
                }
                None => model.purchase_price_minor,
            };
            let current_price_minor = match cmd.current_price {
                Some(price) => {
                    if !price.is_positive() {
                        return Err(EngineError::InvalidInput(
                            "current price must be > 0".to_string(),
                        ));
                    }
                    price.cents()
                }
                None => model.current_price_minor,
            };

            let update = crypto_holdings::ActiveModel {
                id: ActiveValue::Set(cmd.holding_id),
                quantity: ActiveValue::Set(quantity),
                purchase_price_minor: ActiveValue::Set(purchase_price_minor),
                current_price_minor: ActiveValue::Set(current_price_minor),
                ..Default::default()
            };
            let updated = update.update(&db_tx).await?;
            CryptoHolding::try_from(updated)
        })
    }

    /// Deletes a holding. Linked transactions stay in the ledger.
    pub async fn delete_holding(&self, holding_id: Uuid, owner: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_holding(&db_tx, holding_id, owner).await?;
            crypto_holdings::Entity::delete_by_id(holding_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Sells an active holding: books the proceeds as income on the target
    /// account and marks the holding sold, atomically.
    pub async fn sell_holding(&self, cmd: SellHoldingCmd) -> ResultEngine<SoldHolding> {
        if !cmd.sale_price.is_positive() {
            return Err(EngineError::InvalidInput(
                "sale price must be > 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let model = require_holding(&db_tx, cmd.holding_id, &cmd.owner).await?;
            ensure_active(&model)?;
            let mut holding = CryptoHolding::try_from(model)?;

            let proceeds = fiat_value(holding.quantity, cmd.sale_price)?;
            let tx = Transaction::new(
                cmd.owner.clone(),
                cmd.account_id,
                None,
                TransactionKind::Income,
                proceeds,
                Some(format!("Sell {} {}", holding.quantity, holding.symbol)),
                cmd.category_id,
                cmd.occurred_at,
            )?;
            let transaction_id = insert_transaction_with_effects(&db_tx, &tx).await?;

            let update = crypto_holdings::ActiveModel {
                id: ActiveValue::Set(cmd.holding_id),
                current_price_minor: ActiveValue::Set(cmd.sale_price.cents()),
                sale_transaction_id: ActiveValue::Set(Some(transaction_id)),
                status: ActiveValue::Set(HoldingStatus::Sold.as_str().to_string()),
                ..Default::default()
            };
            update.update(&db_tx).await?;

            holding.current_price = cmd.sale_price;
            holding.sale_transaction_id = Some(transaction_id);
            holding.status = HoldingStatus::Sold;
            Ok(SoldHolding {
                holding,
                transaction_id,
            })
        })
    }

    /// Distinct symbols across all active holdings, for the price-refresh
    /// collaborator.
    pub async fn active_crypto_symbols(&self) -> ResultEngine<Vec<String>> {
        let symbols: Vec<String> = crypto_holdings::Entity::find()
            .select_only()
            .column(crypto_holdings::Column::Symbol)
            .filter(
                crypto_holdings::Column::Status
                    .eq(HoldingStatus::Active.as_str().to_string()),
            )
            .distinct()
            .into_tuple()
            .all(&self.database)
            .await?;
        Ok(symbols)
    }

    /// Applies freshly fetched prices to every active holding of each
    /// symbol. Returns how many rows changed.
    pub async fn update_crypto_prices(
        &self,
        prices: &HashMap<String, MoneyCents>,
    ) -> ResultEngine<u64> {
        let mut updated = 0;
        for (symbol, price) in prices {
            let result = crypto_holdings::Entity::update_many()
                .col_expr(
                    crypto_holdings::Column::CurrentPriceMinor,
                    Expr::value(price.cents()),
                )
                .filter(crypto_holdings::Column::Symbol.eq(symbol.to_uppercase()))
                .filter(
                    crypto_holdings::Column::Status
                        .eq(HoldingStatus::Active.as_str().to_string()),
                )
                .exec(&self.database)
                .await?;
            updated += result.rows_affected;
        }
        Ok(updated)
    }
}
