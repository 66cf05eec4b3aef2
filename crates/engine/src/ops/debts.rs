use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Debt, EngineError, NewDebtCmd, ResultEngine, SettleDebtCmd, Transaction, TransactionKind,
    UpdateDebtCmd, debts, util,
};

use super::transactions::insert_transaction_with_effects;
use super::{Engine, require_debt, with_tx};

/// Result of a successful settlement: the paid debt plus the income
/// transaction that booked the repayment.
#[derive(Clone, Debug, PartialEq)]
pub struct SettledDebt {
    pub debt: Debt,
    pub transaction_id: Uuid,
}

fn ensure_unpaid(model: &debts::Model) -> ResultEngine<()> {
    if model.is_paid {
        return Err(EngineError::AlreadySettled(format!(
            "debt from '{}' is already paid",
            model.person_name
        )));
    }
    Ok(())
}

impl Engine {
    /// Records money someone owes the owner.
    pub async fn new_debt(&self, cmd: NewDebtCmd) -> ResultEngine<Debt> {
        let person_name = util::required_name(&cmd.person_name, "debtor")?;
        if !cmd.amount.is_positive() {
            return Err(EngineError::InvalidInput("amount must be > 0".to_string()));
        }

        let debt = Debt {
            id: Uuid::new_v4(),
            owner: cmd.owner,
            person_name,
            amount: cmd.amount,
            is_paid: false,
            paid_at: None,
            transaction_id: None,
            created_at: Utc::now(),
        };
        debts::ActiveModel::from(&debt)
            .insert(&self.database)
            .await?;
        Ok(debt)
    }

    /// Fetches a single debt.
    pub async fn debt(&self, debt_id: Uuid, owner: &str) -> ResultEngine<Debt> {
        let model = require_debt(&self.database, debt_id, owner).await?;
        Ok(Debt::from(model))
    }

    /// Lists the owner's debts, optionally filtered by paid state.
    pub async fn debts(&self, owner: &str, is_paid: Option<bool>) -> ResultEngine<Vec<Debt>> {
        let mut query = debts::Entity::find()
            .filter(debts::Column::Owner.eq(owner.to_string()))
            .order_by_asc(debts::Column::CreatedAt);
        if let Some(is_paid) = is_paid {
            query = query.filter(debts::Column::IsPaid.eq(is_paid));
        }
        let models = query.all(&self.database).await?;
        Ok(models.into_iter().map(Debt::from).collect())
    }

    /// Updates an unpaid debt's debtor name or amount.
    pub async fn update_debt(&self, cmd: UpdateDebtCmd) -> ResultEngine<Debt> {
        with_tx!(self, |db_tx| {
            let model = require_debt(&db_tx, cmd.debt_id, &cmd.owner).await?;
            ensure_unpaid(&model)?;

            let person_name = match cmd.person_name.as_deref() {
                Some(person_name) => util::required_name(person_name, "debtor")?,
                None => model.person_name.clone(),
            };
            let amount_minor = match cmd.amount {
                Some(amount) => {
                    if !amount.is_positive() {
                        return Err(EngineError::InvalidInput(
                            "amount must be > 0".to_string(),
                        ));
                    }
                    amount.cents()
                }
                None => model.amount_minor,
            };

            let update = debts::ActiveModel {
                id: ActiveValue::Set(cmd.debt_id),
                person_name: ActiveValue::Set(person_name),
                amount_minor: ActiveValue::Set(amount_minor),
                ..Default::default()
            };
            let updated = update.update(&db_tx).await?;
            Ok(Debt::from(updated))
        })
    }

    /// Deletes an unpaid debt. Paid debts keep their audit trail.
    pub async fn delete_debt(&self, debt_id: Uuid, owner: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_debt(&db_tx, debt_id, owner).await?;
            ensure_unpaid(&model)?;
            debts::Entity::delete_by_id(debt_id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Settles a debt: books the repayment as an income transaction on the
    /// target account and marks the debt paid, atomically.
    pub async fn settle_debt(&self, cmd: SettleDebtCmd) -> ResultEngine<SettledDebt> {
        with_tx!(self, |db_tx| {
            let model = require_debt(&db_tx, cmd.debt_id, &cmd.owner).await?;
            ensure_unpaid(&model)?;
            let mut debt = Debt::from(model);

            let tx = Transaction::new(
                cmd.owner.clone(),
                cmd.account_id,
                None,
                TransactionKind::Income,
                debt.amount,
                Some(format!("Debt repayment from {}", debt.person_name)),
                cmd.category_id,
                cmd.paid_at,
            )?;
            let transaction_id = insert_transaction_with_effects(&db_tx, &tx).await?;

            let update = debts::ActiveModel {
                id: ActiveValue::Set(cmd.debt_id),
                is_paid: ActiveValue::Set(true),
                paid_at: ActiveValue::Set(Some(cmd.paid_at)),
                transaction_id: ActiveValue::Set(Some(transaction_id)),
                ..Default::default()
            };
            update.update(&db_tx).await?;

            debt.is_paid = true;
            debt.paid_at = Some(cmd.paid_at);
            debt.transaction_id = Some(transaction_id);
            Ok(SettledDebt {
                debt,
                transaction_id,
            })
        })
    }
}
