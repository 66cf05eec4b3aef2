use chrono::Utc;
use sea_orm::{ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Account, AccountKind, EngineError, MoneyCents, NewAccountCmd, ResultEngine, UpdateAccountCmd,
    accounts, subscriptions, transactions, util,
};

use super::{Engine, require_account, with_tx};

const DEFAULT_CURRENCY: &str = "EUR";

impl Engine {
    /// Creates an account for the owner.
    ///
    /// The opening balance defaults to zero; only credit cards may open in
    /// the negative.
    pub async fn new_account(&self, cmd: NewAccountCmd) -> ResultEngine<Account> {
        let name = util::required_name(&cmd.name, "account")?;
        let balance = cmd.initial_balance.unwrap_or(MoneyCents::ZERO);
        if balance.is_negative() && !cmd.kind.allows_negative_balance() {
            return Err(EngineError::InvalidInput(
                "opening balance must not be negative".to_string(),
            ));
        }
        let currency = util::optional_text(cmd.currency.as_deref())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let account = Account {
            id: Uuid::new_v4(),
            owner: cmd.owner,
            name,
            kind: cmd.kind,
            balance,
            currency,
            active: true,
            created_at: Utc::now(),
        };
        accounts::ActiveModel::from(&account)
            .insert(&self.database)
            .await?;
        Ok(account)
    }

    /// Fetches a single account.
    pub async fn account(&self, account_id: Uuid, owner: &str) -> ResultEngine<Account> {
        let model = require_account(&self.database, account_id, owner).await?;
        Account::try_from(model)
    }

    /// Lists the owner's accounts, optionally including inactive ones.
    pub async fn accounts(&self, owner: &str, include_inactive: bool) -> ResultEngine<Vec<Account>> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::Owner.eq(owner.to_string()))
            .order_by_asc(accounts::Column::CreatedAt);
        if !include_inactive {
            query = query.filter(accounts::Column::Active.eq(true));
        }
        let models = query.all(&self.database).await?;
        models.into_iter().map(Account::try_from).collect()
    }

    /// Updates an account's name, kind, or active flag.
    ///
    /// The balance is never written here; it only moves through
    /// transactions.
    pub async fn update_account(&self, cmd: UpdateAccountCmd) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            let model = require_account(&db_tx, cmd.account_id, &cmd.owner).await?;

            let name = match cmd.name.as_deref() {
                Some(name) => util::required_name(name, "account")?,
                None => model.name.clone(),
            };
            let kind = match cmd.kind {
                Some(kind) => kind,
                None => AccountKind::try_from(model.kind.as_str())?,
            };
            if !kind.allows_negative_balance() && model.balance_minor < 0 {
                return Err(EngineError::Conflict(
                    "cannot change kind while the balance is negative".to_string(),
                ));
            }
            let active = cmd.active.unwrap_or(model.active);

            let update = accounts::ActiveModel {
                id: ActiveValue::Set(cmd.account_id),
                name: ActiveValue::Set(name),
                kind: ActiveValue::Set(kind.as_str().to_string()),
                active: ActiveValue::Set(active),
                ..Default::default()
            };
            let updated = update.update(&db_tx).await?;
            Account::try_from(updated)
        })
    }

    /// Deletes an account that no transaction or subscription references.
    pub async fn delete_account(&self, account_id: Uuid, owner: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_account(&db_tx, account_id, owner).await?;

            let referencing = transactions::Entity::find()
                .filter(
                    Condition::any()
                        .add(transactions::Column::AccountId.eq(account_id))
                        .add(transactions::Column::ToAccountId.eq(account_id)),
                )
                .count(&db_tx)
                .await?;
            if referencing > 0 {
                return Err(EngineError::Conflict(
                    "account still has transactions".to_string(),
                ));
            }
            let subscribed = subscriptions::Entity::find()
                .filter(subscriptions::Column::AccountId.eq(account_id))
                .count(&db_tx)
                .await?;
            if subscribed > 0 {
                return Err(EngineError::Conflict(
                    "account still has subscriptions".to_string(),
                ));
            }

            accounts::Entity::delete_by_id(account_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Sums the balances of all the owner's accounts.
    pub async fn total_balance(&self, owner: &str) -> ResultEngine<MoneyCents> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::Owner.eq(owner.to_string()))
            .all(&self.database)
            .await?;
        let total = models
            .iter()
            .map(|model| model.balance_minor)
            .sum::<i64>();
        Ok(MoneyCents::new(total))
    }
}
