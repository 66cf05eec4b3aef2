use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewSubscriptionCmd, ResultEngine, Subscription, SubscriptionStatus, Transaction,
    TransactionKind, UpdateSubscriptionCmd, recurrence, subscriptions, util,
};

use super::transactions::insert_transaction_with_effects;
use super::{Engine, require_account, require_category, require_subscription, with_tx};

/// Result of processing one subscription billing event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessedSubscription {
    pub subscription_id: Uuid,
    pub transaction_id: Uuid,
    pub next_billing_date: NaiveDate,
}

/// Outcome of a best-effort batch run over due subscriptions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DueRunReport {
    pub processed: u32,
    pub failed: u32,
}

impl Engine {
    /// Creates a subscription billing from the given account.
    pub async fn new_subscription(&self, cmd: NewSubscriptionCmd) -> ResultEngine<Subscription> {
        let name = util::required_name(&cmd.name, "subscription")?;
        if !cmd.amount.is_positive() {
            return Err(EngineError::InvalidInput("amount must be > 0".to_string()));
        }

        with_tx!(self, |db_tx| {
            require_account(&db_tx, cmd.account_id, &cmd.owner).await?;
            if let Some(category_id) = cmd.category_id {
                let category = require_category(&db_tx, category_id, &cmd.owner).await?;
                if category.kind != "expense" {
                    return Err(EngineError::InvalidInput(
                        "subscription category must be an expense category".to_string(),
                    ));
                }
            }

            let subscription = Subscription {
                id: Uuid::new_v4(),
                owner: cmd.owner.clone(),
                name: name.clone(),
                amount: cmd.amount,
                frequency: cmd.frequency,
                next_billing_date: cmd.next_billing_date,
                account_id: cmd.account_id,
                category_id: cmd.category_id,
                status: SubscriptionStatus::Active,
            };
            subscriptions::ActiveModel::from(&subscription)
                .insert(&db_tx)
                .await?;
            Ok(subscription)
        })
    }

    /// Fetches a single subscription.
    pub async fn subscription(
        &self,
        subscription_id: Uuid,
        owner: &str,
    ) -> ResultEngine<Subscription> {
        let model = require_subscription(&self.database, subscription_id, owner).await?;
        Subscription::try_from(model)
    }

    /// Lists the owner's subscriptions, optionally filtered by status.
    pub async fn subscriptions(
        &self,
        owner: &str,
        status: Option<SubscriptionStatus>,
    ) -> ResultEngine<Vec<Subscription>> {
        let mut query = subscriptions::Entity::find()
            .filter(subscriptions::Column::Owner.eq(owner.to_string()))
            .order_by_asc(subscriptions::Column::NextBillingDate);
        if let Some(status) = status {
            query = query.filter(subscriptions::Column::Status.eq(status.as_str().to_string()));
        }
        let models = query.all(&self.database).await?;
        models.into_iter().map(Subscription::try_from).collect()
    }

    /// Updates a subscription's fields or status.
    pub async fn update_subscription(
        &self,
        cmd: UpdateSubscriptionCmd,
    ) -> ResultEngine<Subscription> {
        with_tx!(self, |db_tx| {
            let model = require_subscription(&db_tx, cmd.subscription_id, &cmd.owner).await?;

            let name = match cmd.name.as_deref() {
                Some(name) => util::required_name(name, "subscription")?,
                None => model.name.clone(),
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
            let account_id = match cmd.account_id {
                Some(account_id) => {
                    require_account(&db_tx, account_id, &cmd.owner).await?;
                    account_id
                }
                None => model.account_id,
            };
            let category_id = match cmd.category_id {
                Some(category_id) => {
                    let category = require_category(&db_tx, category_id, &cmd.owner).await?;
                    if category.kind != "expense" {
                        return Err(EngineError::InvalidInput(
                            "subscription category must be an expense category".to_string(),
                        ));
                    }
                    Some(category_id)
                }
                None => model.category_id,
            };
            let frequency = match cmd.frequency {
                Some(frequency) => frequency.as_str().to_string(),
                None => model.frequency.clone(),
            };
            let status = match cmd.status {
                Some(status) => status.as_str().to_string(),
                None => model.status.clone(),
            };
            let next_billing_date = cmd.next_billing_date.unwrap_or(model.next_billing_date);

            let update = subscriptions::ActiveModel {
                id: ActiveValue::Set(cmd.subscription_id),
                name: ActiveValue::Set(name),
                amount_minor: ActiveValue::Set(amount_minor),
                frequency: ActiveValue::Set(frequency),
                next_billing_date: ActiveValue::Set(next_billing_date),
                account_id: ActiveValue::Set(account_id),
                category_id: ActiveValue::Set(category_id),
                status: ActiveValue::Set(status),
                ..Default::default()
            };
            let updated = update.update(&db_tx).await?;
            Subscription::try_from(updated)
        })
    }

    /// Deletes a subscription. Past billing transactions stay untouched.
    pub async fn delete_subscription(
        &self,
        subscription_id: Uuid,
        owner: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_subscription(&db_tx, subscription_id, owner).await?;
            subscriptions::Entity::delete_by_id(subscription_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Bills one subscription: books the expense and advances the billing
    /// date, atomically. Only active subscriptions can be processed.
    pub async fn process_subscription(
        &self,
        subscription_id: Uuid,
        owner: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<ProcessedSubscription> {
        with_tx!(self, |db_tx| {
            let model = require_subscription(&db_tx, subscription_id, owner).await?;
            let subscription = Subscription::try_from(model)?;
            if subscription.status != SubscriptionStatus::Active {
                return Err(EngineError::Conflict(format!(
                    "subscription '{}' is not active",
                    subscription.name
                )));
            }

            let tx = Transaction::new(
                subscription.owner.clone(),
                subscription.account_id,
                None,
                TransactionKind::Expense,
                subscription.amount,
                Some(format!("Subscription: {}", subscription.name)),
                subscription.category_id,
                now,
            )?;
            let transaction_id = insert_transaction_with_effects(&db_tx, &tx).await?;

            let next_billing_date = recurrence::next_billing_date(
                subscription.next_billing_date,
                subscription.frequency,
            )?;
            let update = subscriptions::ActiveModel {
                id: ActiveValue::Set(subscription_id),
                next_billing_date: ActiveValue::Set(next_billing_date),
                ..Default::default()
            };
            update.update(&db_tx).await?;

            Ok(ProcessedSubscription {
                subscription_id,
                transaction_id,
                next_billing_date,
            })
        })
    }

    /// Processes every active subscription due by `as_of`.
    ///
    /// Best-effort: each subscription is its own transactional unit, and a
    /// failed item is logged and counted without aborting the rest.
    pub async fn process_due_subscriptions(
        &self,
        owner: Option<&str>,
        as_of: NaiveDate,
        now: DateTime<Utc>,
    ) -> ResultEngine<DueRunReport> {
        let mut query = subscriptions::Entity::find()
            .filter(
                subscriptions::Column::Status
                    .eq(SubscriptionStatus::Active.as_str().to_string()),
            )
            .filter(subscriptions::Column::NextBillingDate.lte(as_of))
            .order_by_asc(subscriptions::Column::NextBillingDate);
        if let Some(owner) = owner {
            query = query.filter(subscriptions::Column::Owner.eq(owner.to_string()));
        }
        let due = query.all(&self.database).await?;

        let mut report = DueRunReport::default();
        for model in due {
            match self.process_subscription(model.id, &model.owner, now).await {
                Ok(processed) => {
                    tracing::debug!(
                        subscription_id = %processed.subscription_id,
                        next_billing_date = %processed.next_billing_date,
                        "processed due subscription"
                    );
                    report.processed += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        subscription_id = %model.id,
                        "failed to process subscription: {err}"
                    );
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }
}
