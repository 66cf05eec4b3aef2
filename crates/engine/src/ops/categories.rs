use std::collections::HashSet;

use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Category, CategoryKind, EngineError, NewCategoryCmd, ResultEngine, UpdateCategoryCmd,
    categories, subscriptions, transactions, util,
};

use super::{Engine, require_category, with_tx};

async fn ensure_unique_name(
    db: &impl ConnectionTrait,
    owner: &str,
    name_norm: &str,
    exclude: Option<Uuid>,
) -> ResultEngine<()> {
    let mut query = categories::Entity::find()
        .filter(categories::Column::Owner.eq(owner.to_string()))
        .filter(categories::Column::NameNorm.eq(name_norm.to_string()));
    if let Some(exclude) = exclude {
        query = query.filter(categories::Column::Id.ne(exclude));
    }
    if query.one(db).await?.is_some() {
        return Err(EngineError::Conflict(format!(
            "category '{name_norm}' already exists"
        )));
    }
    Ok(())
}

/// Checks that attaching `category_id` under `parent` neither crosses kinds
/// nor closes a cycle.
async fn ensure_valid_parent(
    db: &impl ConnectionTrait,
    owner: &str,
    category_id: Uuid,
    kind: CategoryKind,
    parent: &categories::Model,
) -> ResultEngine<()> {
    if parent.id == category_id {
        return Err(EngineError::Conflict(
            "category cannot be its own parent".to_string(),
        ));
    }
    if parent.kind != kind.as_str() {
        return Err(EngineError::InvalidInput(
            "parent category must share the kind".to_string(),
        ));
    }

    // Walk up from the proposed parent; hitting the category again means the
    // assignment would close a cycle.
    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut current = parent.parent_id;
    while let Some(ancestor_id) = current {
        if ancestor_id == category_id {
            return Err(EngineError::Conflict(
                "category parent assignment would create a cycle".to_string(),
            ));
        }
        if !seen.insert(ancestor_id) {
            break;
        }
        current = require_category(db, ancestor_id, owner).await?.parent_id;
    }
    Ok(())
}

impl Engine {
    /// Creates a category, optionally attached under a parent of the same
    /// kind.
    pub async fn new_category(&self, cmd: NewCategoryCmd) -> ResultEngine<Category> {
        let name = util::required_name(&cmd.name, "category")?;
        let name_norm = util::normalize_name_key(&name);
        let id = Uuid::new_v4();

        with_tx!(self, |db_tx| {
            ensure_unique_name(&db_tx, &cmd.owner, &name_norm, None).await?;
            if let Some(parent_id) = cmd.parent_id {
                let parent = require_category(&db_tx, parent_id, &cmd.owner).await?;
                ensure_valid_parent(&db_tx, &cmd.owner, id, cmd.kind, &parent).await?;
            }

            let active = categories::ActiveModel {
                id: ActiveValue::Set(id),
                owner: ActiveValue::Set(cmd.owner.clone()),
                name: ActiveValue::Set(name.clone()),
                name_norm: ActiveValue::Set(name_norm.clone()),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                parent_id: ActiveValue::Set(cmd.parent_id),
            };
            active.insert(&db_tx).await?;

            Ok(Category {
                id,
                owner: cmd.owner.clone(),
                name: name.clone(),
                kind: cmd.kind,
                parent_id: cmd.parent_id,
            })
        })
    }

    /// Fetches a single category.
    pub async fn category(&self, category_id: Uuid, owner: &str) -> ResultEngine<Category> {
        let model = require_category(&self.database, category_id, owner).await?;
        Category::try_from(model)
    }

    /// Lists the owner's categories.
    pub async fn categories(&self, owner: &str) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(categories::Column::Owner.eq(owner.to_string()))
            .order_by_asc(categories::Column::NameNorm)
            .all(&self.database)
            .await?;
        models.into_iter().map(Category::try_from).collect()
    }

    /// Renames and/or re-parents a category.
    pub async fn update_category(&self, cmd: UpdateCategoryCmd) -> ResultEngine<Category> {
        if cmd.clear_parent && cmd.parent_id.is_some() {
            return Err(EngineError::InvalidInput(
                "parent_id and clear_parent are mutually exclusive".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let model = require_category(&db_tx, cmd.category_id, &cmd.owner).await?;
            let kind = CategoryKind::try_from(model.kind.as_str())?;

            let (name, name_norm) = match cmd.name.as_deref() {
                Some(name) => {
                    let name = util::required_name(name, "category")?;
                    let name_norm = util::normalize_name_key(&name);
                    ensure_unique_name(&db_tx, &cmd.owner, &name_norm, Some(cmd.category_id))
                        .await?;
                    (name, name_norm)
                }
                None => (model.name.clone(), model.name_norm.clone()),
            };

            let parent_id = if cmd.clear_parent {
                None
            } else {
                match cmd.parent_id {
                    Some(parent_id) => {
                        let parent = require_category(&db_tx, parent_id, &cmd.owner).await?;
                        ensure_valid_parent(&db_tx, &cmd.owner, cmd.category_id, kind, &parent)
                            .await?;
                        Some(parent_id)
                    }
                    None => model.parent_id,
                }
            };

            let update = categories::ActiveModel {
                id: ActiveValue::Set(cmd.category_id),
                name: ActiveValue::Set(name.clone()),
                name_norm: ActiveValue::Set(name_norm),
                parent_id: ActiveValue::Set(parent_id),
                ..Default::default()
            };
            let updated = update.update(&db_tx).await?;
            Category::try_from(updated)
        })
    }

    /// Deletes a category with no children.
    ///
    /// Transactions and subscriptions referencing it fall back to
    /// uncategorized inside the same unit.
    pub async fn delete_category(&self, category_id: Uuid, owner: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_category(&db_tx, category_id, owner).await?;

            let children = categories::Entity::find()
                .filter(categories::Column::ParentId.eq(category_id))
                .count(&db_tx)
                .await?;
            if children > 0 {
                return Err(EngineError::Conflict(
                    "category still has children".to_string(),
                ));
            }

            transactions::Entity::update_many()
                .col_expr(transactions::Column::CategoryId, Expr::value(Option::<Uuid>::None))
                .filter(transactions::Column::CategoryId.eq(category_id))
                .exec(&db_tx)
                .await?;
            subscriptions::Entity::update_many()
                .col_expr(
                    subscriptions::Column::CategoryId,
                    Expr::value(Option::<Uuid>::None),
                )
                .filter(subscriptions::Column::CategoryId.eq(category_id))
                .exec(&db_tx)
                .await?;

            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
