use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Tag, tags, transaction_tags, util};

use super::{Engine, require_tag, with_tx};

impl Engine {
    /// Creates a tag; names are unique per owner.
    pub async fn new_tag(&self, owner: &str, name: &str) -> ResultEngine<Tag> {
        let name = util::required_name(name, "tag")?;

        let existing = tags::Entity::find()
            .filter(tags::Column::Owner.eq(owner.to_string()))
            .filter(tags::Column::Name.eq(name.clone()))
            .one(&self.database)
            .await?;
        if existing.is_some() {
            return Err(EngineError::Conflict(format!(
                "tag '{name}' already exists"
            )));
        }

        let tag = Tag {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            name,
        };
        tags::ActiveModel::from(&tag).insert(&self.database).await?;
        Ok(tag)
    }

    /// Lists the owner's tags.
    pub async fn tags(&self, owner: &str) -> ResultEngine<Vec<Tag>> {
        let models = tags::Entity::find()
            .filter(tags::Column::Owner.eq(owner.to_string()))
            .order_by_asc(tags::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Tag::from).collect())
    }

    /// Deletes a tag and detaches it from every transaction.
    pub async fn delete_tag(&self, tag_id: Uuid, owner: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_tag(&db_tx, tag_id, owner).await?;
            transaction_tags::Entity::delete_many()
                .filter(transaction_tags::Column::TagId.eq(tag_id))
                .exec(&db_tx)
                .await?;
            tags::Entity::delete_by_id(tag_id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
