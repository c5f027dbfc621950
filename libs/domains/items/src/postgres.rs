use async_trait::async_trait;
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    entity,
    error::{ItemError, ItemResult},
    models::{Comment, CreateItem, Item, ItemFilter, UpdateItem},
    repository::ItemRepository,
};

#[derive(Clone)]
pub struct PgItemRepository {
    db: DatabaseConnection,
}

impl PgItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn create(&self, owner_id: Uuid, input: CreateItem) -> ItemResult<Item> {
        let item = Item::new(owner_id, input);
        let active_model: entity::ActiveModel = item.into();

        let model = entity::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| ItemError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(item_id = %model.id, owner_id = %owner_id, "Created item");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ItemError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(|m| m.into()))
    }

    async fn update(&self, id: Uuid, input: UpdateItem) -> ItemResult<Item> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ItemError::Internal(format!("Database error: {}", e)))?
            .ok_or(ItemError::NotFound(id))?;

        let mut item: Item = model.into();
        item.apply_update(input);

        let active_model: entity::ActiveModel = item.into();
        let updated = entity::Entity::update(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| ItemError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(item_id = %id, "Updated item");
        Ok(updated.into())
    }

    async fn list_by_owner(&self, owner_id: Uuid, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        let models = entity::Entity::find()
            .filter(entity::Column::OwnerId.eq(owner_id))
            .order_by_asc(entity::Column::CreatedAt)
            .limit(filter.limit as u64)
            .offset(filter.offset as u64)
            .all(&self.db)
            .await
            .map_err(|e| ItemError::Internal(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn search(&self, text: &str, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        let pattern = format!("%{}%", text);

        let models = entity::Entity::find()
            .filter(entity::Column::Available.eq(true))
            .filter(
                Condition::any()
                    .add(Expr::col(entity::Column::Name).ilike(pattern.clone()))
                    .add(Expr::col(entity::Column::Description).ilike(pattern)),
            )
            .order_by_asc(entity::Column::CreatedAt)
            .limit(filter.limit as u64)
            .offset(filter.offset as u64)
            .all(&self.db)
            .await
            .map_err(|e| ItemError::Internal(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn add_comment(&self, comment: Comment) -> ItemResult<Comment> {
        let active_model: entity::comment::ActiveModel = comment.into();

        let model = entity::comment::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| ItemError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(comment_id = %model.id, item_id = %model.item_id, "Added comment");
        Ok(model.into())
    }

    async fn list_comments(&self, item_id: Uuid) -> ItemResult<Vec<Comment>> {
        let models = entity::comment::Entity::find()
            .filter(entity::comment::Column::ItemId.eq(item_id))
            .order_by_asc(entity::comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ItemError::Internal(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn list_comments_for_items(
        &self,
        item_ids: Vec<Uuid>,
    ) -> ItemResult<HashMap<Uuid, Vec<Comment>>> {
        if item_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let models = entity::comment::Entity::find()
            .filter(entity::comment::Column::ItemId.is_in(item_ids))
            .order_by_asc(entity::comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ItemError::Internal(format!("Database error: {}", e)))?;

        let mut grouped: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for model in models {
            grouped
                .entry(model.item_id)
                .or_default()
                .push(model.into());
        }

        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ItemService;

    // The API app clones its state (and the services inside it) into
    // every router, so the Pg-backed stack must stay Clone.
    #[test]
    fn test_pg_backed_service_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<PgItemRepository>();
        assert_clone::<ItemService<PgItemRepository>>();
    }
}
