use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ItemError, ItemResult};
use crate::models::{Comment, CreateComment, CreateItem, Item, ItemFilter, UpdateItem};
use crate::repository::ItemRepository;

/// Service layer for Item business logic
#[derive(Clone)]
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List a new item for the given owner
    pub async fn create_item(&self, owner_id: Uuid, input: CreateItem) -> ItemResult<Item> {
        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;

        self.repository.create(owner_id, input).await
    }

    /// Get an item by ID
    pub async fn get_item(&self, id: Uuid) -> ItemResult<Item> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id))
    }

    /// Update an item; only the owner may edit
    pub async fn update_item(
        &self,
        id: Uuid,
        requester_id: Uuid,
        input: UpdateItem,
    ) -> ItemResult<Item> {
        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;

        let item = self.get_item(id).await?;

        if item.owner_id != requester_id {
            return Err(ItemError::AccessDenied(id));
        }

        self.repository.update(id, input).await
    }

    /// List the requester's own items
    pub async fn list_owner_items(
        &self,
        owner_id: Uuid,
        filter: ItemFilter,
    ) -> ItemResult<Vec<Item>> {
        self.repository.list_by_owner(owner_id, filter).await
    }

    /// Search available items by text; a blank query matches nothing
    pub async fn search_items(&self, text: &str, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        self.repository.search(text, filter).await
    }

    /// Post a comment on an item. Eligibility (a completed booking by the
    /// author) is checked by the caller, which owns the booking facade.
    pub async fn add_comment(
        &self,
        item_id: Uuid,
        author_id: Uuid,
        author_name: String,
        input: CreateComment,
    ) -> ItemResult<Comment> {
        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;

        // Item must exist before attaching a comment
        self.get_item(item_id).await?;

        let comment = Comment::new(item_id, author_id, author_name, input.text);
        self.repository.add_comment(comment).await
    }

    /// List comments on an item, oldest first
    pub async fn list_comments(&self, item_id: Uuid) -> ItemResult<Vec<Comment>> {
        self.repository.list_comments(item_id).await
    }

    /// Batched comment lookup for annotated owner listings
    pub async fn comments_for_items(
        &self,
        item_ids: Vec<Uuid>,
    ) -> ItemResult<HashMap<Uuid, Vec<Comment>>> {
        self.repository.list_comments_for_items(item_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockItemRepository;
    use chrono::Utc;

    fn item_owned_by(owner_id: Uuid) -> Item {
        Item {
            id: Uuid::now_v7(),
            owner_id,
            name: "Drill".to_string(),
            description: "Cordless drill".to_string(),
            available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_denied() {
        let mut mock_repo = MockItemRepository::new();
        let owner = Uuid::now_v7();
        let stranger = Uuid::now_v7();
        let item = item_owned_by(owner);
        let item_id = item.id;

        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(item.clone())));

        let service = ItemService::new(mock_repo);
        let result = service
            .update_item(
                item_id,
                stranger,
                UpdateItem {
                    available: Some(false),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ItemError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn test_blank_search_skips_repository() {
        // No expectations set: any repository call would panic
        let mock_repo = MockItemRepository::new();
        let service = ItemService::new(mock_repo);

        let found = service
            .search_items("   ", ItemFilter::default())
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_comment_on_missing_item_is_not_found() {
        let mut mock_repo = MockItemRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));

        let service = ItemService::new(mock_repo);
        let result = service
            .add_comment(
                Uuid::now_v7(),
                Uuid::now_v7(),
                "Bob".to_string(),
                CreateComment {
                    text: "Nice".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(ItemError::NotFound(_))));
    }
}
