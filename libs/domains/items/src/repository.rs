use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ItemError, ItemResult};
use crate::models::{Comment, CreateItem, Item, ItemFilter, UpdateItem};

/// Repository trait for Item and Comment persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Create a new item for the given owner
    async fn create(&self, owner_id: Uuid, input: CreateItem) -> ItemResult<Item>;

    /// Get an item by ID
    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>>;

    /// Update an existing item
    async fn update(&self, id: Uuid, input: UpdateItem) -> ItemResult<Item>;

    /// List an owner's items, oldest first
    async fn list_by_owner(&self, owner_id: Uuid, filter: ItemFilter) -> ItemResult<Vec<Item>>;

    /// Case-insensitive substring search over name and description,
    /// restricted to available items
    async fn search(&self, text: &str, filter: ItemFilter) -> ItemResult<Vec<Item>>;

    /// Persist a comment
    async fn add_comment(&self, comment: Comment) -> ItemResult<Comment>;

    /// List comments on one item, oldest first
    async fn list_comments(&self, item_id: Uuid) -> ItemResult<Vec<Comment>>;

    /// Batched comment lookup for the owner listing
    async fn list_comments_for_items(
        &self,
        item_ids: Vec<Uuid>,
    ) -> ItemResult<HashMap<Uuid, Vec<Comment>>>;
}

/// In-memory implementation of ItemRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryItemRepository {
    items: Arc<RwLock<HashMap<Uuid, Item>>>,
    comments: Arc<RwLock<HashMap<Uuid, Comment>>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn create(&self, owner_id: Uuid, input: CreateItem) -> ItemResult<Item> {
        let mut items = self.items.write().await;

        let item = Item::new(owner_id, input);
        items.insert(item.id, item.clone());

        tracing::info!(item_id = %item.id, owner_id = %owner_id, "Created item");
        Ok(item)
    }

    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, input: UpdateItem) -> ItemResult<Item> {
        let mut items = self.items.write().await;

        let item = items.get_mut(&id).ok_or(ItemError::NotFound(id))?;
        item.apply_update(input);
        let updated = item.clone();

        tracing::info!(item_id = %id, "Updated item");
        Ok(updated)
    }

    async fn list_by_owner(&self, owner_id: Uuid, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        let items = self.items.read().await;

        let mut result: Vec<Item> = items
            .values()
            .filter(|i| i.owner_id == owner_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(result
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }

    async fn search(&self, text: &str, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        let items = self.items.read().await;
        let needle = text.to_lowercase();

        let mut result: Vec<Item> = items
            .values()
            .filter(|i| {
                i.available
                    && (i.name.to_lowercase().contains(&needle)
                        || i.description.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(result
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }

    async fn add_comment(&self, comment: Comment) -> ItemResult<Comment> {
        let mut comments = self.comments.write().await;
        comments.insert(comment.id, comment.clone());

        tracing::info!(comment_id = %comment.id, item_id = %comment.item_id, "Added comment");
        Ok(comment)
    }

    async fn list_comments(&self, item_id: Uuid) -> ItemResult<Vec<Comment>> {
        let comments = self.comments.read().await;

        let mut result: Vec<Comment> = comments
            .values()
            .filter(|c| c.item_id == item_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(result)
    }

    async fn list_comments_for_items(
        &self,
        item_ids: Vec<Uuid>,
    ) -> ItemResult<HashMap<Uuid, Vec<Comment>>> {
        let comments = self.comments.read().await;

        let mut grouped: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for comment in comments.values() {
            if item_ids.contains(&comment.item_id) {
                grouped
                    .entry(comment.item_id)
                    .or_default()
                    .push(comment.clone());
            }
        }
        for list in grouped.values_mut() {
            list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        }

        Ok(grouped)
    }
}
