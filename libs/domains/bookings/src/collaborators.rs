//! Contracts the booking domain needs from the rest of the system.
//!
//! The API app implements these over the user and item services; the
//! in-memory versions here back unit and handler tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::BookingResult;

/// Minimal user projection the booking domain needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRef {
    pub id: Uuid,
}

/// Minimal item projection: ownership and availability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRef {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub available: bool,
}

/// Lookup of users by id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> BookingResult<Option<UserRef>>;
}

/// Lookup of items by id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> BookingResult<Option<ItemRef>>;
}

/// In-memory UserDirectory for tests and local development
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<Uuid, UserRef>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: UserRef) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> BookingResult<Option<UserRef>> {
        Ok(self.users.read().await.get(&id).copied())
    }
}

/// In-memory ItemCatalog for tests and local development
#[derive(Debug, Default, Clone)]
pub struct InMemoryItemCatalog {
    items: Arc<RwLock<HashMap<Uuid, ItemRef>>>,
}

impl InMemoryItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, item: ItemRef) {
        self.items.write().await.insert(item.id, item);
    }
}

#[async_trait]
impl ItemCatalog for InMemoryItemCatalog {
    async fn find_by_id(&self, id: Uuid) -> BookingResult<Option<ItemRef>> {
        Ok(self.items.read().await.get(&id).copied())
    }
}
