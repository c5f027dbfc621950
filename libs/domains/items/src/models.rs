use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A lendable item offered by its owner
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Unique identifier
    pub id: Uuid,
    /// Owner of the item
    pub owner_id: Uuid,
    /// Short display name
    pub name: String,
    /// Free-form description, searched together with the name
    pub description: String,
    /// Whether the item can currently be booked
    pub available: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A comment left on an item by a renter after a completed booking
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub item_id: Uuid,
    pub author_id: Uuid,
    /// Author display name, denormalized at creation time
    pub author_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// DTO for listing a new item
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub available: bool,
}

/// DTO for updating an item; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateItem {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// DTO for posting a comment
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

/// Pagination for owner listings and search
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct ItemFilter {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for ItemFilter {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl Item {
    /// Create a new item from the CreateItem DTO
    pub fn new(owner_id: Uuid, input: CreateItem) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            owner_id,
            name: input.name,
            description: input.description,
            available: input.available,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update
    pub fn apply_update(&mut self, update: UpdateItem) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(available) = update.available {
            self.available = available;
        }
        self.updated_at = Utc::now();
    }
}

impl Comment {
    pub fn new(item_id: Uuid, author_id: Uuid, author_name: String, text: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            item_id,
            author_id,
            author_name,
            text,
            created_at: Utc::now(),
        }
    }
}
