//! Shared application state and the adapters that let the booking domain
//! look up users and items through its collaborator traits.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use domain_bookings::{
    BookingError, BookingResult, BookingService, ItemCatalog, ItemRef, PgBookingRepository,
    SystemClock, UserDirectory, UserRef,
};
use domain_items::{ItemError, ItemService, PgItemRepository};
use domain_users::{PgUserRepository, UserError, UserService};

use crate::config::Config;

/// Shared application state, cloned per handler (cheap Arc clones)
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    /// PostgreSQL connection pool, kept for readiness checks and shutdown
    pub db: DatabaseConnection,
    pub users: UserService<PgUserRepository>,
    pub items: ItemService<PgItemRepository>,
    pub bookings: BookingService<PgBookingRepository>,
}

impl AppState {
    pub fn new(config: Config, db: DatabaseConnection) -> Self {
        let users = UserService::new(PgUserRepository::new(db.clone()));
        let items = ItemService::new(PgItemRepository::new(db.clone()));

        let bookings = BookingService::new(
            PgBookingRepository::new(db.clone()),
            Arc::new(UserDirectoryAdapter {
                users: users.clone(),
            }),
            Arc::new(ItemCatalogAdapter {
                items: items.clone(),
            }),
            Arc::new(SystemClock),
        );

        Self {
            config,
            db,
            users,
            items,
            bookings,
        }
    }
}

/// Booking-domain view of the user service
struct UserDirectoryAdapter {
    users: UserService<PgUserRepository>,
}

#[async_trait]
impl UserDirectory for UserDirectoryAdapter {
    async fn find_by_id(&self, id: Uuid) -> BookingResult<Option<UserRef>> {
        match self.users.get_user(id).await {
            Ok(user) => Ok(Some(UserRef { id: user.id })),
            Err(UserError::NotFound(_)) => Ok(None),
            Err(e) => Err(BookingError::Internal(e.to_string())),
        }
    }
}

/// Booking-domain view of the item service
struct ItemCatalogAdapter {
    items: ItemService<PgItemRepository>,
}

#[async_trait]
impl ItemCatalog for ItemCatalogAdapter {
    async fn find_by_id(&self, id: Uuid) -> BookingResult<Option<ItemRef>> {
        match self.items.get_item(id).await {
            Ok(item) => Ok(Some(ItemRef {
                id: item.id,
                owner_id: item.owner_id,
                available: item.available,
            })),
            Err(ItemError::NotFound(_)) => Ok(None),
            Err(e) => Err(BookingError::Internal(e.to_string())),
        }
    }
}
