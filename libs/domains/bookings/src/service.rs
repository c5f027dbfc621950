use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::clock::Clock;
use crate::collaborators::{ItemCatalog, ItemRef, UserDirectory};
use crate::error::{BookingError, BookingResult};
use crate::models::{
    Booking, BookingState, BookingStatus, BookingWindow, CreateBooking, PageRequest,
};
use crate::repository::BookingRepository;

/// Service layer for the booking lifecycle and availability queries
#[derive(Clone)]
pub struct BookingService<R: BookingRepository> {
    repository: Arc<R>,
    users: Arc<dyn UserDirectory>,
    items: Arc<dyn ItemCatalog>,
    clock: Arc<dyn Clock>,
}

impl<R: BookingRepository> BookingService<R> {
    pub fn new(
        repository: R,
        users: Arc<dyn UserDirectory>,
        items: Arc<dyn ItemCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            users,
            items,
            clock,
        }
    }

    async fn require_user(&self, id: Uuid) -> BookingResult<()> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(BookingError::UserNotFound(id))?;
        Ok(())
    }

    async fn require_item(&self, id: Uuid) -> BookingResult<ItemRef> {
        self.items
            .find_by_id(id)
            .await?
            .ok_or(BookingError::ItemNotFound(id))
    }

    /// Request a booking. The booking is persisted in `Waiting` status.
    ///
    /// An owner attempting to book their own item gets the same 404-shaped
    /// denial as a stranger probing a foreign booking.
    pub async fn create_booking(
        &self,
        booker_id: Uuid,
        input: CreateBooking,
    ) -> BookingResult<Booking> {
        input
            .validate()
            .map_err(|e| BookingError::Validation(e.to_string()))?;

        self.require_user(booker_id).await?;
        let item = self.require_item(input.item_id).await?;

        if !item.available {
            return Err(BookingError::Validation(format!(
                "Item {} is not available for booking",
                item.id
            )));
        }

        if item.owner_id == booker_id {
            return Err(BookingError::AccessDenied(item.id));
        }

        let booking = Booking::new(booker_id, item.owner_id, input);
        self.repository.create(booking).await
    }

    /// Get a booking; only the booker or the item owner may see it
    pub async fn get_booking(&self, id: Uuid, requester_id: Uuid) -> BookingResult<Booking> {
        let booking = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(BookingError::BookingNotFound(id))?;

        self.require_user(requester_id).await?;

        if booking.booker_id != requester_id && booking.item_owner_id != requester_id {
            return Err(BookingError::AccessDenied(id));
        }

        Ok(booking)
    }

    /// Decide a waiting booking: approve or reject. The decision is made
    /// once; an already-approved booking cannot be decided again.
    pub async fn approve(
        &self,
        id: Uuid,
        approver_id: Uuid,
        approved: bool,
    ) -> BookingResult<Booking> {
        let mut booking = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(BookingError::BookingNotFound(id))?;

        if booking.status == BookingStatus::Approved {
            return Err(BookingError::Validation(format!(
                "Booking {} is already approved",
                id
            )));
        }

        self.require_user(approver_id).await?;

        // The booker probing their own booking's decision endpoint gets
        // the not-found-shaped denial; anyone else who is not the owner
        // gets a validation error
        if booking.booker_id == approver_id {
            return Err(BookingError::AccessDenied(id));
        }
        if booking.item_owner_id != approver_id {
            return Err(BookingError::Validation(format!(
                "User {} may not decide booking {}",
                approver_id, id
            )));
        }

        booking.status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };
        booking.updated_at = self.clock.now();

        self.repository.update(booking).await
    }

    /// The requester's bookings as booker, filtered by state
    pub async fn list_for_booker(
        &self,
        booker_id: Uuid,
        state: BookingState,
        page: PageRequest,
    ) -> BookingResult<Vec<Booking>> {
        Self::require_page(page)?;
        self.require_user(booker_id).await?;

        let now = self.clock.now();
        self.repository
            .list_for_booker(booker_id, state, now, page)
            .await
    }

    /// Bookings on the requester's items, filtered by state
    pub async fn list_for_owner(
        &self,
        owner_id: Uuid,
        state: BookingState,
        page: PageRequest,
    ) -> BookingResult<Vec<Booking>> {
        Self::require_page(page)?;
        self.require_user(owner_id).await?;

        let now = self.clock.now();
        self.repository
            .list_for_owner(owner_id, state, now, page)
            .await
    }

    fn require_page(page: PageRequest) -> BookingResult<()> {
        if page.size == 0 {
            return Err(BookingError::Validation(
                "page size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Last and next approved booking of an item, for the owner's item view
    pub async fn booking_window(
        &self,
        item_id: Uuid,
    ) -> BookingResult<(Option<BookingWindow>, Option<BookingWindow>)> {
        let now = self.clock.now();

        let last = self
            .repository
            .find_last_for_item(item_id, BookingStatus::Approved, now)
            .await?;
        let next = self
            .repository
            .find_next_for_item(item_id, BookingStatus::Approved, now)
            .await?;

        Ok((
            last.as_ref().map(BookingWindow::from),
            next.as_ref().map(BookingWindow::from),
        ))
    }

    /// Batched booking windows for item listings; both directions consider
    /// approved bookings only
    pub async fn booking_windows(
        &self,
        item_ids: Vec<Uuid>,
    ) -> BookingResult<HashMap<Uuid, (Option<BookingWindow>, Option<BookingWindow>)>> {
        let now = self.clock.now();

        let mut last = self
            .repository
            .find_last_for_items(item_ids.clone(), BookingStatus::Approved, now)
            .await?;
        let mut next = self
            .repository
            .find_next_for_items(item_ids.clone(), BookingStatus::Approved, now)
            .await?;

        let mut windows = HashMap::with_capacity(item_ids.len());
        for item_id in item_ids {
            windows.insert(
                item_id,
                (
                    last.remove(&item_id).map(|b| BookingWindow::from(&b)),
                    next.remove(&item_id).map(|b| BookingWindow::from(&b)),
                ),
            );
        }

        Ok(windows)
    }

    /// Whether the user has an approved booking of the item that already
    /// ended. Gates commenting.
    pub async fn has_completed_booking(
        &self,
        item_id: Uuid,
        user_id: Uuid,
    ) -> BookingResult<bool> {
        let now = self.clock.now();
        self.repository
            .exists_completed(item_id, user_id, BookingStatus::Approved, now)
            .await
    }

    /// The request-level time snapshot, exposed for composition in the app
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
