use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{BookingError, BookingResult};
use crate::models::{Booking, BookingState, BookingStatus, PageRequest};

/// Repository facade for Booking persistence.
///
/// Every time-relative query takes `now` as a parameter rather than
/// reading the clock itself, so one request-level snapshot governs all
/// filtering.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking
    async fn create(&self, booking: Booking) -> BookingResult<Booking>;

    /// Persist a changed booking (status transitions)
    async fn update(&self, booking: Booking) -> BookingResult<Booking>;

    /// Get a booking by ID
    async fn get_by_id(&self, id: Uuid) -> BookingResult<Option<Booking>>;

    /// Bookings placed by this booker, state-filtered, newest start first
    async fn list_for_booker(
        &self,
        booker_id: Uuid,
        state: BookingState,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> BookingResult<Vec<Booking>>;

    /// Bookings on this owner's items, state-filtered, newest start first
    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        state: BookingState,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> BookingResult<Vec<Booking>>;

    /// Latest booking of the item with `start <= now` and the given status
    async fn find_last_for_item(
        &self,
        item_id: Uuid,
        status: BookingStatus,
        now: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>>;

    /// Earliest booking of the item with `start > now` and the given status
    async fn find_next_for_item(
        &self,
        item_id: Uuid,
        status: BookingStatus,
        now: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>>;

    /// Batched [`find_last_for_item`](Self::find_last_for_item): at most
    /// one booking per item
    async fn find_last_for_items(
        &self,
        item_ids: Vec<Uuid>,
        status: BookingStatus,
        now: DateTime<Utc>,
    ) -> BookingResult<HashMap<Uuid, Booking>>;

    /// Batched [`find_next_for_item`](Self::find_next_for_item)
    async fn find_next_for_items(
        &self,
        item_ids: Vec<Uuid>,
        status: BookingStatus,
        now: DateTime<Utc>,
    ) -> BookingResult<HashMap<Uuid, Booking>>;

    /// Whether the booker has a booking of the item with the given status
    /// that ended before `before`
    async fn exists_completed(
        &self,
        item_id: Uuid,
        booker_id: Uuid,
        status: BookingStatus,
        before: DateTime<Utc>,
    ) -> BookingResult<bool>;
}

/// In-memory implementation of BookingRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<HashMap<Uuid, Booking>>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn paginate(mut bookings: Vec<Booking>, page: PageRequest) -> Vec<Booking> {
        bookings.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        bookings
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .collect()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create(&self, booking: Booking) -> BookingResult<Booking> {
        let mut bookings = self.bookings.write().await;
        bookings.insert(booking.id, booking.clone());

        tracing::info!(booking_id = %booking.id, item_id = %booking.item_id, "Created booking");
        Ok(booking)
    }

    async fn update(&self, booking: Booking) -> BookingResult<Booking> {
        let mut bookings = self.bookings.write().await;

        if !bookings.contains_key(&booking.id) {
            return Err(BookingError::BookingNotFound(booking.id));
        }
        bookings.insert(booking.id, booking.clone());

        tracing::info!(booking_id = %booking.id, status = %booking.status, "Updated booking");
        Ok(booking)
    }

    async fn get_by_id(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.get(&id).cloned())
    }

    async fn list_for_booker(
        &self,
        booker_id: Uuid,
        state: BookingState,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> BookingResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;

        let matching: Vec<Booking> = bookings
            .values()
            .filter(|b| b.booker_id == booker_id && state.matches(b, now))
            .cloned()
            .collect();

        Ok(Self::paginate(matching, page))
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        state: BookingState,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> BookingResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;

        let matching: Vec<Booking> = bookings
            .values()
            .filter(|b| b.item_owner_id == owner_id && state.matches(b, now))
            .cloned()
            .collect();

        Ok(Self::paginate(matching, page))
    }

    async fn find_last_for_item(
        &self,
        item_id: Uuid,
        status: BookingStatus,
        now: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>> {
        let bookings = self.bookings.read().await;

        Ok(bookings
            .values()
            .filter(|b| b.item_id == item_id && b.status == status && b.start_date <= now)
            .max_by_key(|b| b.start_date)
            .cloned())
    }

    async fn find_next_for_item(
        &self,
        item_id: Uuid,
        status: BookingStatus,
        now: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>> {
        let bookings = self.bookings.read().await;

        Ok(bookings
            .values()
            .filter(|b| b.item_id == item_id && b.status == status && b.start_date > now)
            .min_by_key(|b| b.start_date)
            .cloned())
    }

    async fn find_last_for_items(
        &self,
        item_ids: Vec<Uuid>,
        status: BookingStatus,
        now: DateTime<Utc>,
    ) -> BookingResult<HashMap<Uuid, Booking>> {
        let bookings = self.bookings.read().await;

        let mut result: HashMap<Uuid, Booking> = HashMap::new();
        for booking in bookings.values() {
            if !item_ids.contains(&booking.item_id)
                || booking.status != status
                || booking.start_date > now
            {
                continue;
            }
            match result.get(&booking.item_id) {
                Some(existing) if existing.start_date >= booking.start_date => {}
                _ => {
                    result.insert(booking.item_id, booking.clone());
                }
            }
        }

        Ok(result)
    }

    async fn find_next_for_items(
        &self,
        item_ids: Vec<Uuid>,
        status: BookingStatus,
        now: DateTime<Utc>,
    ) -> BookingResult<HashMap<Uuid, Booking>> {
        let bookings = self.bookings.read().await;

        let mut result: HashMap<Uuid, Booking> = HashMap::new();
        for booking in bookings.values() {
            if !item_ids.contains(&booking.item_id)
                || booking.status != status
                || booking.start_date <= now
            {
                continue;
            }
            match result.get(&booking.item_id) {
                Some(existing) if existing.start_date <= booking.start_date => {}
                _ => {
                    result.insert(booking.item_id, booking.clone());
                }
            }
        }

        Ok(result)
    }

    async fn exists_completed(
        &self,
        item_id: Uuid,
        booker_id: Uuid,
        status: BookingStatus,
        before: DateTime<Utc>,
    ) -> BookingResult<bool> {
        let bookings = self.bookings.read().await;

        Ok(bookings.values().any(|b| {
            b.item_id == item_id
                && b.booker_id == booker_id
                && b.status == status
                && b.end_date < before
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateBooking;
    use chrono::Duration;

    fn booking_at(
        item_id: Uuid,
        booker_id: Uuid,
        status: BookingStatus,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Booking {
        let mut b = Booking::new(
            booker_id,
            Uuid::now_v7(),
            CreateBooking {
                item_id,
                start_date: start,
                end_date: end,
            },
        );
        b.status = status;
        b
    }

    #[tokio::test]
    async fn test_list_for_booker_orders_by_start_desc() {
        let repo = InMemoryBookingRepository::new();
        let now = Utc::now();
        let booker = Uuid::now_v7();
        let item = Uuid::now_v7();

        for days in [1, 3, 2] {
            repo.create(booking_at(
                item,
                booker,
                BookingStatus::Waiting,
                now + Duration::days(days),
                now + Duration::days(days) + Duration::hours(4),
            ))
            .await
            .unwrap();
        }

        let listed = repo
            .list_for_booker(booker, BookingState::All, now, PageRequest::default())
            .await
            .unwrap();

        let starts: Vec<_> = listed.iter().map(|b| b.start_date).collect();
        let mut sorted = starts.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(starts, sorted);
        assert_eq!(listed.len(), 3);
    }

    #[tokio::test]
    async fn test_pagination_truncates_from() {
        let repo = InMemoryBookingRepository::new();
        let now = Utc::now();
        let booker = Uuid::now_v7();
        let item = Uuid::now_v7();

        for days in [1, 2, 3] {
            repo.create(booking_at(
                item,
                booker,
                BookingStatus::Waiting,
                now + Duration::days(days),
                now + Duration::days(days) + Duration::hours(4),
            ))
            .await
            .unwrap();
        }

        // from=2, size=1 lands on page 2, i.e. the third booking in
        // start-descending order (the earliest start)
        let page = repo
            .list_for_booker(booker, BookingState::All, now, PageRequest::new(2, 1))
            .await
            .unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].start_date, now + Duration::days(1));
    }

    #[tokio::test]
    async fn test_last_and_next_for_item() {
        let repo = InMemoryBookingRepository::new();
        let now = Utc::now();
        let item = Uuid::now_v7();
        let booker = Uuid::now_v7();

        let past1 = booking_at(
            item,
            booker,
            BookingStatus::Approved,
            now - Duration::days(5),
            now - Duration::days(4),
        );
        let past2 = booking_at(
            item,
            booker,
            BookingStatus::Approved,
            now - Duration::days(2),
            now - Duration::days(1),
        );
        let future1 = booking_at(
            item,
            booker,
            BookingStatus::Approved,
            now + Duration::days(1),
            now + Duration::days(2),
        );
        let future2 = booking_at(
            item,
            booker,
            BookingStatus::Approved,
            now + Duration::days(4),
            now + Duration::days(5),
        );

        for b in [&past1, &past2, &future1, &future2] {
            repo.create(b.clone()).await.unwrap();
        }

        let last = repo
            .find_last_for_item(item, BookingStatus::Approved, now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(last.id, past2.id);

        let next = repo
            .find_next_for_item(item, BookingStatus::Approved, now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.id, future1.id);
    }

    #[tokio::test]
    async fn test_running_booking_is_the_last() {
        let repo = InMemoryBookingRepository::new();
        let now = Utc::now();
        let item = Uuid::now_v7();
        let booker = Uuid::now_v7();

        // Started in the past, still running; only start_date is compared
        // against now, so this counts as "last" even though it has not ended
        let running = booking_at(
            item,
            booker,
            BookingStatus::Approved,
            now - Duration::days(2),
            now + Duration::days(5),
        );
        repo.create(running.clone()).await.unwrap();

        let last = repo
            .find_last_for_item(item, BookingStatus::Approved, now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(last.id, running.id);

        let next = repo
            .find_next_for_item(item, BookingStatus::Approved, now)
            .await
            .unwrap();
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn test_batched_lookups_agree_with_single_item() {
        let repo = InMemoryBookingRepository::new();
        let now = Utc::now();
        let booker = Uuid::now_v7();
        let item_a = Uuid::now_v7();
        let item_b = Uuid::now_v7();

        for (item, days) in [(item_a, -3), (item_a, 2), (item_b, -1), (item_b, 5)] {
            repo.create(booking_at(
                item,
                booker,
                BookingStatus::Approved,
                now + Duration::days(days),
                now + Duration::days(days) + Duration::hours(4),
            ))
            .await
            .unwrap();
        }

        let last_batch = repo
            .find_last_for_items(vec![item_a, item_b], BookingStatus::Approved, now)
            .await
            .unwrap();
        let next_batch = repo
            .find_next_for_items(vec![item_a, item_b], BookingStatus::Approved, now)
            .await
            .unwrap();

        for item in [item_a, item_b] {
            let last_single = repo
                .find_last_for_item(item, BookingStatus::Approved, now)
                .await
                .unwrap();
            let next_single = repo
                .find_next_for_item(item, BookingStatus::Approved, now)
                .await
                .unwrap();

            assert_eq!(
                last_batch.get(&item).map(|b| b.id),
                last_single.map(|b| b.id)
            );
            assert_eq!(
                next_batch.get(&item).map(|b| b.id),
                next_single.map(|b| b.id)
            );
        }
    }

    #[tokio::test]
    async fn test_exists_completed_requires_ended_booking() {
        let repo = InMemoryBookingRepository::new();
        let now = Utc::now();
        let item = Uuid::now_v7();
        let booker = Uuid::now_v7();

        // Approved but still running: does not count
        repo.create(booking_at(
            item,
            booker,
            BookingStatus::Approved,
            now - Duration::days(1),
            now + Duration::days(1),
        ))
        .await
        .unwrap();

        assert!(
            !repo
                .exists_completed(item, booker, BookingStatus::Approved, now)
                .await
                .unwrap()
        );

        repo.create(booking_at(
            item,
            booker,
            BookingStatus::Approved,
            now - Duration::days(3),
            now - Duration::days(2),
        ))
        .await
        .unwrap();

        assert!(
            repo.exists_completed(item, booker, BookingStatus::Approved, now)
                .await
                .unwrap()
        );
    }
}
