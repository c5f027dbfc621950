use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    entity,
    error::{BookingError, BookingResult},
    models::{Booking, BookingState, BookingStatus, PageRequest},
    repository::BookingRepository,
};

#[derive(Clone)]
pub struct PgBookingRepository {
    db: DatabaseConnection,
}

impl PgBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, booking: Booking) -> BookingResult<Booking> {
        let active_model: entity::ActiveModel = booking.into();

        let model = entity::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| BookingError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(booking_id = %model.id, item_id = %model.item_id, "Created booking");
        Ok(model.into())
    }

    async fn update(&self, booking: Booking) -> BookingResult<Booking> {
        let id = booking.id;
        let active_model: entity::ActiveModel = booking.into();

        let model = entity::Entity::update(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| BookingError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(booking_id = %id, status = %model.status, "Updated booking");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| BookingError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(|m| m.into()))
    }

    async fn list_for_booker(
        &self,
        booker_id: Uuid,
        state: BookingState,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> BookingResult<Vec<Booking>> {
        let models = entity::Entity::find()
            .filter(entity::Column::BookerId.eq(booker_id))
            .filter(state.condition(now))
            .order_by_desc(entity::Column::StartDate)
            .limit(page.limit() as u64)
            .offset(page.offset() as u64)
            .all(&self.db)
            .await
            .map_err(|e| BookingError::Internal(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        state: BookingState,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> BookingResult<Vec<Booking>> {
        let models = entity::Entity::find()
            .filter(entity::Column::ItemOwnerId.eq(owner_id))
            .filter(state.condition(now))
            .order_by_desc(entity::Column::StartDate)
            .limit(page.limit() as u64)
            .offset(page.offset() as u64)
            .all(&self.db)
            .await
            .map_err(|e| BookingError::Internal(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn find_last_for_item(
        &self,
        item_id: Uuid,
        status: BookingStatus,
        now: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>> {
        let model = entity::Entity::find()
            .filter(entity::Column::ItemId.eq(item_id))
            .filter(entity::Column::Status.eq(status))
            .filter(entity::Column::StartDate.lte(now))
            .order_by_desc(entity::Column::StartDate)
            .one(&self.db)
            .await
            .map_err(|e| BookingError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(|m| m.into()))
    }

    async fn find_next_for_item(
        &self,
        item_id: Uuid,
        status: BookingStatus,
        now: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>> {
        let model = entity::Entity::find()
            .filter(entity::Column::ItemId.eq(item_id))
            .filter(entity::Column::Status.eq(status))
            .filter(entity::Column::StartDate.gt(now))
            .order_by_asc(entity::Column::StartDate)
            .one(&self.db)
            .await
            .map_err(|e| BookingError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(|m| m.into()))
    }

    async fn find_last_for_items(
        &self,
        item_ids: Vec<Uuid>,
        status: BookingStatus,
        now: DateTime<Utc>,
    ) -> BookingResult<HashMap<Uuid, Booking>> {
        if item_ids.is_empty() {
            return Ok(HashMap::new());
        }

        // Rows arrive newest start first; the first row seen per item wins
        let models = entity::Entity::find()
            .filter(entity::Column::ItemId.is_in(item_ids))
            .filter(entity::Column::Status.eq(status))
            .filter(entity::Column::StartDate.lte(now))
            .order_by_desc(entity::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| BookingError::Internal(format!("Database error: {}", e)))?;

        let mut result: HashMap<Uuid, Booking> = HashMap::new();
        for model in models {
            result.entry(model.item_id).or_insert_with(|| model.into());
        }

        Ok(result)
    }

    async fn find_next_for_items(
        &self,
        item_ids: Vec<Uuid>,
        status: BookingStatus,
        now: DateTime<Utc>,
    ) -> BookingResult<HashMap<Uuid, Booking>> {
        if item_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let models = entity::Entity::find()
            .filter(entity::Column::ItemId.is_in(item_ids))
            .filter(entity::Column::Status.eq(status))
            .filter(entity::Column::StartDate.gt(now))
            .order_by_asc(entity::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| BookingError::Internal(format!("Database error: {}", e)))?;

        let mut result: HashMap<Uuid, Booking> = HashMap::new();
        for model in models {
            result.entry(model.item_id).or_insert_with(|| model.into());
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
        let existing = entity::Entity::find()
            .filter(entity::Column::ItemId.eq(item_id))
            .filter(entity::Column::BookerId.eq(booker_id))
            .filter(entity::Column::Status.eq(status))
            .filter(entity::Column::EndDate.lt(before))
            .one(&self.db)
            .await
            .map_err(|e| BookingError::Internal(format!("Database error: {}", e)))?;

        Ok(existing.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::BookingService;

    // The API app clones its state (and the services inside it) into
    // every router, so the Pg-backed stack must stay Clone.
    #[test]
    fn test_pg_backed_service_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<PgBookingRepository>();
        assert_clone::<BookingService<PgBookingRepository>>();
    }
}
