use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::BookingStatus;

/// Sea-ORM Entity for the bookings table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_owner_id: Uuid,
    pub booker_id: Uuid,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    pub status: BookingStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Booking {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            item_id: model.item_id,
            item_owner_id: model.item_owner_id,
            booker_id: model.booker_id,
            start_date: model.start_date.into(),
            end_date: model.end_date.into(),
            status: model.status,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<crate::models::Booking> for ActiveModel {
    fn from(booking: crate::models::Booking) -> Self {
        ActiveModel {
            id: Set(booking.id),
            item_id: Set(booking.item_id),
            item_owner_id: Set(booking.item_owner_id),
            booker_id: Set(booking.booker_id),
            start_date: Set(booking.start_date.into()),
            end_date: Set(booking.end_date.into()),
            status: Set(booking.status),
            created_at: Set(booking.created_at.into()),
            updated_at: Set(booking.updated_at.into()),
        }
    }
}
