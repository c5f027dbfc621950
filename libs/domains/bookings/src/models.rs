use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, Condition, DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::entity;

/// Lifecycle status of a booking.
///
/// A booking is created `Waiting` and is moved to `Approved` or `Rejected`
/// exactly once by the item owner. `Canceled` is part of the status
/// vocabulary used by state filters, but no operation currently produces
/// it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "booking_status")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    #[sea_orm(string_value = "waiting")]
    Waiting,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

/// Query-time state filter for booking listings.
///
/// Classifies a booking from `(status, start_date, end_date)` against a
/// single `now` snapshot. The status sets are deliberately asymmetric
/// (e.g. `Current` admits `Rejected` bookings whose period is running,
/// `Past` admits `Canceled` ones); they reproduce the listing behavior
/// callers depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl BookingState {
    /// In-memory predicate over one booking at a pinned `now`
    pub fn matches(&self, booking: &Booking, now: DateTime<Utc>) -> bool {
        use BookingStatus::*;

        match self {
            BookingState::All => matches!(booking.status, Approved | Canceled | Rejected | Waiting),
            BookingState::Current => {
                matches!(booking.status, Approved | Rejected)
                    && booking.start_date < now
                    && booking.end_date > now
            }
            BookingState::Past => {
                matches!(booking.status, Canceled | Approved) && booking.end_date < now
            }
            BookingState::Future => {
                matches!(booking.status, Approved | Waiting) && booking.start_date > now
            }
            BookingState::Waiting => booking.status == Waiting && booking.start_date > now,
            BookingState::Rejected => booking.status == Rejected,
        }
    }

    /// The same classification as [`matches`](Self::matches), expressed as
    /// a SQL condition over the bookings table
    pub fn condition(&self, now: DateTime<Utc>) -> Condition {
        use BookingStatus::*;

        let status = entity::Column::Status;
        let start = entity::Column::StartDate;
        let end = entity::Column::EndDate;

        match self {
            BookingState::All => {
                Condition::all().add(status.is_in([Approved, Canceled, Rejected, Waiting]))
            }
            BookingState::Current => Condition::all()
                .add(status.is_in([Approved, Rejected]))
                .add(start.lt(now))
                .add(end.gt(now)),
            BookingState::Past => Condition::all()
                .add(status.is_in([Canceled, Approved]))
                .add(end.lt(now)),
            BookingState::Future => Condition::all()
                .add(status.is_in([Approved, Waiting]))
                .add(start.gt(now)),
            BookingState::Waiting => Condition::all()
                .add(status.eq(Waiting))
                .add(start.gt(now)),
            BookingState::Rejected => Condition::all().add(status.eq(Rejected)),
        }
    }
}

/// A booking of an item for a time period
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    /// Unique identifier
    pub id: Uuid,
    /// The booked item
    pub item_id: Uuid,
    /// Owner of the booked item, denormalized at creation time so state
    /// queries and authorization need no catalog lookup
    pub item_owner_id: Uuid,
    /// User who requested the booking
    pub booker_id: Uuid,
    /// Start of the booking period
    pub start_date: DateTime<Utc>,
    /// End of the booking period
    pub end_date: DateTime<Utc>,
    /// Current lifecycle status
    pub status: BookingStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for requesting a booking
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_booking_period"))]
pub struct CreateBooking {
    pub item_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

fn validate_booking_period(input: &CreateBooking) -> Result<(), validator::ValidationError> {
    if input.end_date <= input.start_date {
        return Err(validator::ValidationError::new("period")
            .with_message("end date must be after start date".into()));
    }
    if input.start_date < Utc::now() {
        return Err(validator::ValidationError::new("period")
            .with_message("start date must not be in the past".into()));
    }
    Ok(())
}

/// Offset pagination as exposed on the listing endpoints.
///
/// `from` is an element offset, but it is first truncated to a page
/// boundary: `page = from / size` (integer division), `offset = page *
/// size`. `from = 5, size = 3` therefore starts at element 3, not 5.
/// Long-standing observable behavior, kept as is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct PageRequest {
    #[serde(default)]
    pub from: usize,
    #[serde(default = "default_page_size")]
    pub size: usize,
}

fn default_page_size() -> usize {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            from: 0,
            size: default_page_size(),
        }
    }
}

impl PageRequest {
    pub fn new(from: usize, size: usize) -> Self {
        Self { from, size }
    }

    /// Page index after truncation. Callers must reject `size == 0` first.
    pub fn page(&self) -> usize {
        if self.from > 0 { self.from / self.size } else { 0 }
    }

    pub fn offset(&self) -> usize {
        self.page() * self.size
    }

    pub fn limit(&self) -> usize {
        self.size
    }
}

/// Short booking projection attached to item views
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingWindow {
    pub id: Uuid,
    pub booker_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<&Booking> for BookingWindow {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            booker_id: booking.booker_id,
            start_date: booking.start_date,
            end_date: booking.end_date,
        }
    }
}

impl Booking {
    /// Create a new booking in `Waiting` status
    pub fn new(booker_id: Uuid, item_owner_id: Uuid, input: CreateBooking) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            item_id: input.item_id,
            item_owner_id,
            booker_id,
            start_date: input.start_date,
            end_date: input.end_date,
            status: BookingStatus::Waiting,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::sea_query::{PostgresQueryBuilder, Query};

    fn booking(status: BookingStatus, start: DateTime<Utc>, end: DateTime<Utc>) -> Booking {
        Booking {
            id: Uuid::now_v7(),
            item_id: Uuid::now_v7(),
            item_owner_id: Uuid::now_v7(),
            booker_id: Uuid::now_v7(),
            start_date: start,
            end_date: end,
            status,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_state_parses_case_insensitively() {
        assert_eq!("CURRENT".parse::<BookingState>().unwrap(), BookingState::Current);
        assert_eq!("waiting".parse::<BookingState>().unwrap(), BookingState::Waiting);
        assert_eq!("Past".parse::<BookingState>().unwrap(), BookingState::Past);
        assert!("SOMETHING".parse::<BookingState>().is_err());
    }

    #[test]
    fn test_status_db_values_match_display() {
        use sea_orm::ActiveEnum;

        // The database string representation comes from the ActiveEnum
        // impl alone; Display must stay in sync with it
        for status in [
            BookingStatus::Waiting,
            BookingStatus::Approved,
            BookingStatus::Rejected,
            BookingStatus::Canceled,
        ] {
            assert_eq!(status.to_value(), status.to_string());
            assert_eq!(
                BookingStatus::try_from_value(&status.to_value()).unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_current_admits_rejected_with_running_period() {
        let now = Utc::now();
        let running = booking(
            BookingStatus::Rejected,
            now - Duration::hours(1),
            now + Duration::hours(1),
        );

        assert!(BookingState::Current.matches(&running, now));
        assert!(BookingState::Rejected.matches(&running, now));
        assert!(!BookingState::Past.matches(&running, now));
        assert!(!BookingState::Future.matches(&running, now));
    }

    #[test]
    fn test_past_admits_canceled_and_approved_only() {
        let now = Utc::now();
        let start = now - Duration::days(2);
        let end = now - Duration::days(1);

        assert!(BookingState::Past.matches(&booking(BookingStatus::Canceled, start, end), now));
        assert!(BookingState::Past.matches(&booking(BookingStatus::Approved, start, end), now));
        assert!(!BookingState::Past.matches(&booking(BookingStatus::Rejected, start, end), now));
        assert!(!BookingState::Past.matches(&booking(BookingStatus::Waiting, start, end), now));
    }

    #[test]
    fn test_future_admits_approved_and_waiting() {
        let now = Utc::now();
        let start = now + Duration::days(1);
        let end = now + Duration::days(2);

        assert!(BookingState::Future.matches(&booking(BookingStatus::Approved, start, end), now));
        assert!(BookingState::Future.matches(&booking(BookingStatus::Waiting, start, end), now));
        assert!(!BookingState::Future.matches(&booking(BookingStatus::Rejected, start, end), now));
        assert!(!BookingState::Future.matches(&booking(BookingStatus::Canceled, start, end), now));
    }

    #[test]
    fn test_rejected_ignores_time() {
        let now = Utc::now();
        let past = booking(
            BookingStatus::Rejected,
            now - Duration::days(2),
            now - Duration::days(1),
        );
        let future = booking(
            BookingStatus::Rejected,
            now + Duration::days(1),
            now + Duration::days(2),
        );

        assert!(BookingState::Rejected.matches(&past, now));
        assert!(BookingState::Rejected.matches(&future, now));
    }

    #[test]
    fn test_all_matches_every_status() {
        let now = Utc::now();
        for status in [
            BookingStatus::Waiting,
            BookingStatus::Approved,
            BookingStatus::Rejected,
            BookingStatus::Canceled,
        ] {
            let b = booking(status, now - Duration::days(1), now + Duration::days(1));
            assert!(BookingState::All.matches(&b, now));
        }
    }

    fn render(state: BookingState, now: DateTime<Utc>) -> String {
        Query::select()
            .expr(sea_orm::sea_query::Expr::val(1))
            .cond_where(state.condition(now))
            .to_string(PostgresQueryBuilder)
    }

    /// The SQL conditions must encode the same status sets and time
    /// comparisons as the in-memory predicate.
    #[test]
    fn test_condition_mirrors_matches() {
        let now = Utc::now();

        let current = render(BookingState::Current, now);
        assert!(current.contains("'approved'") && current.contains("'rejected'"));
        assert!(current.contains("\"start_date\" <") && current.contains("\"end_date\" >"));

        let past = render(BookingState::Past, now);
        assert!(past.contains("'canceled'") && past.contains("'approved'"));
        assert!(past.contains("\"end_date\" <") && !past.contains("\"start_date\""));

        let future = render(BookingState::Future, now);
        assert!(future.contains("'approved'") && future.contains("'waiting'"));
        assert!(future.contains("\"start_date\" >") && !future.contains("\"end_date\""));

        let waiting = render(BookingState::Waiting, now);
        assert!(waiting.contains("'waiting'") && !waiting.contains("'approved'"));
        assert!(waiting.contains("\"start_date\" >"));

        let rejected = render(BookingState::Rejected, now);
        assert!(rejected.contains("'rejected'"));
        assert!(!rejected.contains("start_date") && !rejected.contains("end_date"));

        let all = render(BookingState::All, now);
        assert!(!all.contains("start_date") && !all.contains("end_date"));
    }

    #[test]
    fn test_page_request_truncates_from_to_page_boundary() {
        let page = PageRequest::new(5, 3);
        assert_eq!(page.page(), 1);
        assert_eq!(page.offset(), 3);

        let aligned = PageRequest::new(2, 1);
        assert_eq!(aligned.offset(), 2);

        let zero = PageRequest::new(0, 10);
        assert_eq!(zero.offset(), 0);
    }

    #[test]
    fn test_create_booking_rejects_inverted_period() {
        let now = Utc::now();
        let input = CreateBooking {
            item_id: Uuid::now_v7(),
            start_date: now + Duration::days(2),
            end_date: now + Duration::days(1),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_booking_rejects_past_start() {
        let now = Utc::now();
        let input = CreateBooking {
            item_id: Uuid::now_v7(),
            start_date: now - Duration::hours(1),
            end_date: now + Duration::days(1),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_booking_accepts_valid_period() {
        let now = Utc::now();
        let input = CreateBooking {
            item_id: Uuid::now_v7(),
            start_date: now + Duration::hours(1),
            end_date: now + Duration::days(1),
        };
        assert!(input.validate().is_ok());
    }
}
