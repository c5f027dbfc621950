//! Bookings Domain
//!
//! The booking state-machine and availability-query engine. A booking is
//! created `Waiting`, moves to `Approved` or `Rejected` exactly once by the
//! item owner's decision, and is afterwards read through time-relative
//! state filters (current / past / future / waiting / rejected).
//!
//! The crate talks to the rest of the system through three small traits:
//! [`collaborators::UserDirectory`], [`collaborators::ItemCatalog`] and
//! [`clock::Clock`]. The API app wires adapters over the user and item
//! services; tests use the in-memory implementations shipped here.

pub mod clock;
pub mod collaborators;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use collaborators::{
    InMemoryItemCatalog, InMemoryUserDirectory, ItemCatalog, ItemRef, UserDirectory, UserRef,
};
pub use error::{BookingError, BookingResult};
pub use models::{
    Booking, BookingState, BookingStatus, BookingWindow, CreateBooking, PageRequest,
};
pub use postgres::PgBookingRepository;
pub use repository::{BookingRepository, InMemoryBookingRepository};
pub use service::BookingService;
