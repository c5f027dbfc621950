//! Items Domain
//!
//! The lendable-item catalog: items users offer for sharing, plus the
//! comments renters leave after a completed booking. The HTTP surface for
//! items lives in the API app because item responses are composed with
//! booking-window data from the bookings domain; this crate exposes only
//! the service and repository layers.

pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ItemError, ItemResult};
pub use models::{Comment, CreateComment, CreateItem, Item, ItemFilter, UpdateItem};
pub use postgres::PgItemRepository;
pub use repository::{InMemoryItemRepository, ItemRepository};
pub use service::ItemService;
