//! Users Domain
//!
//! Account management for the lendhub platform. Every request that touches
//! items or bookings is made on behalf of a user from this domain.
//!
//! Layering follows the usual handler -> service -> repository split, with
//! the repository behind a trait so handlers can be exercised against the
//! in-memory implementation.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{CreateUser, UpdateUser, User, UserFilter};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
