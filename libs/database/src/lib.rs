//! PostgreSQL connectivity for the lendhub services.
//!
//! Wraps SeaORM connection management with pool configuration loaded from
//! the environment, retry-on-connect for container startup ordering, and a
//! health check suitable for readiness probes.

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult, RetryConfig, retry, retry_with_backoff};
pub use postgres::{
    PostgresConfig, check_health, connect_from_config, connect_from_config_with_retry,
    run_migrations,
};
