//! # promohub-database
//!
//! Node store implementations and repositories for PromoHub: the PostgreSQL
//! [`NodeStore`](promohub_core::traits::NodeStore) backend, the in-memory
//! reference backend used by tests and embedded deployments, connection pool
//! management, and the site / auth-user repositories.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod stores;
