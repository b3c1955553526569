//! # promohub-entity
//!
//! Domain entity models for PromoHub: hierarchy nodes, bookmark sites, and
//! the auth-user directory.

pub mod auth_user;
pub mod node;
pub mod site;
