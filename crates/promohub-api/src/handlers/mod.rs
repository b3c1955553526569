//! HTTP request handlers, organized by domain.

pub mod auth_user;
pub mod health;
pub mod node;
pub mod site;
