//! Concrete PostgreSQL repositories for the flat collections.

pub mod auth_user;
pub mod site;

pub use auth_user::AuthUserRepository;
pub use site::SiteRepository;
