//! Auth-user directory entities.

pub mod model;

pub use model::AuthUser;
