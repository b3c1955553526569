//! Request DTOs.

pub mod request;
