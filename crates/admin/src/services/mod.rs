//! Business logic services for the back office.

pub mod auth;
pub mod email;
pub mod media;
pub mod validation;
