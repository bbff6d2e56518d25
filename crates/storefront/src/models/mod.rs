//! Domain models for the storefront.

pub mod profile;
pub mod session;

pub use profile::{Profile, full_name};
pub use session::{CurrentUser, session_keys};
