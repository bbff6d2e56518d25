//! Domain models for the back office.
//!
//! Catalog, shipping and order rows come from `luxe-core`; only the session
//! identity is specific to this binary.

pub mod session;

pub use session::{CurrentAdmin, keys as session_keys};
