//! Business logic services for the storefront.
//!
//! - `auth` - Customer signup and password login
//! - `cart` - Session cart with the signed-in database mirror
//! - `checkout` - Shipping quotes and order recording
//! - `email` - Order notifications and contact messages

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod email;
