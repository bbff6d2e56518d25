//! Luxe Core - Shared domain types and storefront logic.
//!
//! This crate provides the types used across all Luxe components:
//! - `storefront` - Public JSON API consumed by the shop frontend
//! - `admin` - Back-office API for catalog, shipping, orders and settings
//! - `cli` - Command-line tools for migrations, seeding and bootstrap
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Row types derive `sqlx::FromRow` when the
//! `postgres` feature is enabled so the binaries can query straight into them.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, money helpers and statuses
//! - [`catalog`] - Products, categories, filtering and sorting
//! - [`cart`] - Cart arithmetic and server/session reconciliation
//! - [`wishlist`] - Saved-for-later product list
//! - [`order`] - Orders, order items, shipping and history filters
//! - [`settings`] - Business settings with defaults

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod order;
pub mod settings;
pub mod types;
pub mod wishlist;

pub use types::*;
