//! Harvest
//!
//! Harvest is the in-memory core of a vegetable storefront: a product catalog,
//! a shopping basket with derived totals, checkout into an order history, and
//! a mock customer session.

pub mod basket;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod ids;
pub mod logging;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod session;
pub mod storefront;
pub mod validation;
