//! Harvest prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError, BasketLine, BasketLineId, BasketLineUpdate},
    catalog::{Catalog, CatalogError},
    clock::{Clock, FixedClock, SystemClock},
    orders::{
        CustomerDetails, NewOrder, Order, OrderError, OrderId, OrderStatus, OrderStore,
        OrderUpdate, PaymentMethod,
    },
    pricing::PricingError,
    products::{Product, ProductId, Unit},
    session::{AuthError, FileStorage, MemoryStorage, NewUser, Session, SessionStorage, User},
    storefront::{Storefront, StorefrontError},
    validation::ValidationError,
};
