//! Storefront
//!
//! Ties the catalog, the basket, the order history and the session together.

use std::sync::Arc;

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::{
    basket::{Basket, BasketError, BasketLine, BasketLineId, BasketLineUpdate},
    catalog::{Catalog, CatalogError},
    clock::Clock,
    orders::{
        CustomerDetails, NewOrder, Order, OrderError, OrderId, OrderStatus, OrderStore,
        OrderUpdate, PaymentMethod,
    },
    products::{Product, ProductId, Unit},
    session::{AuthError, MemoryStorage, Session, SessionStorage},
};

const SAMPLE_DELIVERY_DATE: Date = Date::constant(2024, 12, 20);

const SAMPLE_ORDER_DELIVERY_DATE: Date = Date::constant(2024, 12, 17);

/// 2024-12-15T14:30:00Z
const SAMPLE_ORDER_PLACED_AT: Timestamp = Timestamp::constant(1_734_273_000, 0);

/// Storefront errors.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// No catalog product with the given id
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Catalog error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Basket error
    #[error(transparent)]
    Basket(#[from] BasketError),

    /// Order error
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Authentication error
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Storefront
#[derive(Debug)]
pub struct Storefront<S = MemoryStorage> {
    catalog: Catalog,
    basket: Basket,
    orders: OrderStore,
    session: Session<S>,
}

impl<S: SessionStorage> Storefront<S> {
    /// Create a storefront with an empty basket and no orders.
    pub fn new(catalog: Catalog, session: Session<S>, clock: &Arc<dyn Clock>) -> Self {
        Self {
            basket: Basket::new(catalog.currency(), Arc::clone(clock)),
            orders: OrderStore::new(Arc::clone(clock)),
            catalog,
            session,
        }
    }

    /// Use a different number of days between today and the default delivery date.
    #[must_use]
    pub fn with_delivery_lead_days(mut self, days: i64) -> Self {
        self.basket = self.basket.with_delivery_lead_days(days);
        self
    }

    /// Seed the demo basket and order history.
    ///
    /// The basket receives 2 kg of product 1 and 1.5 kg of product 2, both
    /// delivering on 2024-12-20. The history receives one completed order,
    /// `VEG-001`, for 3 kg of product 4.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::ProductNotFound`] if the catalog lacks one
    /// of these products.
    pub fn with_sample_data(mut self) -> Result<Self, StorefrontError> {
        let sample_lines = [
            (BasketLineId::new(1), ProductId::new(1), Decimal::from(2)),
            (BasketLineId::new(2), ProductId::new(2), Decimal::new(15, 1)),
        ];

        for (line_id, product_id, quantity) in sample_lines {
            let product = self.product(product_id)?;
            let line = BasketLine::new(line_id, product, quantity, Unit::Kg, SAMPLE_DELIVERY_DATE)?;

            self.basket.restore_line(line)?;
        }

        let potatoes = self.product(ProductId::new(4))?;
        let line = BasketLine::new(
            BasketLineId::new(1),
            potatoes,
            Decimal::from(3),
            Unit::Kg,
            SAMPLE_ORDER_DELIVERY_DATE,
        )?;

        self.orders.restore_order(Order {
            id: OrderId::new(1),
            order_number: "VEG-001".to_string(),
            created_at: SAMPLE_ORDER_PLACED_AT,
            total_amount: line.line_total(),
            lines: vec![line],
            status: OrderStatus::Completed,
            customer: CustomerDetails {
                name: "Ivan Ivanov".to_string(),
                email: "ivan@example.com".to_string(),
                phone: "+7 (123) 456-78-90".to_string(),
            },
            payment_method: PaymentMethod::Card,
            card_last_four: None,
            delivery_address: None,
            delivery_date: None,
            notes: None,
        });

        debug!(
            lines = self.basket.item_count(),
            orders = self.orders.len(),
            "seeded sample data"
        );

        Ok(self)
    }

    /// Add `quantity` of a catalog product to the basket.
    ///
    /// `unit` defaults to the product's own unit.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::ProductNotFound`] for an unknown product, or
    /// any basket error.
    pub fn add_to_basket(
        &mut self,
        product_id: ProductId,
        quantity: Decimal,
        unit: Option<Unit>,
        delivery_date: Option<Date>,
    ) -> Result<BasketLineId, StorefrontError> {
        let product = self
            .catalog
            .get(product_id)
            .ok_or(StorefrontError::ProductNotFound(product_id))?;

        let unit = unit.unwrap_or(product.unit);

        Ok(self
            .basket
            .add_to_basket(product, quantity, unit, delivery_date)?)
    }

    /// Merge `update` into a basket line.
    ///
    /// # Errors
    ///
    /// Returns a basket error for an unknown line or invalid quantity.
    pub fn update_basket_item(
        &mut self,
        id: BasketLineId,
        update: BasketLineUpdate,
    ) -> Result<&BasketLine, StorefrontError> {
        Ok(self.basket.update_item(id, update)?)
    }

    /// Remove a basket line.
    ///
    /// # Errors
    ///
    /// Returns a basket error for an unknown line.
    pub fn remove_from_basket(&mut self, id: BasketLineId) -> Result<BasketLine, StorefrontError> {
        Ok(self.basket.remove_from_basket(id)?)
    }

    /// Empty the basket.
    pub fn clear_basket(&mut self) {
        self.basket.clear();
    }

    /// Place an order for the current basket.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyBasket`] (wrapped) if there is nothing to order.
    pub fn checkout(&mut self, details: NewOrder) -> Result<Order, StorefrontError> {
        Ok(self.orders.create_order(&mut self.basket, details)?)
    }

    /// Merge `update` into an order without lifecycle checks.
    ///
    /// # Errors
    ///
    /// Returns an order error for an unknown id.
    pub fn update_order(
        &mut self,
        id: OrderId,
        update: OrderUpdate,
    ) -> Result<&Order, StorefrontError> {
        Ok(self.orders.update_order(id, update)?)
    }

    /// Move an order along its lifecycle.
    ///
    /// # Errors
    ///
    /// Returns an order error for an unknown id or a forbidden transition.
    pub fn transition_order(
        &mut self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<&Order, StorefrontError> {
        Ok(self.orders.transition_order(id, status)?)
    }

    /// Remove an order from the history.
    ///
    /// # Errors
    ///
    /// Returns an order error for an unknown id.
    pub fn delete_order(&mut self, id: OrderId) -> Result<Order, StorefrontError> {
        Ok(self.orders.delete_order(id)?)
    }

    /// Contact details of the signed-in user, or empty details when signed out.
    pub fn prefill_customer(&self) -> CustomerDetails {
        self.session
            .current_user()
            .map(|user| CustomerDetails {
                name: user.full_name(),
                email: user.email.clone(),
                phone: user.phone.clone(),
            })
            .unwrap_or_default()
    }

    /// Product catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Active basket
    pub fn basket(&self) -> &Basket {
        &self.basket
    }

    /// Order history
    pub fn orders(&self) -> &OrderStore {
        &self.orders
    }

    /// Current session
    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Current session, for signing in and out
    pub fn session_mut(&mut self) -> &mut Session<S> {
        &mut self.session
    }

    fn product(&self, id: ProductId) -> Result<&Product, StorefrontError> {
        self.catalog
            .get(id)
            .ok_or(StorefrontError::ProductNotFound(id))
    }
}
