//! Orders
//!
//! Order history. Orders are created from a basket snapshot and afterwards
//! only their metadata and status change.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::{basket::Basket, clock::Clock, ids::IdGenerator};

pub mod models;
pub mod status;

pub use models::{
    CustomerDetails, NewOrder, Order, OrderId, OrderUpdate, PaymentMethod, card_last_four,
    order_number,
};
pub use status::OrderStatus;

/// Order store errors.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// Checkout was attempted with no basket lines.
    #[error("cannot create an order from an empty basket")]
    EmptyBasket,

    /// No order with the given id.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// The strict lifecycle does not allow this status change.
    #[error("order {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Order being changed
        id: OrderId,

        /// Current status
        from: OrderStatus,

        /// Requested status
        to: OrderStatus,
    },
}

/// Order Store
#[derive(Debug, Clone)]
pub struct OrderStore {
    orders: Vec<Order>,
    ids: IdGenerator,
    clock: Arc<dyn Clock>,
}

impl OrderStore {
    /// Create an empty order store.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            orders: Vec::new(),
            ids: IdGenerator::new(Arc::clone(&clock)),
            clock,
        }
    }

    /// Turn the current basket into a pending order and clear the basket.
    ///
    /// The order holds a copy of the basket lines and the basket total at the
    /// moment of the call. Only the last four digits of a card number are kept.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyBasket`] if the basket has no lines; the
    /// basket and the store are unchanged.
    pub fn create_order(
        &mut self,
        basket: &mut Basket,
        details: NewOrder,
    ) -> Result<Order, OrderError> {
        if basket.is_empty() {
            return Err(OrderError::EmptyBasket);
        }

        let id = self.ids.next_id();

        let order = Order {
            id,
            order_number: order_number(id),
            created_at: self.clock.now(),
            lines: basket.lines().to_vec(),
            total_amount: basket.total_price(),
            status: OrderStatus::Pending,
            customer: details.customer,
            payment_method: details.payment_method,
            card_last_four: details.card_number.as_deref().and_then(card_last_four),
            delivery_address: details.delivery_address,
            delivery_date: details.delivery_date,
            notes: details.notes,
        };

        info!(
            order = %order.id,
            number = %order.order_number,
            lines = order.lines.len(),
            total = %order.total_amount,
            "created order"
        );

        self.orders.push(order.clone());
        basket.clear();

        Ok(order)
    }

    /// Merge `update` into the order with the given id.
    ///
    /// No lifecycle rules are applied: any status may be set from any other.
    /// Use [`OrderStore::transition_order`] for validated status changes.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] for an unknown id.
    pub fn update_order(&mut self, id: OrderId, update: OrderUpdate) -> Result<&Order, OrderError> {
        let order = self.get_mut(id)?;

        debug!(order = %id, ?update, "updating order");

        update.apply(order);

        Ok(&*order)
    }

    /// Move an order to `status`, following the strict lifecycle.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] for an unknown id, or
    /// [`OrderError::InvalidTransition`] if the lifecycle forbids the change.
    pub fn transition_order(
        &mut self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<&Order, OrderError> {
        let order = self.get_mut(id)?;

        if !order.status.can_transition_to(status) {
            return Err(OrderError::InvalidTransition {
                id,
                from: order.status,
                to: status,
            });
        }

        debug!(order = %id, from = %order.status, to = %status, "order status changed");

        order.status = status;

        Ok(&*order)
    }

    /// Remove the order with the given id and return it.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] for an unknown id.
    pub fn delete_order(&mut self, id: OrderId) -> Result<Order, OrderError> {
        let position = self
            .orders
            .iter()
            .position(|order| order.id == id)
            .ok_or(OrderError::NotFound(id))?;

        debug!(order = %id, "deleted order");

        Ok(self.orders.remove(position))
    }

    /// Look up an order by id.
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }

    /// Look up an order by its customer-facing number.
    pub fn find_by_number(&self, number: &str) -> Option<&Order> {
        self.orders
            .iter()
            .find(|order| order.order_number.eq_ignore_ascii_case(number))
    }

    /// Orders currently in `status`.
    pub fn with_status(&self, status: OrderStatus) -> impl Iterator<Item = &Order> {
        self.orders
            .iter()
            .filter(move |order| order.status == status)
    }

    /// All orders, oldest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether there are no orders.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Put back a previously built order, e.g. when seeding sample data.
    pub(crate) fn restore_order(&mut self, order: Order) {
        self.ids.observe(order.id);
        self.orders.push(order);
    }

    fn get_mut(&mut self, id: OrderId) -> Result<&mut Order, OrderError> {
        self.orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(OrderError::NotFound(id))
    }
}
