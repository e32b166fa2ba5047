//! Order Models

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use jiff::{Timestamp, civil::Date};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    basket::BasketLine,
    ids::TypedId,
    orders::OrderStatus,
    validation::{ValidationError, require, require_email},
};

/// Order Id
pub type OrderId = TypedId<Order>;

/// Prefix of every human-facing order number.
pub const ORDER_NUMBER_PREFIX: &str = "VEG";

/// Derive the order number shown to customers from an order id.
///
/// Uses the last six digits of the id, zero padded.
pub fn order_number(id: OrderId) -> String {
    format!("{ORDER_NUMBER_PREFIX}-{:06}", id.get() % 1_000_000)
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaymentMethod {
    /// Bank card at checkout
    #[default]
    Card,

    /// Cash on delivery
    Cash,

    /// Online transfer
    Online,
}

impl PaymentMethod {
    /// Every payment method.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Card,
        PaymentMethod::Cash,
        PaymentMethod::Online,
    ];

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Online => "online",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a payment method label is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownPaymentMethod(value.to_string()))
    }
}

/// Customer contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    /// Full name
    pub name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,
}

/// Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Order id
    pub id: OrderId,

    /// Customer-facing number, derived from `id`
    pub order_number: String,

    /// When the order was placed
    pub created_at: Timestamp,

    /// Basket lines as they were at checkout
    pub lines: Vec<BasketLine>,

    /// Basket total at checkout
    pub total_amount: Money<'static, Currency>,

    /// Lifecycle status
    pub status: OrderStatus,

    /// Contact details
    pub customer: CustomerDetails,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Last four digits of the card, for card payments
    pub card_last_four: Option<String>,

    /// Delivery address
    pub delivery_address: Option<String>,

    /// Requested delivery date for the whole order
    pub delivery_date: Option<Date>,

    /// Free-form customer notes
    pub notes: Option<String>,
}

impl Order {
    /// Number of lines in the order.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }
}

/// Caller-supplied checkout details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewOrder {
    /// Contact details
    pub customer: CustomerDetails,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Full card number; only its last four digits are kept on the order
    pub card_number: Option<String>,

    /// Delivery address
    pub delivery_address: Option<String>,

    /// Requested delivery date
    pub delivery_date: Option<Date>,

    /// Free-form notes
    pub notes: Option<String>,
}

/// Digits required in a card number.
pub const CARD_NUMBER_DIGITS: usize = 16;

impl NewOrder {
    /// Check the checkout form, returning the first problem found.
    ///
    /// Card payments need a 16 digit card number; spaces and dashes are ignored.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first invalid field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.customer.name, ValidationError::MissingName)?;
        require_email(&self.customer.email)?;
        require(&self.customer.phone, ValidationError::MissingPhone)?;

        if self.payment_method == PaymentMethod::Card {
            let digits = self
                .card_number
                .as_deref()
                .unwrap_or_default()
                .chars()
                .filter(|c| !matches!(c, ' ' | '-'))
                .collect::<String>();

            if digits.len() != CARD_NUMBER_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(ValidationError::InvalidCardNumber {
                    digits: CARD_NUMBER_DIGITS,
                });
            }
        }

        Ok(())
    }
}

/// Fields to merge into an existing order. `None` leaves a field unchanged;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderUpdate {
    /// New status; any status may be set from any other
    pub status: Option<OrderStatus>,

    /// New customer name
    pub customer_name: Option<String>,

    /// New customer email
    pub customer_email: Option<String>,

    /// New customer phone
    pub customer_phone: Option<String>,

    /// New payment method
    pub payment_method: Option<PaymentMethod>,

    /// New delivery address
    pub delivery_address: Option<Option<String>>,

    /// New delivery date
    pub delivery_date: Option<Option<Date>>,

    /// New notes
    pub notes: Option<Option<String>>,
}

impl OrderUpdate {
    /// Update only the status.
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, order: &mut Order) {
        if let Some(status) = self.status {
            order.status = status;
        }

        if let Some(name) = self.customer_name {
            order.customer.name = name;
        }

        if let Some(email) = self.customer_email {
            order.customer.email = email;
        }

        if let Some(phone) = self.customer_phone {
            order.customer.phone = phone;
        }

        if let Some(method) = self.payment_method {
            order.payment_method = method;
        }

        if let Some(address) = self.delivery_address {
            order.delivery_address = address;
        }

        if let Some(date) = self.delivery_date {
            order.delivery_date = date;
        }

        if let Some(notes) = self.notes {
            order.notes = notes;
        }
    }
}

/// Keep only the last four digits of a card number, ignoring spaces and dashes.
///
/// Returns `None` when the input holds fewer than four digits.
pub fn card_last_four(card_number: &str) -> Option<String> {
    let digits: Vec<char> = card_number.chars().filter(char::is_ascii_digit).collect();
    let start = digits.len().checked_sub(4)?;

    Some(digits.get(start..)?.iter().collect())
}
