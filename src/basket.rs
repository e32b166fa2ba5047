//! Basket
//!
//! The active shopping basket. Every mutating call recomputes the derived
//! line totals before returning, so reads never observe stale totals.

use std::sync::Arc;

use jiff::{ToSpan, civil::Date};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    clock::Clock,
    ids::{IdGenerator, TypedId},
    pricing::{self, PricingError, round_quantity},
    products::{Product, ProductId, Unit},
};

/// Delivery lead time used when a line is added without a delivery date.
pub const DEFAULT_DELIVERY_LEAD_DAYS: i64 = 2;

/// Basket Line Id
pub type BasketLineId = TypedId<BasketLine>;

/// Errors related to basket mutations.
#[derive(Debug, Error, PartialEq)]
pub enum BasketError {
    /// Quantity was zero or negative after rounding to 2 decimals.
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(Decimal),

    /// No line with the given id.
    #[error("basket line {0} not found")]
    NotFound(BasketLineId),

    /// Merging into the line would take its quantity out of range.
    #[error("quantity of basket line {0} is out of range")]
    QuantityOverflow(BasketLineId),

    /// The product is priced in a different currency than the basket.
    #[error("product {product} has currency {found}, but basket has currency {expected}")]
    CurrencyMismatch {
        /// Product being added
        product: ProductId,

        /// Product currency
        found: &'static str,

        /// Basket currency
        expected: &'static str,
    },

    /// Line total could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// One product entry in the basket.
#[derive(Debug, Clone, PartialEq)]
pub struct BasketLine {
    id: BasketLineId,
    product_id: ProductId,
    title: String,
    category: String,
    quantity: Decimal,
    unit: Unit,
    unit_price: Money<'static, Currency>,
    delivery_date: Date,
    line_total: Money<'static, Currency>,
}

impl BasketLine {
    /// Build a line for `product`, copying its title, category and price.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity is not positive or the total overflows.
    pub fn new(
        id: BasketLineId,
        product: &Product,
        quantity: Decimal,
        unit: Unit,
        delivery_date: Date,
    ) -> Result<Self, BasketError> {
        let quantity = validate_quantity(quantity)?;
        let line_total = pricing::line_total(&product.price, quantity)?;

        Ok(Self {
            id,
            product_id: product.id,
            title: product.title.clone(),
            category: product.category.clone(),
            quantity,
            unit,
            unit_price: product.price,
            delivery_date,
            line_total,
        })
    }

    /// Line id
    pub fn id(&self) -> BasketLineId {
        self.id
    }

    /// Product this line refers to
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Product title at the time the line was created
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Product category at the time the line was created
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Ordered quantity, rounded to 2 decimals
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Unit the quantity is measured in
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Price per unit, copied from the product when the line was created
    pub fn unit_price(&self) -> Money<'static, Currency> {
        self.unit_price
    }

    /// Requested delivery date
    pub fn delivery_date(&self) -> Date {
        self.delivery_date
    }

    /// `quantity × unit_price`, rounded to the minor unit
    pub fn line_total(&self) -> Money<'static, Currency> {
        self.line_total
    }

    fn with_quantity(&self, quantity: Decimal) -> Result<Self, BasketError> {
        let quantity = validate_quantity(quantity)?;
        let line_total = pricing::line_total(&self.unit_price, quantity)?;

        Ok(Self {
            quantity,
            line_total,
            ..self.clone()
        })
    }
}

/// Fields to merge into an existing basket line. `None` leaves a field unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BasketLineUpdate {
    /// New quantity; recomputes the line total
    pub quantity: Option<Decimal>,

    /// New unit
    pub unit: Option<Unit>,

    /// New delivery date
    pub delivery_date: Option<Date>,
}

impl BasketLineUpdate {
    /// Update only the quantity.
    pub fn quantity(quantity: Decimal) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }
}

/// Basket
#[derive(Debug, Clone)]
pub struct Basket {
    lines: Vec<BasketLine>,
    currency: &'static Currency,
    total: Money<'static, Currency>,
    ids: IdGenerator,
    clock: Arc<dyn Clock>,
    delivery_lead_days: i64,
}

impl Basket {
    /// Create an empty basket for prices in `currency`.
    pub fn new(currency: &'static Currency, clock: Arc<dyn Clock>) -> Self {
        Basket {
            lines: Vec::new(),
            currency,
            total: Money::from_minor(0, currency),
            ids: IdGenerator::new(Arc::clone(&clock)),
            clock,
            delivery_lead_days: DEFAULT_DELIVERY_LEAD_DAYS,
        }
    }

    /// Use a different number of days between today and the default delivery date.
    #[must_use]
    pub fn with_delivery_lead_days(mut self, days: i64) -> Self {
        self.delivery_lead_days = days;
        self
    }

    /// Add `quantity` of `product` to the basket.
    ///
    /// If the product already has a line, the quantity is added to it, the unit
    /// is overwritten and the delivery date is overwritten when one is given.
    /// The existing line keeps its unit price. Otherwise a new line is appended,
    /// delivering `delivery_date` or, when absent, today plus the lead time.
    ///
    /// Returns the id of the new or updated line.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity is not positive, the product is priced
    /// in another currency, or the line quantity, line total or basket total
    /// overflows. The basket is left unchanged on error.
    pub fn add_to_basket(
        &mut self,
        product: &Product,
        quantity: Decimal,
        unit: Unit,
        delivery_date: Option<Date>,
    ) -> Result<BasketLineId, BasketError> {
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(BasketError::CurrencyMismatch {
                product: product.id,
                found: product_currency.iso_alpha_code,
                expected: self.currency.iso_alpha_code,
            });
        }

        if let Some(current) = self.find_by_product(product.id) {
            let added = validate_quantity(quantity)?;
            let summed = current
                .quantity
                .checked_add(added)
                .ok_or(BasketError::QuantityOverflow(current.id))?;

            let mut merged = current.with_quantity(summed)?;
            merged.unit = unit;

            if let Some(date) = delivery_date {
                merged.delivery_date = date;
            }

            let (id, merged_quantity) = (merged.id, merged.quantity);

            self.replace_line(merged)?;

            debug!(
                line = %id,
                product = %product.id,
                quantity = %merged_quantity,
                "merged into basket line"
            );

            return Ok(id);
        }

        let delivery_date = delivery_date.unwrap_or_else(|| self.default_delivery_date());
        let id = self.ids.next_id();
        let line = BasketLine::new(id, product, quantity, unit, delivery_date)?;
        let line_quantity = line.quantity;

        self.push_line(line)?;

        debug!(
            line = %id,
            product = %product.id,
            quantity = %line_quantity,
            "added basket line"
        );

        Ok(id)
    }

    /// Merge `update` into the line with the given id.
    ///
    /// The line total is recomputed only when the quantity changes.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::NotFound`] for an unknown id, a quantity error, or
    /// a pricing error if the new basket total overflows.
    /// The line is left unchanged on error.
    pub fn update_item(
        &mut self,
        id: BasketLineId,
        update: BasketLineUpdate,
    ) -> Result<&BasketLine, BasketError> {
        let current = self.get(id).ok_or(BasketError::NotFound(id))?;

        let mut updated = match update.quantity {
            Some(quantity) => current.with_quantity(quantity)?,
            None => current.clone(),
        };

        if let Some(unit) = update.unit {
            updated.unit = unit;
        }

        if let Some(date) = update.delivery_date {
            updated.delivery_date = date;
        }

        self.replace_line(updated)?;

        debug!(line = %id, ?update, "updated basket line");

        self.get(id).ok_or(BasketError::NotFound(id))
    }

    /// Remove the line with the given id and return it.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::NotFound`] if no line has that id; the basket is unchanged.
    pub fn remove_from_basket(&mut self, id: BasketLineId) -> Result<BasketLine, BasketError> {
        let position = self
            .lines
            .iter()
            .position(|line| line.id == id)
            .ok_or(BasketError::NotFound(id))?;
        let total = self.total_with(Some(id), None)?;

        debug!(line = %id, "removed basket line");

        let line = self.lines.remove(position);
        self.total = total;

        Ok(line)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        debug!(lines = self.lines.len(), "cleared basket");

        self.lines.clear();
        self.total = Money::from_minor(0, self.currency);
    }

    /// Sum of all line totals; zero for an empty basket.
    pub fn total_price(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Number of distinct lines (not the summed quantity).
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all line quantities, regardless of unit; `None` if it overflows.
    pub fn total_quantity(&self) -> Option<Decimal> {
        self.lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.quantity))
    }

    /// All lines in the order they were added.
    pub fn lines(&self) -> &[BasketLine] {
        &self.lines
    }

    /// Iterate over all lines.
    pub fn iter(&self) -> impl Iterator<Item = &BasketLine> {
        self.lines.iter()
    }

    /// Look up a line by id.
    pub fn get(&self, id: BasketLineId) -> Option<&BasketLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Look up the line holding `product_id`.
    pub fn find_by_product(&self, product_id: ProductId) -> Option<&BasketLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    /// Check if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the basket.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The date a new line is delivered on when none is requested.
    pub fn default_delivery_date(&self) -> Date {
        self.clock
            .today()
            .saturating_add(self.delivery_lead_days.days())
    }

    /// Put back a previously built line, e.g. when seeding sample data.
    ///
    /// # Errors
    ///
    /// Returns an error if the line's currency differs from the basket's.
    pub(crate) fn restore_line(&mut self, line: BasketLine) -> Result<(), BasketError> {
        let line_currency = line.unit_price.currency();

        if line_currency != self.currency {
            return Err(BasketError::CurrencyMismatch {
                product: line.product_id,
                found: line_currency.iso_alpha_code,
                expected: self.currency.iso_alpha_code,
            });
        }

        let id = line.id;

        self.push_line(line)?;
        self.ids.observe(id);

        Ok(())
    }

    /// Basket total with the line `replaced` left out and `added` counted in.
    fn total_with(
        &self,
        replaced: Option<BasketLineId>,
        added: Option<&Money<'static, Currency>>,
    ) -> Result<Money<'static, Currency>, PricingError> {
        pricing::total_price(
            self.lines
                .iter()
                .filter(|line| Some(line.id) != replaced)
                .map(|line| &line.line_total)
                .chain(added),
            self.currency,
        )
    }

    fn push_line(&mut self, line: BasketLine) -> Result<(), BasketError> {
        self.total = self.total_with(None, Some(&line.line_total))?;
        self.lines.push(line);

        Ok(())
    }

    fn replace_line(&mut self, line: BasketLine) -> Result<(), BasketError> {
        let total = self.total_with(Some(line.id), Some(&line.line_total))?;

        let slot = self
            .lines
            .iter_mut()
            .find(|existing| existing.id == line.id)
            .ok_or(BasketError::NotFound(line.id))?;

        *slot = line;
        self.total = total;

        Ok(())
    }
}

fn validate_quantity(quantity: Decimal) -> Result<Decimal, BasketError> {
    let rounded = round_quantity(quantity);

    if rounded > Decimal::ZERO {
        Ok(rounded)
    } else {
        Err(BasketError::InvalidQuantity(quantity))
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, civil::date};
    use rust_decimal_macros::dec;
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::clock::FixedClock;

    use super::*;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(
            "2024-12-18T10:00:00Z"
                .parse::<Timestamp>()
                .unwrap_or(Timestamp::UNIX_EPOCH),
        ))
    }

    fn product(id: u64, price_minor: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            category: "Vegetables".to_string(),
            origin: String::new(),
            price: Money::from_minor(price_minor, iso::RUB),
            unit: Unit::Kg,
            image: String::new(),
            description: String::new(),
        }
    }

    fn basket() -> Basket {
        Basket::new(iso::RUB, clock())
    }

    #[test]
    fn new_basket_is_empty() {
        let basket = basket();

        assert!(basket.is_empty());
        assert_eq!(basket.item_count(), 0);
        assert_eq!(basket.total_price(), Money::from_minor(0, iso::RUB));
        assert_eq!(basket.currency(), iso::RUB);
    }

    #[test]
    fn adding_a_product_creates_a_priced_line() -> TestResult {
        let mut basket = basket();
        let tomatoes = product(1, 189_00);

        let id = basket.add_to_basket(&tomatoes, dec!(2), Unit::Kg, None)?;
        let line = basket.get(id).ok_or("line missing")?;

        assert_eq!(line.product_id(), tomatoes.id);
        assert_eq!(line.title(), "Product 1");
        assert_eq!(line.category(), "Vegetables");
        assert_eq!(line.quantity(), dec!(2));
        assert_eq!(line.unit(), Unit::Kg);
        assert_eq!(line.unit_price(), tomatoes.price);
        assert_eq!(line.line_total().to_minor_units(), 378_00);

        Ok(())
    }

    #[test]
    fn default_delivery_is_two_days_out() -> TestResult {
        let mut basket = basket();

        let id = basket.add_to_basket(&product(1, 100), dec!(1), Unit::Kg, None)?;

        assert_eq!(
            basket.get(id).map(BasketLine::delivery_date),
            Some(date(2024, 12, 20))
        );

        Ok(())
    }

    #[test]
    fn lead_days_are_configurable() -> TestResult {
        let mut basket = basket().with_delivery_lead_days(5);

        let id = basket.add_to_basket(&product(1, 100), dec!(1), Unit::Kg, None)?;

        assert_eq!(
            basket.get(id).map(BasketLine::delivery_date),
            Some(date(2024, 12, 23))
        );

        Ok(())
    }

    #[test]
    fn requested_delivery_date_is_kept() -> TestResult {
        let mut basket = basket();

        let id = basket.add_to_basket(
            &product(1, 100),
            dec!(1),
            Unit::Kg,
            Some(date(2025, 1, 3)),
        )?;

        assert_eq!(
            basket.get(id).map(BasketLine::delivery_date),
            Some(date(2025, 1, 3))
        );

        Ok(())
    }

    #[test]
    fn adding_the_same_product_merges_lines() -> TestResult {
        let mut basket = basket();
        let tomatoes = product(1, 189_00);

        let first = basket.add_to_basket(&tomatoes, dec!(2), Unit::Kg, Some(date(2024, 12, 20)))?;
        let second = basket.add_to_basket(&tomatoes, dec!(1.5), Unit::Piece, None)?;

        assert_eq!(first, second);
        assert_eq!(basket.item_count(), 1);

        let line = basket.get(first).ok_or("line missing")?;

        assert_eq!(line.quantity(), dec!(3.5));
        assert_eq!(line.unit(), Unit::Piece);
        assert_eq!(line.delivery_date(), date(2024, 12, 20));
        assert_eq!(line.line_total().to_minor_units(), 661_50);

        Ok(())
    }

    #[test]
    fn merging_overwrites_delivery_date_when_given() -> TestResult {
        let mut basket = basket();
        let tomatoes = product(1, 189_00);

        let id = basket.add_to_basket(&tomatoes, dec!(1), Unit::Kg, None)?;
        basket.add_to_basket(&tomatoes, dec!(1), Unit::Kg, Some(date(2025, 2, 1)))?;

        assert_eq!(
            basket.get(id).map(BasketLine::delivery_date),
            Some(date(2025, 2, 1))
        );

        Ok(())
    }

    #[test]
    fn distinct_products_get_distinct_ids() -> TestResult {
        let mut basket = basket();

        let a = basket.add_to_basket(&product(1, 100), dec!(1), Unit::Kg, None)?;
        let b = basket.add_to_basket(&product(2, 100), dec!(1), Unit::Kg, None)?;

        assert_ne!(a, b);
        assert_eq!(basket.item_count(), 2);

        Ok(())
    }

    #[test]
    fn quantities_are_rounded_to_two_places() -> TestResult {
        let mut basket = basket();

        let id = basket.add_to_basket(&product(1, 100_00), dec!(1.234), Unit::Kg, None)?;
        let line = basket.get(id).ok_or("line missing")?;

        assert_eq!(line.quantity(), dec!(1.23));
        assert_eq!(line.line_total().to_minor_units(), 123_00);

        Ok(())
    }

    #[test]
    fn non_positive_quantities_are_rejected() {
        let mut basket = basket();

        for quantity in [dec!(0), dec!(-1), dec!(0.004)] {
            assert_eq!(
                basket.add_to_basket(&product(1, 100), quantity, Unit::Kg, None),
                Err(BasketError::InvalidQuantity(quantity))
            );
        }

        assert!(basket.is_empty());
    }

    #[test]
    fn invalid_merge_leaves_line_untouched() -> TestResult {
        let mut basket = basket();
        let tomatoes = product(1, 189_00);

        let id = basket.add_to_basket(&tomatoes, dec!(2), Unit::Kg, None)?;

        assert!(basket.add_to_basket(&tomatoes, dec!(-1), Unit::Pack, None).is_err());

        let line = basket.get(id).ok_or("line missing")?;

        assert_eq!(line.quantity(), dec!(2));
        assert_eq!(line.unit(), Unit::Kg);

        Ok(())
    }

    #[test]
    fn merging_past_the_largest_quantity_is_rejected() -> TestResult {
        let mut basket = basket();
        let free = product(1, 0);

        let id = basket.add_to_basket(&free, Decimal::MAX, Unit::Kg, None)?;

        assert_eq!(
            basket.add_to_basket(&free, dec!(1), Unit::Piece, None),
            Err(BasketError::QuantityOverflow(id))
        );

        let line = basket.get(id).ok_or("line missing")?;

        assert_eq!(line.quantity(), Decimal::MAX);
        assert_eq!(line.unit(), Unit::Kg);
        assert_eq!(basket.total_price().to_minor_units(), 0);

        Ok(())
    }

    #[test]
    fn basket_total_overflow_is_rejected() -> TestResult {
        let mut basket = basket();

        basket.add_to_basket(&product(1, i64::MAX), dec!(1), Unit::Kg, None)?;

        assert_eq!(
            basket.add_to_basket(&product(2, 1), dec!(1), Unit::Kg, None),
            Err(BasketError::Pricing(PricingError::TotalOverflow))
        );
        assert_eq!(basket.item_count(), 1);
        assert_eq!(basket.total_price().to_minor_units(), i64::MAX);

        Ok(())
    }

    #[test]
    fn update_that_overflows_the_total_is_rejected() -> TestResult {
        let mut basket = basket();

        basket.add_to_basket(&product(1, i64::MAX - 10), dec!(1), Unit::Kg, None)?;
        let id = basket.add_to_basket(&product(2, 10), dec!(1), Unit::Kg, None)?;

        assert_eq!(
            basket.update_item(id, BasketLineUpdate::quantity(dec!(2))),
            Err(BasketError::Pricing(PricingError::TotalOverflow))
        );
        assert_eq!(basket.get(id).map(BasketLine::quantity), Some(dec!(1)));
        assert_eq!(basket.total_price().to_minor_units(), i64::MAX);

        Ok(())
    }

    #[test]
    fn foreign_currency_products_are_rejected() {
        let mut basket = basket();
        let mut imported = product(9, 100);
        imported.price = Money::from_minor(100, iso::EUR);

        assert_eq!(
            basket.add_to_basket(&imported, dec!(1), Unit::Kg, None),
            Err(BasketError::CurrencyMismatch {
                product: ProductId::new(9),
                found: "EUR",
                expected: "RUB",
            })
        );
    }

    #[test]
    fn updating_quantity_recomputes_total() -> TestResult {
        let mut basket = basket();

        let id = basket.add_to_basket(&product(2, 89_00), dec!(1), Unit::Kg, None)?;
        let line = basket.update_item(id, BasketLineUpdate::quantity(dec!(1.5)))?;

        assert_eq!(line.quantity(), dec!(1.5));
        assert_eq!(line.line_total().to_minor_units(), 133_50);
        assert_eq!(basket.total_price().to_minor_units(), 133_50);

        Ok(())
    }

    #[test]
    fn updating_other_fields_keeps_total() -> TestResult {
        let mut basket = basket();

        let id = basket.add_to_basket(&product(2, 89_00), dec!(2), Unit::Kg, None)?;
        let line = basket.update_item(
            id,
            BasketLineUpdate {
                unit: Some(Unit::G),
                delivery_date: Some(date(2025, 1, 1)),
                ..BasketLineUpdate::default()
            },
        )?;

        assert_eq!(line.unit(), Unit::G);
        assert_eq!(line.delivery_date(), date(2025, 1, 1));
        assert_eq!(line.quantity(), dec!(2));
        assert_eq!(line.line_total().to_minor_units(), 178_00);

        Ok(())
    }

    #[test]
    fn updating_unknown_line_is_not_found() {
        let mut basket = basket();
        let id = BasketLineId::new(12345);

        assert_eq!(
            basket.update_item(id, BasketLineUpdate::quantity(dec!(1))),
            Err(BasketError::NotFound(id))
        );
    }

    #[test]
    fn removing_a_line_drops_it() -> TestResult {
        let mut basket = basket();

        let a = basket.add_to_basket(&product(1, 100), dec!(1), Unit::Kg, None)?;
        let b = basket.add_to_basket(&product(2, 200), dec!(1), Unit::Kg, None)?;

        let removed = basket.remove_from_basket(a)?;

        assert_eq!(removed.id(), a);
        assert_eq!(basket.item_count(), 1);
        assert!(basket.get(a).is_none());
        assert!(basket.get(b).is_some());
        assert_eq!(basket.total_price().to_minor_units(), 200);

        Ok(())
    }

    #[test]
    fn removing_unknown_line_changes_nothing() -> TestResult {
        let mut basket = basket();

        basket.add_to_basket(&product(1, 100), dec!(1), Unit::Kg, None)?;

        let missing = BasketLineId::new(1);

        assert_eq!(
            basket.remove_from_basket(missing),
            Err(BasketError::NotFound(missing))
        );
        assert_eq!(basket.item_count(), 1);

        Ok(())
    }

    #[test]
    fn clear_empties_the_basket() -> TestResult {
        let mut basket = basket();

        basket.add_to_basket(&product(1, 100), dec!(1), Unit::Kg, None)?;
        basket.add_to_basket(&product(2, 100), dec!(1), Unit::Kg, None)?;
        basket.clear();

        assert!(basket.is_empty());
        assert_eq!(basket.total_price().to_minor_units(), 0);

        Ok(())
    }

    #[test]
    fn item_count_counts_lines_not_quantity() -> TestResult {
        let mut basket = basket();

        basket.add_to_basket(&product(1, 100), dec!(5), Unit::Kg, None)?;
        basket.add_to_basket(&product(2, 100), dec!(2.5), Unit::Kg, None)?;

        assert_eq!(basket.item_count(), 2);
        assert_eq!(basket.total_quantity(), Some(dec!(7.5)));

        Ok(())
    }

    #[test]
    fn find_by_product_locates_line() -> TestResult {
        let mut basket = basket();

        let id = basket.add_to_basket(&product(4, 79_00), dec!(3), Unit::Kg, None)?;

        assert_eq!(
            basket.find_by_product(ProductId::new(4)).map(BasketLine::id),
            Some(id)
        );
        assert!(basket.find_by_product(ProductId::new(5)).is_none());

        Ok(())
    }

    #[test]
    fn restored_lines_reserve_their_ids() -> TestResult {
        let mut basket = basket();
        let restored_id = BasketLineId::new(u64::MAX - 1);

        basket.restore_line(BasketLine::new(
            restored_id,
            &product(1, 100),
            dec!(1),
            Unit::Kg,
            date(2024, 12, 20),
        )?)?;

        let next = basket.add_to_basket(&product(2, 100), dec!(1), Unit::Kg, None)?;

        assert!(next > restored_id, "new ids must not collide with restored ones");

        Ok(())
    }
}
