//! Catalog Fixtures

use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, RUB, USD},
};
use serde::Deserialize;

use crate::{
    catalog::CatalogError,
    pricing::to_minor_units,
    products::{Product, ProductId, Unit},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in display order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Catalog id
    pub id: u64,

    /// Product title
    pub title: String,

    /// Product category
    pub category: String,

    /// Region of origin
    #[serde(default)]
    pub origin: String,

    /// Product price (e.g., "189 RUB")
    pub price: String,

    /// Unit the price refers to
    pub unit: Unit,

    /// Image path
    #[serde(default)]
    pub image: String,

    /// Long description
    #[serde(default)]
    pub description: String,
}

impl TryFrom<ProductFixture> for Product {
    type Error = CatalogError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let price = parse_price(&fixture.price)?;

        Ok(Product {
            id: ProductId::new(fixture.id),
            title: fixture.title,
            category: fixture.category,
            origin: fixture.origin,
            price,
            unit: fixture.unit,
            image: fixture.image,
            description: fixture.description,
        })
    }
}

/// Parse a price string (e.g., "35.5 RUB") into money.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, CatalogError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(CatalogError::InvalidPrice(format!(
            "expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(CatalogError::InvalidPrice(s.to_string()));
    }

    let minor_units =
        to_minor_units(amount).ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    Ok(Money::from_minor(minor_units, parse_currency(currency_code)?))
}

/// Resolve a supported ISO currency code.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownCurrency`] for any code other than RUB, GBP, USD or EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, CatalogError> {
    match code {
        "RUB" => Ok(RUB),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(CatalogError::UnknownCurrency(other.to_string())),
    }
}
