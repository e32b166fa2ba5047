//! Products

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::ids::TypedId;

/// Product Id
pub type ProductId = TypedId<Product>;

/// Unit a product is sold and measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Kilograms
    #[default]
    Kg,

    /// Grams
    G,

    /// Single pieces
    Piece,

    /// Pre-packed bundles
    Pack,
}

impl Unit {
    /// Every unit, in display order.
    pub const ALL: [Unit; 4] = [Unit::Kg, Unit::G, Unit::Piece, Unit::Pack];

    /// Short label used in fixtures and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::G => "g",
            Unit::Piece => "piece",
            Unit::Pack => "pack",
        }
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a unit label is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown unit: {0}")]
pub struct UnknownUnit(pub String);

impl FromStr for Unit {
    type Err = UnknownUnit;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownUnit(value.to_string()))
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Catalog id
    pub id: ProductId,

    /// Display name
    pub title: String,

    /// Category, e.g. "Root vegetables"
    pub category: String,

    /// Region the produce comes from
    pub origin: String,

    /// Price per `unit`
    pub price: Money<'static, Currency>,

    /// Unit the price refers to
    pub unit: Unit,

    /// Image path or URL
    pub image: String,

    /// Long description
    pub description: String,
}
