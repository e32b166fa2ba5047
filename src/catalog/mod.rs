//! Catalog
//!
//! The read-only product list. A catalog is loaded once at startup from a YAML
//! fixture and never changes afterwards.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::products::{Product, ProductId};

pub mod fixture;

use fixture::ProductsFixture;

const SAMPLE_CATALOG: &str = include_str!("../../fixtures/products/vegetables.yml");

/// Catalog Loading Errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a catalog file
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Products priced in different currencies
    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Currency of the first product
        expected: &'static str,

        /// Currency of the offending product
        found: &'static str,
    },

    /// Two products share an id
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// The fixture lists no products, so the currency is unknown
    #[error("catalog has no products")]
    Empty,
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
    currency: &'static Currency,
}

impl Catalog {
    /// Build a catalog from already constructed products.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, ids repeat, or currencies differ.
    pub fn new(products: impl Into<Vec<Product>>) -> Result<Self, CatalogError> {
        let products = products.into();

        let currency = products
            .first()
            .map(|product| product.price.currency())
            .ok_or(CatalogError::Empty)?;

        let mut index = FxHashMap::default();

        for (idx, product) in products.iter().enumerate() {
            let product_currency = product.price.currency();

            if product_currency != currency {
                return Err(CatalogError::CurrencyMismatch {
                    expected: currency.iso_alpha_code,
                    found: product_currency.iso_alpha_code,
                });
            }

            if index.insert(product.id, idx).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id));
            }
        }

        Ok(Self {
            products,
            index,
            currency,
        })
    }

    /// Parse a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or any product is invalid.
    pub fn from_yaml_str(contents: &str) -> Result<Self, CatalogError> {
        let fixture: ProductsFixture = serde_norway::from_str(contents)?;

        let products = fixture
            .products
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = Self::new(products)?;

        debug!(
            products = catalog.len(),
            currency = catalog.currency.iso_alpha_code,
            "loaded catalog"
        );

        Ok(catalog)
    }

    /// Load a catalog from a YAML file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// The bundled vegetable catalog.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled fixture is invalid.
    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_yaml_str(SAMPLE_CATALOG)
    }

    /// Look up a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).and_then(|&idx| self.products.get(idx))
    }

    /// All products in fixture order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Iterate over all products.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Products belonging to `category` (case-insensitive).
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |product| product.category.eq_ignore_ascii_case(category))
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();

        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }

        categories
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products. Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency shared by every product.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
