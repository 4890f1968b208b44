//! Core menu domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

/// The maximum number of characters allowed in a category name.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 30;

/// A validated, non-empty category name of at most [MAX_CATEGORY_NAME_LENGTH]
/// characters.
///
/// Uniqueness among sibling categories is checked separately, where the full
/// category list is available.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyCategoryName] if `name` is empty after trimming,
    /// or [Error::CategoryNameTooLong] if it exceeds
    /// [MAX_CATEGORY_NAME_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::EmptyCategoryName);
        }

        let length = name.chars().count();
        if length > MAX_CATEGORY_NAME_LENGTH {
            return Err(Error::CategoryNameTooLong(length));
        }

        Ok(Self(name.to_string()))
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure the string is non-empty and within the length
    /// limit. This function has `_unchecked` in the name but is not `unsafe`,
    /// because violating the invariant causes incorrect behaviour but does
    /// not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The currencies a product price can be quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Argentine peso.
    #[default]
    #[serde(rename = "ARS")]
    Ars,
    /// United States dollar.
    #[serde(rename = "USD")]
    Usd,
    /// Euro.
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    /// The ISO 4217 code for this currency.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Ars => "ARS",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A menu item with price, description, image, visibility and featured flags.
///
/// Products are embedded in their owning category's document; `category_id`
/// is a redundant back-reference that the store repairs on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque unique id, generated client-side by [new_record_id].
    pub id: String,
    /// Display name, required non-empty at creation.
    pub name: String,
    /// Free-text description, required non-empty at creation.
    pub description: String,
    /// Non-negative price in major units (e.g. `12.50`).
    pub price: f64,
    /// The currency the price is quoted in.
    #[serde(default)]
    pub currency: Currency,
    /// Optional image URI. Never an empty string in memory; the store
    /// normalizes `""` to `None` on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// When true, the product surfaces in the featured cross-category list.
    #[serde(default)]
    pub featured: bool,
    /// When false, the product is excluded from the public projection but
    /// remains editable. A missing field means visible.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Back-reference to the owning category.
    pub category_id: String,
    /// Position within the category. Only relative order matters; gaps are
    /// permitted.
    #[serde(default)]
    pub order: i64,
}

fn default_visible() -> bool {
    true
}

/// A named, ordered group of products shown as a menu section.
///
/// A category exclusively owns its products; no product exists outside a
/// category, and deleting a category deletes its products with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Opaque unique id, generated client-side by [new_record_id].
    pub id: String,
    /// Display name. Validated via [CategoryName] at the edit boundary.
    pub name: String,
    /// The products in this category, in display order.
    #[serde(default)]
    pub products: Vec<Product>,
    /// Position of this category in the menu.
    #[serde(default)]
    pub order: i64,
}

/// Generate an opaque record id using the `timestamp-random` scheme:
/// the current unix time in milliseconds, a dash, and a random base-36
/// suffix.
///
/// Ids are generated client-side (here, server-side on behalf of the
/// client) rather than by the database, so a category and its embedded
/// products can be written in a single document without a round-trip.
pub fn new_record_id() -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix: u32 = rand::random();

    format!("{millis}-{}", to_base36(suffix))
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut out = [b'0'; 7];
    let mut i = out.len();

    loop {
        i -= 1;
        out[i] = DIGITS[(value % 36) as usize];
        value /= 36;

        if value == 0 {
            break;
        }
    }

    String::from_utf8_lossy(&out[i..]).into_owned()
}



#[cfg(test)]
mod serde_tests {
    use super::{Category, Currency, Product};

    #[test]
    fn missing_visible_field_defaults_to_visible() {
        let json = r#"{
            "id": "p1",
            "name": "Margherita",
            "description": "Tomato and mozzarella",
            "price": 10.0,
            "currency": "ARS",
            "categoryId": "c1"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();

        assert!(product.visible);
        assert!(!product.featured);
        assert_eq!(product.image, None);
        assert_eq!(product.order, 0);
        assert_eq!(product.category_id, "c1");
    }

    #[test]
    fn missing_products_and_order_default_to_empty_and_zero() {
        let json = r#"{"id": "c1", "name": "Pizzas"}"#;

        let category: Category = serde_json::from_str(json).unwrap();

        assert!(category.products.is_empty());
        assert_eq!(category.order, 0);
    }

    #[test]
    fn currency_round_trips_as_iso_code() {
        let json = serde_json::to_string(&Currency::Eur).unwrap();

        assert_eq!(json, "\"EUR\"");
        assert_eq!(serde_json::from_str::<Currency>(&json).unwrap(), Currency::Eur);
    }

    #[test]
    fn absent_image_is_not_serialized() {
        let product = Product {
            id: "p1".to_string(),
            name: "Margherita".to_string(),
            description: "Tomato and mozzarella".to_string(),
            price: 10.0,
            currency: Currency::Ars,
            image: None,
            featured: false,
            visible: true,
            category_id: "c1".to_string(),
            order: 0,
        };

        let json = serde_json::to_string(&product).unwrap();

        assert!(!json.contains("image"));
    }
}
