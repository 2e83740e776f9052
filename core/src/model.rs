// checkout/src/model.rs

//! Read-only snapshots of the data owned by the remote commerce backend.
//!
//! Field names follow the Shop API's camelCase JSON so the gateway can
//! deserialize responses directly into these types.

use serde::{Deserialize, Serialize};

/// The shopper's active order as returned by the gateway.
///
/// Fetched fresh for every request and never mutated locally; mutations go
/// through the gateway and the snapshot is replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: String,
  #[serde(default)]
  pub code: String,
  #[serde(default)]
  pub currency_code: String,
  #[serde(default)]
  pub customer: Option<Customer>,
  #[serde(default)]
  pub shipping_address: Option<OrderAddress>,
  #[serde(default)]
  pub shipping_lines: Vec<ShippingLine>,
  #[serde(default)]
  pub total_with_tax: i64,
}

impl Order {
  /// The method chosen on the first shipping line, if any.
  pub fn selected_shipping_method(&self) -> Option<&ShippingMethodRef> {
    self.shipping_lines.first()?.shipping_method.as_ref()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
  #[serde(default)]
  pub id: Option<String>,
  pub email_address: String,
  pub first_name: String,
  pub last_name: String,
}

/// Shipping address attached to an order. The backend returns nulls for
/// anything never set, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAddress {
  pub full_name: Option<String>,
  pub company: Option<String>,
  pub street_line1: Option<String>,
  pub street_line2: Option<String>,
  pub city: Option<String>,
  pub province: Option<String>,
  pub postal_code: Option<String>,
  pub country_code: Option<String>,
  pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLine {
  #[serde(default)]
  pub shipping_method: Option<ShippingMethodRef>,
  #[serde(default)]
  pub price_with_tax: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethodRef {
  pub id: String,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
  pub id: String,
  pub code: String,
  pub name: String,
}

/// A shipping option the backend offers for the current order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleShippingMethod {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub price_with_tax: i64,
}

/// The signed-in customer, present only when the session is authenticated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveCustomer {
  pub id: String,
  #[serde(default)]
  pub addresses: Vec<SavedAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCountry {
  pub code: String,
  pub name: String,
}

/// An address from the customer's address book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAddress {
  pub id: String,
  #[serde(default)]
  pub full_name: Option<String>,
  #[serde(default)]
  pub company: Option<String>,
  pub street_line1: String,
  #[serde(default)]
  pub street_line2: Option<String>,
  #[serde(default)]
  pub city: Option<String>,
  #[serde(default)]
  pub province: Option<String>,
  #[serde(default)]
  pub postal_code: Option<String>,
  pub country: SavedCountry,
  #[serde(default)]
  pub phone_number: Option<String>,
  #[serde(default)]
  pub default_shipping_address: bool,
}

impl SavedAddress {
  /// Whether this book entry is the one already attached to the order.
  pub fn matches(&self, address: &OrderAddress) -> bool {
    self.full_name == address.full_name
      && address.country_code.as_deref() == Some(self.country.code.as_str())
      && self.city == address.city
      && address.street_line1.as_deref() == Some(self.street_line1.as_str())
  }
}
