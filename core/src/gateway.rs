// checkout/src/gateway.rs

//! The contract the checkout needs from the remote order-management API.

use crate::error::CheckoutResult;
use crate::model::{ActiveCustomer, Country, EligibleShippingMethod, Order, SavedAddress};
use crate::policy::ShippingField;
use crate::validation::{CustomerForm, ShippingAddressForm};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

/// The shopper's credentials, forwarded verbatim to the remote API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewaySession {
  pub cookie: Option<String>,
  pub authorization: Option<String>,
}

impl GatewaySession {
  pub fn anonymous() -> Self {
    Self::default()
  }
}

/// Result of a mutation that the remote API answered.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
  Updated(Order),
  /// The API returned an error payload instead of an order.
  Rejected { error_code: Option<String>, message: String },
}

impl MutationOutcome {
  pub fn rejected(message: impl Into<String>) -> Self {
    MutationOutcome::Rejected {
      error_code: None,
      message: message.into(),
    }
  }
}

/// Address payload for `setCheckoutShipping`, built from the explicit field list.
///
/// Blank values are left out so optional fields reach the API as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ShippingAddressInput(BTreeMap<&'static str, String>);

impl ShippingAddressInput {
  pub fn get(&self, field: ShippingField) -> Option<&str> {
    self.0.get(field.wire_name()).map(String::as_str)
  }
}

impl From<&ShippingAddressForm> for ShippingAddressInput {
  fn from(form: &ShippingAddressForm) -> Self {
    let entries = ShippingField::ALL
      .into_iter()
      .filter_map(|field| {
        let value = form.get(field).trim();
        (!value.is_empty()).then(|| (field.wire_name(), value.to_string()))
      })
      .collect();
    ShippingAddressInput(entries)
  }
}

impl ShippingAddressForm {
  /// Copies an address-book entry into form fields.
  pub fn from_saved(saved: &SavedAddress) -> Self {
    let mut form = ShippingAddressForm::new();
    for field in ShippingField::ALL {
      let value = match field {
        ShippingField::FullName => saved.full_name.clone(),
        ShippingField::Company => saved.company.clone(),
        ShippingField::StreetLine1 => Some(saved.street_line1.clone()),
        ShippingField::StreetLine2 => saved.street_line2.clone(),
        ShippingField::City => saved.city.clone(),
        ShippingField::Province => saved.province.clone(),
        ShippingField::PostalCode => saved.postal_code.clone(),
        ShippingField::CountryCode => Some(saved.country.code.clone()),
        ShippingField::PhoneNumber => saved.phone_number.clone(),
      };
      if let Some(value) = value {
        form.set(field, value);
      }
    }
    form
  }
}

/// Read and write access to the active order.
///
/// Reads fail only on transport or decoding problems. Mutations separate
/// an API-level rejection (`MutationOutcome::Rejected`) from a transport
/// failure (`Err`).
#[async_trait]
pub trait OrderGateway: Send + Sync {
  async fn active_order(&self, session: &GatewaySession) -> CheckoutResult<Option<Order>>;

  async fn available_countries(&self, session: &GatewaySession) -> CheckoutResult<Vec<Country>>;

  async fn eligible_shipping_methods(&self, session: &GatewaySession) -> CheckoutResult<Vec<EligibleShippingMethod>>;

  /// `None` for guests.
  async fn active_customer(&self, session: &GatewaySession) -> CheckoutResult<Option<ActiveCustomer>>;

  async fn set_order_customer(&self, session: &GatewaySession, customer: &CustomerForm)
    -> CheckoutResult<MutationOutcome>;

  async fn set_checkout_shipping(
    &self,
    session: &GatewaySession,
    address: &ShippingAddressInput,
  ) -> CheckoutResult<MutationOutcome>;

  async fn set_shipping_method(&self, session: &GatewaySession, shipping_method_id: &str)
    -> CheckoutResult<MutationOutcome>;
}
