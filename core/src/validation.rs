// checkout/src/validation.rs

//! Local, advisory validation of the customer and shipping-address forms.
//!
//! Nothing here is authoritative: the remote system re-validates every
//! mutation. These checks only spare the shopper a round trip.

use crate::policy::{RequiredFields, ShippingField};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$")
    .expect("email pattern is a valid regex")
});

const MIN_PHONE_LENGTH: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field: &'static str,
  pub message: String,
}

/// One message per failing field, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
  fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.push(FieldError {
      field,
      message: message.into(),
    });
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
    self.0.iter()
  }

  pub fn message_for(&self, field: &str) -> Option<&str> {
    self.0.iter().find(|e| e.field == field).map(|e| e.message.as_str())
  }

  /// Field name to message, the shape the JSON endpoint and templates consume.
  pub fn to_map(&self) -> BTreeMap<&'static str, String> {
    self.0.iter().map(|e| (e.field, e.message.clone())).collect()
  }

  fn into_result(self) -> Result<(), ValidationErrors> {
    if self.is_empty() {
      Ok(())
    } else {
      Err(self)
    }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let joined = self
      .0
      .iter()
      .map(|e| format!("{}: {}", e.field, e.message))
      .collect::<Vec<_>>()
      .join("; ");
    f.write_str(&joined)
  }
}

/// Fields posted with `action=setOrderCustomer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerForm {
  pub email_address: String,
  pub first_name: String,
  pub last_name: String,
}

pub fn validate_customer(form: &CustomerForm) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::default();
  if !is_valid_email(&form.email_address) {
    errors.push("emailAddress", "Email is invalid");
  }
  if form.first_name.trim().is_empty() {
    errors.push("firstName", "First name is required");
  }
  if form.last_name.trim().is_empty() {
    errors.push("lastName", "Last name is required");
  }
  errors.into_result()
}

pub fn is_valid_email(candidate: &str) -> bool {
  EMAIL_SHAPE.is_match(candidate)
}

/// Fields posted with `action=setCheckoutShipping`, keyed by the explicit
/// field list rather than whatever keys the post happened to carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingAddressForm(BTreeMap<ShippingField, String>);

impl ShippingAddressForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, field: ShippingField, value: impl Into<String>) -> Self {
    self.set(field, value);
    self
  }

  pub fn set(&mut self, field: ShippingField, value: impl Into<String>) {
    self.0.insert(field, value.into());
  }

  /// Missing fields read as empty.
  pub fn get(&self, field: ShippingField) -> &str {
    self.0.get(&field).map(String::as_str).unwrap_or("")
  }
}

pub fn validate_shipping_address(form: &ShippingAddressForm, required: &RequiredFields) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::default();
  for field in required.iter() {
    let value = form.get(field);
    match field {
      ShippingField::PhoneNumber if value.chars().count() < MIN_PHONE_LENGTH => {
        errors.push(field.wire_name(), "Invalid Phone Number");
      }
      _ if value.is_empty() => {
        errors.push(field.wire_name(), format!("{} is required", field.message_subject()));
      }
      _ => {}
    }
  }
  errors.into_result()
}

/// Blank strings render as `-` in step summaries.
pub fn display_or_dash(input: Option<&str>) -> &str {
  match input {
    Some(s) if !s.trim().is_empty() => s,
    _ => "-",
  }
}
