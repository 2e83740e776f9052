// checkout/src/policy.rs

//! The required-field policy and other checkout policy knobs.
//!
//! `RequiredFields` is the one place that decides which shipping-address
//! fields are mandatory. The renderer's `required` markers, the address
//! validator and the address completion check all read the same value.

use crate::error::CheckoutError;
use crate::model::OrderAddress;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Every field of a shipping address, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShippingField {
  FullName,
  Company,
  StreetLine1,
  StreetLine2,
  City,
  Province,
  PostalCode,
  CountryCode,
  PhoneNumber,
}

impl ShippingField {
  pub const ALL: [ShippingField; 9] = [
    ShippingField::FullName,
    ShippingField::Company,
    ShippingField::StreetLine1,
    ShippingField::StreetLine2,
    ShippingField::City,
    ShippingField::Province,
    ShippingField::PostalCode,
    ShippingField::CountryCode,
    ShippingField::PhoneNumber,
  ];

  /// Name used in form posts and in the Shop API's address input.
  pub fn wire_name(self) -> &'static str {
    match self {
      ShippingField::FullName => "fullName",
      ShippingField::Company => "company",
      ShippingField::StreetLine1 => "streetLine1",
      ShippingField::StreetLine2 => "streetLine2",
      ShippingField::City => "city",
      ShippingField::Province => "province",
      ShippingField::PostalCode => "postalCode",
      ShippingField::CountryCode => "countryCode",
      ShippingField::PhoneNumber => "phoneNumber",
    }
  }

  /// Input label shown next to the form control.
  pub fn label(self) -> &'static str {
    match self {
      ShippingField::FullName => "Full Name",
      ShippingField::Company => "Company",
      ShippingField::StreetLine1 => "Address",
      ShippingField::StreetLine2 => "Address line 2",
      ShippingField::City => "City",
      ShippingField::Province => "Province",
      ShippingField::PostalCode => "Postal Code",
      ShippingField::CountryCode => "Country",
      ShippingField::PhoneNumber => "Phone Number",
    }
  }

  /// Subject used in "<subject> is required" messages.
  pub(crate) fn message_subject(self) -> &'static str {
    match self {
      ShippingField::FullName => "Full name",
      ShippingField::Company => "Company",
      ShippingField::StreetLine1 => "Street line 1",
      ShippingField::StreetLine2 => "Street line 2",
      ShippingField::City => "City",
      ShippingField::Province => "Province",
      ShippingField::PostalCode => "Postal code",
      ShippingField::CountryCode => "Country code",
      ShippingField::PhoneNumber => "Phone number",
    }
  }

  pub fn value_in(self, address: &OrderAddress) -> Option<&str> {
    let value = match self {
      ShippingField::FullName => &address.full_name,
      ShippingField::Company => &address.company,
      ShippingField::StreetLine1 => &address.street_line1,
      ShippingField::StreetLine2 => &address.street_line2,
      ShippingField::City => &address.city,
      ShippingField::Province => &address.province,
      ShippingField::PostalCode => &address.postal_code,
      ShippingField::CountryCode => &address.country_code,
      ShippingField::PhoneNumber => &address.phone_number,
    };
    value.as_deref()
  }
}

impl fmt::Display for ShippingField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.wire_name())
  }
}

impl FromStr for ShippingField {
  type Err = CheckoutError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ShippingField::ALL
      .into_iter()
      .find(|field| field.wire_name() == s)
      .ok_or_else(|| CheckoutError::Configuration(format!("Unknown shipping address field '{}'", s)))
  }
}

/// The set of shipping-address fields treated as mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFields(BTreeSet<ShippingField>);

impl RequiredFields {
  /// Seven fields: everything except company and the second street line.
  pub fn strict() -> Self {
    Self::from_fields([
      ShippingField::FullName,
      ShippingField::CountryCode,
      ShippingField::StreetLine1,
      ShippingField::Province,
      ShippingField::City,
      ShippingField::PhoneNumber,
      ShippingField::PostalCode,
    ])
  }

  /// Four fields: street, city, country and postal code.
  pub fn minimal() -> Self {
    Self::from_fields([
      ShippingField::StreetLine1,
      ShippingField::City,
      ShippingField::CountryCode,
      ShippingField::PostalCode,
    ])
  }

  pub fn from_fields(fields: impl IntoIterator<Item = ShippingField>) -> Self {
    RequiredFields(fields.into_iter().collect())
  }

  pub fn is_required(&self, field: ShippingField) -> bool {
    self.0.contains(&field)
  }

  /// Required fields in form order.
  pub fn iter(&self) -> impl Iterator<Item = ShippingField> + '_ {
    self.0.iter().copied()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Whether every required field holds a non-empty value on `address`.
  pub fn satisfied_by(&self, address: &OrderAddress) -> bool {
    self
      .iter()
      .all(|field| field.value_in(address).is_some_and(|v| !v.is_empty()))
  }
}

impl Default for RequiredFields {
  fn default() -> Self {
    Self::strict()
  }
}

/// Accepts `strict`, `minimal`, or a comma-separated list of field wire names.
impl FromStr for RequiredFields {
  type Err = CheckoutError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "strict" => Ok(Self::strict()),
      "minimal" => Ok(Self::minimal()),
      "" => Err(CheckoutError::Configuration(
        "Required shipping field list must not be empty".to_string(),
      )),
      list => list
        .split(',')
        .map(|name| name.trim().parse::<ShippingField>())
        .collect::<Result<BTreeSet<_>, _>>()
        .map(RequiredFields),
    }
  }
}

/// Whether step headers may be visited out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepGating {
  /// Any step can be opened at any time; completion is informational.
  #[default]
  Open,
  /// A step can only be opened once every earlier step is complete.
  Linear,
}

impl FromStr for StepGating {
  type Err = CheckoutError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "open" => Ok(StepGating::Open),
      "linear" => Ok(StepGating::Linear),
      other => Err(CheckoutError::Configuration(format!(
        "Unknown step gating '{}', expected 'open' or 'linear'",
        other
      ))),
    }
  }
}

/// Policy values threaded through every checkout decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutPolicy {
  pub required_fields: RequiredFields,
  pub gating: StepGating,
}
