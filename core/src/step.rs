// checkout/src/step.rs

//! The checkout steps and the resolver that picks the active one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One stage of checkout, ordered `Customer < Address < Shipping`.
///
/// Payment is not a step here; it is an external hand-off after `Shipping`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
  Customer,
  Address,
  Shipping,
}

impl CheckoutStep {
  pub const ALL: [CheckoutStep; 3] = [CheckoutStep::Customer, CheckoutStep::Address, CheckoutStep::Shipping];

  /// Value carried in the `step` query parameter.
  pub fn as_str(self) -> &'static str {
    match self {
      CheckoutStep::Customer => "customer",
      CheckoutStep::Address => "address",
      CheckoutStep::Shipping => "shipping",
    }
  }

  /// 1-based position shown in the step header.
  pub fn index(self) -> usize {
    match self {
      CheckoutStep::Customer => 1,
      CheckoutStep::Address => 2,
      CheckoutStep::Shipping => 3,
    }
  }

  /// The step after this one, `None` after `Shipping`.
  pub fn next(self) -> Option<CheckoutStep> {
    match self {
      CheckoutStep::Customer => Some(CheckoutStep::Address),
      CheckoutStep::Address => Some(CheckoutStep::Shipping),
      CheckoutStep::Shipping => None,
    }
  }

  /// Steps strictly before this one.
  pub fn predecessors(self) -> impl Iterator<Item = CheckoutStep> {
    CheckoutStep::ALL.into_iter().filter(move |s| *s < self)
  }

  pub fn title(self) -> &'static str {
    match self {
      CheckoutStep::Customer => "Customer Information",
      CheckoutStep::Address => "Shipping Address",
      CheckoutStep::Shipping => "Delivery Method",
    }
  }
}

impl fmt::Display for CheckoutStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized checkout step '{0}'")]
pub struct UnknownStep(pub String);

impl FromStr for CheckoutStep {
  type Err = UnknownStep;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    CheckoutStep::ALL
      .into_iter()
      .find(|step| step.as_str() == s)
      .ok_or_else(|| UnknownStep(s.to_string()))
  }
}

/// Picks the step to display.
///
/// A recognized `query` value wins outright, with no check that earlier
/// steps are complete. Anything else falls back to `Address` for a
/// signed-in shopper and `Customer` otherwise.
pub fn resolve_current_step(query: Option<&str>, is_signed_in: bool) -> CheckoutStep {
  if let Some(step) = query.and_then(|q| q.parse::<CheckoutStep>().ok()) {
    return step;
  }
  if is_signed_in {
    CheckoutStep::Address
  } else {
    CheckoutStep::Customer
  }
}
