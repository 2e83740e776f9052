// checkout/src/completion.rs

//! Per-step completion, derived from the order snapshot alone.

use crate::model::Order;
use crate::policy::RequiredFields;
use crate::step::CheckoutStep;
use serde::Serialize;

/// Whether `step` is complete for `order`.
///
/// - `Customer`: a customer is attached. Field values are not re-checked.
/// - `Address`: a shipping address is attached and every required field is filled.
/// - `Shipping`: the first shipping line has a method. No lines means incomplete.
pub fn is_complete(step: CheckoutStep, order: &Order, required: &RequiredFields) -> bool {
  match step {
    CheckoutStep::Customer => order.customer.is_some(),
    CheckoutStep::Address => order
      .shipping_address
      .as_ref()
      .is_some_and(|address| required.satisfied_by(address)),
    CheckoutStep::Shipping => order.selected_shipping_method().is_some(),
  }
}

/// Completion flags for all three steps, computed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepCompletion {
  pub customer: bool,
  pub address: bool,
  pub shipping: bool,
}

impl StepCompletion {
  pub fn evaluate(order: &Order, required: &RequiredFields) -> Self {
    Self {
      customer: is_complete(CheckoutStep::Customer, order, required),
      address: is_complete(CheckoutStep::Address, order, required),
      shipping: is_complete(CheckoutStep::Shipping, order, required),
    }
  }

  pub fn get(&self, step: CheckoutStep) -> bool {
    match step {
      CheckoutStep::Customer => self.customer,
      CheckoutStep::Address => self.address,
      CheckoutStep::Shipping => self.shipping,
    }
  }

  /// The payment gate: every step complete.
  pub fn all_complete(&self) -> bool {
    self.customer && self.address && self.shipping
  }
}
