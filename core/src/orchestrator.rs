// checkout/src/orchestrator.rs

//! Composes step resolution and completion into per-request decisions.
//!
//! The active step is explicit state (`CheckoutState`) driven by a pure
//! `transition` function. The `step` query parameter is only its
//! serialization, kept for bookmarks and the back button.

use crate::completion::StepCompletion;
use crate::error::{CheckoutError, CheckoutResult};
use crate::model::Order;
use crate::policy::{CheckoutPolicy, StepGating};
use crate::step::{resolve_current_step, CheckoutStep};
use serde::Serialize;

pub const CHECKOUT_PATH: &str = "/checkout";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckoutState {
  pub step: CheckoutStep,
}

impl CheckoutState {
  pub fn new(step: CheckoutStep) -> Self {
    Self { step }
  }

  pub fn from_query(query: Option<&str>, is_signed_in: bool) -> Self {
    Self::new(resolve_current_step(query, is_signed_in))
  }

  pub fn to_query(&self) -> String {
    format!("step={}", self.step)
  }

  /// Page URL that restores this state.
  pub fn location(&self) -> String {
    format!("{}?{}", CHECKOUT_PATH, self.to_query())
  }

  /// Outcome of submitting this step's form: advance on success, otherwise
  /// stay and surface the message. Needs no order facts.
  pub fn after_submission(&self, failure: Option<String>) -> Transition {
    match failure {
      Some(message) => Transition::Stay { error: Some(message) },
      None => match self.step.next() {
        Some(next) => Transition::Navigate(CheckoutState::new(next)),
        None => Transition::Stay { error: None },
      },
    }
  }
}

/// Facts about the order a transition may consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepContext {
  pub completion: StepCompletion,
  pub is_signed_in: bool,
  pub gating: StepGating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEvent {
  /// The gateway accepted the form for the current step.
  SubmissionSucceeded,
  /// The gateway returned an error payload instead of an order.
  SubmissionFailed { message: String },
  /// The shopper clicked a step header.
  StepSelected(CheckoutStep),
  /// The shopper asked to continue to payment.
  ProceedToPayment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
  Navigate(CheckoutState),
  /// Keep the current step, optionally surfacing an error next to its form.
  Stay { error: Option<String> },
  /// Nothing to do; no reload.
  NoOp,
  EnterPayment,
  Blocked { reason: String },
}

pub fn transition(state: &CheckoutState, event: CheckoutEvent, ctx: &StepContext) -> Transition {
  match event {
    CheckoutEvent::SubmissionSucceeded => state.after_submission(None),
    CheckoutEvent::SubmissionFailed { message } => state.after_submission(Some(message)),
    CheckoutEvent::StepSelected(target) => {
      if target == state.step {
        return Transition::NoOp;
      }
      if target == CheckoutStep::Customer && ctx.is_signed_in {
        return Transition::NoOp;
      }
      if ctx.gating == StepGating::Linear && target.predecessors().any(|s| !ctx.completion.get(s)) {
        return Transition::NoOp;
      }
      Transition::Navigate(CheckoutState::new(target))
    }
    CheckoutEvent::ProceedToPayment => {
      if ctx.completion.all_complete() {
        Transition::EnterPayment
      } else {
        Transition::Blocked {
          reason: blocked_reason(&ctx.completion),
        }
      }
    }
  }
}

fn blocked_reason(completion: &StepCompletion) -> String {
  let missing = CheckoutStep::ALL
    .into_iter()
    .filter(|s| !completion.get(*s))
    .map(CheckoutStep::as_str)
    .collect::<Vec<_>>();
  format!("incomplete steps: {}", missing.join(", "))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepHeader {
  pub step: CheckoutStep,
  pub index: usize,
  pub title: &'static str,
  pub subtitle: String,
  pub complete: bool,
  pub active: bool,
  /// Where clicking the header goes; `None` when the click is a no-op.
  pub href: Option<String>,
}

/// Everything a render of the checkout page needs to decide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
  pub state: CheckoutState,
  pub completion: StepCompletion,
  pub can_advance_to_payment: bool,
  pub is_signed_in: bool,
  pub gating: StepGating,
  pub headers: Vec<StepHeader>,
}

impl CheckoutView {
  pub fn derive(order: &Order, query: Option<&str>, is_signed_in: bool, policy: &CheckoutPolicy) -> Self {
    let state = CheckoutState::from_query(query, is_signed_in);
    let completion = StepCompletion::evaluate(order, &policy.required_fields);
    let ctx = StepContext {
      completion,
      is_signed_in,
      gating: policy.gating,
    };

    let headers = CheckoutStep::ALL
      .into_iter()
      .map(|step| {
        let href = match transition(&state, CheckoutEvent::StepSelected(step), &ctx) {
          Transition::Navigate(target) => Some(target.location()),
          _ => None,
        };
        StepHeader {
          step,
          index: step.index(),
          title: step.title(),
          subtitle: step_summary(step, order).unwrap_or_default(),
          complete: completion.get(step),
          active: step == state.step,
          href,
        }
      })
      .collect();

    Self {
      state,
      completion,
      can_advance_to_payment: completion.all_complete(),
      is_signed_in,
      gating: policy.gating,
      headers,
    }
  }

  pub fn active_step(&self) -> CheckoutStep {
    self.state.step
  }

  pub fn step_context(&self) -> StepContext {
    StepContext {
      completion: self.completion,
      is_signed_in: self.is_signed_in,
      gating: self.gating,
    }
  }

  /// The step whose form is expanded, if any. Signed-in shoppers never see the customer form.
  pub fn form_step(&self) -> Option<CheckoutStep> {
    match self.state.step {
      CheckoutStep::Customer if self.is_signed_in => None,
      step => Some(step),
    }
  }

  /// The payment button lives under the delivery method step.
  pub fn shows_payment_button(&self) -> bool {
    self.state.step == CheckoutStep::Shipping
  }

  pub fn apply(&self, event: CheckoutEvent) -> Transition {
    transition(&self.state, event, &self.step_context())
  }

  /// Re-checks the payment gate right before the hand-off.
  pub fn ensure_payment_ready(&self) -> CheckoutResult<()> {
    match self.apply(CheckoutEvent::ProceedToPayment) {
      Transition::EnterPayment => Ok(()),
      Transition::Blocked { reason } => Err(CheckoutError::PaymentNotReady { reason }),
      other => Err(CheckoutError::Internal(format!(
        "unexpected transition for payment request: {:?}",
        other
      ))),
    }
  }
}

pub fn step_summary(step: CheckoutStep, order: &Order) -> Option<String> {
  match step {
    CheckoutStep::Customer => customer_summary(order),
    CheckoutStep::Address => Some(address_summary(order)).filter(|s| !s.is_empty()),
    CheckoutStep::Shipping => order.selected_shipping_method().map(|m| m.name.clone()),
  }
}

pub fn customer_summary(order: &Order) -> Option<String> {
  order
    .customer
    .as_ref()
    .map(|c| format!("{} {}", c.first_name, c.last_name))
}

/// Street, city, province and country, skipping blanks.
pub fn address_summary(order: &Order) -> String {
  let Some(address) = order.shipping_address.as_ref() else {
    return String::new();
  };
  [
    &address.street_line1,
    &address.city,
    &address.province,
    &address.country_code,
  ]
  .into_iter()
  .filter_map(|part| part.as_deref().filter(|s| !s.is_empty()))
  .collect::<Vec<_>>()
  .join(", ")
}
