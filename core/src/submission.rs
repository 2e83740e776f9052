// checkout/src/submission.rs

//! Handling of a form posted to the active-order endpoint.
//!
//! Every submission runs the same three-step pipeline:
//! `validate_locally` → `submit_to_gateway` → `resolve_navigation`.
//! A local validation failure stops the pipeline before any gateway call.

use crate::core::{ContextData, PipelineControl, PipelineResult, SkipCondition};
use crate::error::{CheckoutError, CheckoutResult};
use crate::gateway::{GatewaySession, MutationOutcome, OrderGateway, ShippingAddressInput};
use crate::model::Order;
use crate::orchestrator::{CheckoutState, Transition};
use crate::pipeline::Pipeline;
use crate::policy::{CheckoutPolicy, ShippingField};
use crate::step::CheckoutStep;
use crate::validation::{validate_customer, validate_shipping_address, CustomerForm, ShippingAddressForm, ValidationErrors};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A flat form post: field name to string value.
pub type FormFields = BTreeMap<String, String>;

pub const ACTION_FIELD: &str = "action";
pub const SAVED_ADDRESS_FIELD: &str = "savedAddressId";
pub const SHIPPING_METHOD_FIELD: &str = "shippingMethodId";

pub const SAVED_ADDRESS_NOT_FOUND: &str = "The selected address is no longer available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShippingSubmission {
  /// Typed into the address form.
  Manual(ShippingAddressForm),
  /// Picked from the signed-in customer's address book.
  Saved { address_id: String },
}

/// A decoded post to the active-order endpoint, keyed by its `action` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveOrderAction {
  SetOrderCustomer(CustomerForm),
  SetCheckoutShipping(ShippingSubmission),
  SetShippingMethod { shipping_method_id: String },
}

impl ActiveOrderAction {
  pub fn name(&self) -> &'static str {
    match self {
      ActiveOrderAction::SetOrderCustomer(_) => "setOrderCustomer",
      ActiveOrderAction::SetCheckoutShipping(_) => "setCheckoutShipping",
      ActiveOrderAction::SetShippingMethod { .. } => "setShippingMethod",
    }
  }

  /// The step whose form produced this action.
  pub fn step(&self) -> CheckoutStep {
    match self {
      ActiveOrderAction::SetOrderCustomer(_) => CheckoutStep::Customer,
      ActiveOrderAction::SetCheckoutShipping(_) => CheckoutStep::Address,
      ActiveOrderAction::SetShippingMethod { .. } => CheckoutStep::Shipping,
    }
  }

  /// Whether a local validator applies before the gateway is called.
  pub fn validates_locally(&self) -> bool {
    matches!(
      self,
      ActiveOrderAction::SetOrderCustomer(_) | ActiveOrderAction::SetCheckoutShipping(ShippingSubmission::Manual(_))
    )
  }

  pub fn from_fields(fields: &FormFields) -> CheckoutResult<Self> {
    let field = |name: &str| fields.get(name).map(String::as_str).unwrap_or("");

    match fields.get(ACTION_FIELD).map(String::as_str) {
      Some("setOrderCustomer") => Ok(ActiveOrderAction::SetOrderCustomer(CustomerForm {
        email_address: field("emailAddress").to_string(),
        first_name: field("firstName").to_string(),
        last_name: field("lastName").to_string(),
      })),
      Some("setCheckoutShipping") => {
        let saved_id = field(SAVED_ADDRESS_FIELD).trim();
        if !saved_id.is_empty() {
          return Ok(ActiveOrderAction::SetCheckoutShipping(ShippingSubmission::Saved {
            address_id: saved_id.to_string(),
          }));
        }
        let form = ShippingField::ALL
          .into_iter()
          .fold(ShippingAddressForm::new(), |form, f| form.with(f, field(f.wire_name())));
        Ok(ActiveOrderAction::SetCheckoutShipping(ShippingSubmission::Manual(form)))
      }
      Some("setShippingMethod") => {
        let id = field(SHIPPING_METHOD_FIELD).trim();
        if id.is_empty() {
          return Err(CheckoutError::MissingField {
            action: "setShippingMethod",
            field: SHIPPING_METHOD_FIELD,
          });
        }
        Ok(ActiveOrderAction::SetShippingMethod {
          shipping_method_id: id.to_string(),
        })
      }
      other => Err(CheckoutError::UnknownAction {
        action: other.map(str::to_string),
      }),
    }
  }
}

/// Underlying data for the submission pipeline.
#[derive(Clone)]
pub struct SubmissionCtxData {
  pub gateway: Arc<dyn OrderGateway>,
  pub session: GatewaySession,
  pub policy: CheckoutPolicy,
  pub action: ActiveOrderAction,
  pub field_errors: ValidationErrors,
  pub error_code: Option<String>,
  pub error_message: Option<String>,
  pub order: Option<Order>,
  pub transition: Option<Transition>,
}

impl SubmissionCtxData {
  pub fn new(gateway: Arc<dyn OrderGateway>, session: GatewaySession, policy: CheckoutPolicy, action: ActiveOrderAction) -> Self {
    Self {
      gateway,
      session,
      policy,
      action,
      field_errors: ValidationErrors::default(),
      error_code: None,
      error_message: None,
      order: None,
      transition: None,
    }
  }
}

/// What the endpoint reports back after a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
  pub step: CheckoutStep,
  pub field_errors: ValidationErrors,
  pub error_code: Option<String>,
  pub error_message: Option<String>,
  /// The updated order, only when the gateway accepted the mutation.
  pub order: Option<Order>,
  pub transition: Transition,
}

impl SubmissionReport {
  pub fn succeeded(&self) -> bool {
    self.field_errors.is_empty() && self.error_message.is_none()
  }

  pub fn navigate_to(&self) -> Option<CheckoutStep> {
    match &self.transition {
      Transition::Navigate(state) => Some(state.step),
      _ => None,
    }
  }

  /// Step the page should show next: the navigation target, or the submitting step.
  pub fn landing_step(&self) -> CheckoutStep {
    self.navigate_to().unwrap_or(self.step)
  }
}

/// The validate → submit → navigate pipeline, built once and shared.
pub struct SubmissionPipeline {
  pipeline: Pipeline<SubmissionCtxData, CheckoutError>,
}

impl Default for SubmissionPipeline {
  fn default() -> Self {
    Self::new()
  }
}

impl SubmissionPipeline {
  pub fn new() -> Self {
    let nothing_to_validate: SkipCondition<SubmissionCtxData> =
      Arc::new(|ctx_data: ContextData<SubmissionCtxData>| !ctx_data.read().action.validates_locally());

    let mut p = Pipeline::<SubmissionCtxData, CheckoutError>::new(&[
      ("validate_locally", false, Some(nothing_to_validate)),
      ("submit_to_gateway", false, None),
      ("resolve_navigation", false, None),
    ]);
    p.on_root("validate_locally", validate_locally_step);
    p.on_root("submit_to_gateway", submit_to_gateway_step);
    p.on_root("resolve_navigation", resolve_navigation_step);

    Self { pipeline: p }
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.pipeline.step_names()
  }

  #[instrument(name = "SubmissionPipeline::run", skip_all, fields(action = %ctx.action.name()))]
  pub async fn run(&self, ctx: SubmissionCtxData) -> CheckoutResult<SubmissionReport> {
    let ctx_data = ContextData::new(ctx);
    let result = self.pipeline.run(ctx_data.clone()).await?;
    let data = ctx_data.into_inner();
    let step = data.action.step();

    let transition = match (result, data.transition) {
      (PipelineResult::Completed, Some(transition)) => transition,
      (PipelineResult::Completed, None) => {
        return Err(CheckoutError::Internal(
          "submission pipeline completed without a navigation decision".to_string(),
        ))
      }
      // Stopped by local validation: nothing was sent.
      (PipelineResult::Stopped, _) => Transition::Stay { error: None },
    };

    Ok(SubmissionReport {
      step,
      field_errors: data.field_errors,
      error_code: data.error_code,
      error_message: data.error_message,
      order: data.order,
      transition,
    })
  }
}

async fn validate_locally_step(ctx_data: ContextData<SubmissionCtxData>) -> CheckoutResult<PipelineControl> {
  let mut guard = ctx_data.write();
  let outcome = match &guard.action {
    ActiveOrderAction::SetOrderCustomer(form) => validate_customer(form),
    ActiveOrderAction::SetCheckoutShipping(ShippingSubmission::Manual(form)) => {
      validate_shipping_address(form, &guard.policy.required_fields)
    }
    _ => Ok(()),
  };
  match outcome {
    Ok(()) => Ok(PipelineControl::Continue),
    Err(errors) => {
      info!(action = guard.action.name(), failing_fields = errors.len(), "Local validation failed; not submitting.");
      guard.field_errors = errors;
      Ok(PipelineControl::Stop)
    }
  }
}

async fn submit_to_gateway_step(ctx_data: ContextData<SubmissionCtxData>) -> CheckoutResult<PipelineControl> {
  let (gateway, session, action) = {
    let guard = ctx_data.read();
    (guard.gateway.clone(), guard.session.clone(), guard.action.clone())
  };

  let outcome = match &action {
    ActiveOrderAction::SetOrderCustomer(form) => gateway.set_order_customer(&session, form).await?,
    ActiveOrderAction::SetCheckoutShipping(ShippingSubmission::Manual(form)) => {
      gateway
        .set_checkout_shipping(&session, &ShippingAddressInput::from(form))
        .await?
    }
    ActiveOrderAction::SetCheckoutShipping(ShippingSubmission::Saved { address_id }) => {
      let saved = gateway
        .active_customer(&session)
        .await?
        .and_then(|customer| customer.addresses.into_iter().find(|a| &a.id == address_id));
      match saved {
        Some(address) => {
          let form = ShippingAddressForm::from_saved(&address);
          gateway
            .set_checkout_shipping(&session, &ShippingAddressInput::from(&form))
            .await?
        }
        None => {
          warn!(%address_id, "Saved address not found for the active customer.");
          MutationOutcome::rejected(SAVED_ADDRESS_NOT_FOUND)
        }
      }
    }
    ActiveOrderAction::SetShippingMethod { shipping_method_id } => {
      gateway.set_shipping_method(&session, shipping_method_id).await?
    }
  };

  let mut guard = ctx_data.write();
  match outcome {
    MutationOutcome::Updated(order) => {
      info!(action = action.name(), order_code = %order.code, "Gateway accepted submission.");
      guard.order = Some(order);
    }
    MutationOutcome::Rejected { error_code, message } => {
      warn!(action = action.name(), ?error_code, %message, "Gateway rejected submission.");
      guard.error_code = error_code;
      guard.error_message = Some(message);
    }
  }
  Ok(PipelineControl::Continue)
}

async fn resolve_navigation_step(ctx_data: ContextData<SubmissionCtxData>) -> CheckoutResult<PipelineControl> {
  let mut guard = ctx_data.write();
  let state = CheckoutState::new(guard.action.step());
  let transition = state.after_submission(guard.error_message.clone());
  info!(from = %state.step, ?transition, "Submission navigation resolved.");
  guard.transition = Some(transition);
  Ok(PipelineControl::Continue)
}
