// src/lib.rs

//! Checkout: step sequencing and submission handling for a multi-step
//! storefront checkout (customer → shipping address → delivery method →
//! payment hand-off).
//!
//! The crate owns the decisions and leaves pricing, stock, address
//! verification and payment to a remote commerce API reached through the
//! [`OrderGateway`] trait:
//!  - which step is active and whether each step is complete,
//!  - whether the shopper may continue to payment,
//!  - which shipping-address fields are mandatory ([`RequiredFields`]),
//!  - local form validation,
//!  - the validate → submit → navigate pipeline run for every form post.

pub mod core;
pub mod pipeline;

pub mod completion;
pub mod error;
pub mod gateway;
pub mod model;
pub mod orchestrator;
pub mod policy;
pub mod step;
pub mod submission;
pub mod validation;

// --- Re-exports for the Public API ---

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};
pub use crate::pipeline::definition::Pipeline;

pub use crate::completion::{is_complete, StepCompletion};
pub use crate::error::{CheckoutError, CheckoutResult};
pub use crate::gateway::{GatewaySession, MutationOutcome, OrderGateway, ShippingAddressInput};
pub use crate::model::{
  ActiveCustomer, Country, Customer, EligibleShippingMethod, Order, OrderAddress, SavedAddress, SavedCountry,
  ShippingLine, ShippingMethodRef,
};
pub use crate::orchestrator::{
  transition, CheckoutEvent, CheckoutState, CheckoutView, StepContext, StepHeader, Transition, CHECKOUT_PATH,
};
pub use crate::policy::{CheckoutPolicy, RequiredFields, ShippingField, StepGating};
pub use crate::step::{resolve_current_step, CheckoutStep, UnknownStep};
pub use crate::submission::{
  ActiveOrderAction, FormFields, ShippingSubmission, SubmissionCtxData, SubmissionPipeline, SubmissionReport,
};
pub use crate::validation::{
  display_or_dash, is_valid_email, validate_customer, validate_shipping_address, CustomerForm, FieldError,
  ShippingAddressForm, ValidationErrors,
};
