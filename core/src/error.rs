// checkout/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutError {
  #[error("Unknown checkout action: {action:?}")]
  UnknownAction { action: Option<String> },

  #[error("Missing form field '{field}' for action '{action}'")]
  MissingField { action: &'static str, field: &'static str },

  #[error("Gateway call '{operation}' failed. Source: {source}")]
  Gateway {
    operation: &'static str,
    #[source]
    source: AnyhowError,
  },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Cannot proceed to payment: {reason}")]
  PaymentNotReady { reason: String },

  #[error("Configuration error: {0}")]
  Configuration(String),

  #[error("Error in checkout handler. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal checkout error: {0}")]
  Internal(String),
}

impl CheckoutError {
  pub fn gateway(operation: &'static str, source: impl Into<AnyhowError>) -> Self {
    CheckoutError::Gateway {
      operation,
      source: source.into(),
    }
  }
}

impl From<AnyhowError> for CheckoutError {
  fn from(err: AnyhowError) -> Self {
    CheckoutError::HandlerError { source: err }
  }
}

pub type CheckoutResult<T, E = CheckoutError> = std::result::Result<T, E>;
