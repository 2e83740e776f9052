// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use checkout::CheckoutError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Checkout Error: {source}")]
  Checkout {
    #[from]
    source: CheckoutError,
  },

  #[error("Template Error: {0}")]
  Render(#[from] minijinja::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Internal(err.to_string())
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Checkout { source } => match source {
        CheckoutError::UnknownAction { .. } | CheckoutError::MissingField { .. } => StatusCode::BAD_REQUEST,
        CheckoutError::Gateway { .. } => StatusCode::BAD_GATEWAY,
        CheckoutError::PaymentNotReady { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::Config(_) | AppError::Render(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Rejecting request");
    }

    let body = match self {
      AppError::Checkout {
        source: CheckoutError::Gateway { operation, .. },
      } => json!({"error": "Shop API unavailable", "detail": operation}),
      AppError::Checkout { source } if status.is_client_error() => json!({"error": source.to_string()}),
      AppError::Config(m) => json!({"error": "Configuration issue", "detail": m}),
      AppError::Render(_) => json!({"error": "Failed to render page"}),
      _ => json!({"error": "An internal error occurred"}),
    };
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
