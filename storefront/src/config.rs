// storefront/src/config.rs

use crate::errors::{AppError, Result};
use checkout::{CheckoutPolicy, RequiredFields, StepGating};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PAYMENT_PATH: &str = "/checkout/payment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
  #[default]
  Pretty,
  Json,
}

impl LogFormat {
  /// Reads `LOG_FORMAT`; anything other than `json` means pretty output.
  pub fn from_env() -> Self {
    match env::var("LOG_FORMAT").ok().as_deref().map(str::trim) {
      Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
      _ => LogFormat::Pretty,
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,

  /// GraphQL endpoint of the commerce backend's Shop API.
  pub shop_api_url: String,
  pub shop_api_timeout: Duration,

  pub checkout_policy: CheckoutPolicy,

  /// Where the shopper is sent once every step is complete.
  pub payment_path: String,

  pub log_format: LogFormat,
}

impl AppConfig {
  /// Defaults for everything except the Shop API endpoint.
  pub fn new(shop_api_url: impl Into<String>) -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      shop_api_url: shop_api_url.into(),
      shop_api_timeout: Duration::from_secs(10),
      checkout_policy: CheckoutPolicy::default(),
      payment_path: DEFAULT_PAYMENT_PATH.to_string(),
      log_format: LogFormat::Pretty,
    }
  }

  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let shop_api_url = get_env("SHOP_API_URL")?;
    let mut config = Self::new(shop_api_url);

    if let Ok(host) = get_env("SERVER_HOST") {
      config.server_host = host;
    }
    if let Ok(port) = get_env("SERVER_PORT") {
      config.server_port = port
        .parse::<u16>()
        .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    }
    if let Ok(secs) = get_env("SHOP_API_TIMEOUT_SECS") {
      let secs = secs
        .parse::<u64>()
        .map_err(|e| AppError::Config(format!("Invalid SHOP_API_TIMEOUT_SECS: {}", e)))?;
      config.shop_api_timeout = Duration::from_secs(secs);
    }
    if let Ok(fields) = get_env("REQUIRED_SHIPPING_FIELDS") {
      config.checkout_policy.required_fields = parse_setting::<RequiredFields>("REQUIRED_SHIPPING_FIELDS", &fields)?;
    }
    if let Ok(gating) = get_env("CHECKOUT_STEP_GATING") {
      config.checkout_policy.gating = parse_setting::<StepGating>("CHECKOUT_STEP_GATING", &gating)?;
    }
    if let Ok(path) = get_env("PAYMENT_PATH") {
      if !path.starts_with('/') {
        return Err(AppError::Config(format!("PAYMENT_PATH must be an absolute path, got '{}'", path)));
      }
      config.payment_path = path;
    }
    config.log_format = LogFormat::from_env();

    tracing::info!(
      shop_api_url = %config.shop_api_url,
      required_fields = config.checkout_policy.required_fields.len(),
      gating = ?config.checkout_policy.gating,
      "Application configuration loaded successfully."
    );

    Ok(config)
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_setting<T>(var_name: &str, raw: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {}: {}", var_name, e)))
}
