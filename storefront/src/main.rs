// storefront/src/main.rs

use storefront::config::{AppConfig, LogFormat};
use storefront::services::ShopApiGateway;
use storefront::state::AppState;
use storefront::web::{configure_app_routes, render};

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let builder = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();
  init_tracing(LogFormat::from_env());

  tracing::info!("Starting storefront checkout server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let gateway = match ShopApiGateway::new(app_config.shop_api_url.clone(), app_config.shop_api_timeout) {
    Ok(gateway) => Arc::new(gateway),
    Err(e) => {
      tracing::error!(error = %e, "Failed to create the Shop API client.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };

  if let Err(e) = render::engine() {
    tracing::error!(error = %e, "Failed to load the checkout template.");
    return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
  }

  let app_state = AppState::new(gateway, app_config.clone());
  tracing::info!(steps = ?app_state.submissions.step_names(), "Submission pipeline ready.");

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
