// storefront/src/web/routes.rs

use crate::web::handlers::checkout_handlers;
use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/checkout")
        .route("", web::get().to(checkout_handlers::checkout_page_handler))
        .route("/proceed", web::post().to(checkout_handlers::proceed_to_payment_handler)),
    )
    .service(
      web::scope("/api")
        .route("/checkout", web::get().to(checkout_handlers::checkout_json_handler))
        .route("/active-order", web::post().to(checkout_handlers::active_order_handler)),
    );
}
