// storefront/src/web/handlers/checkout_handlers.rs

use actix_web::http::header::LOCATION;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use checkout::{
  ActiveCustomer, ActiveOrderAction, CheckoutError, CheckoutState, CheckoutStep, CheckoutView, Country,
  EligibleShippingMethod, FormFields, GatewaySession, Order, SavedAddress, SubmissionCtxData, SubmissionReport,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::render::CheckoutPage;
use crate::web::session::{wants_json, ShopperSession};

/// Where shoppers without an active order are sent.
pub const HOME_PATH: &str = "/";

#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
  pub step: Option<String>,
}

/// Everything the checkout page reads from the Shop API.
#[derive(Debug)]
pub struct CheckoutData {
  pub order: Order,
  pub countries: Vec<Country>,
  pub shipping_methods: Vec<EligibleShippingMethod>,
  pub customer: Option<ActiveCustomer>,
}

impl CheckoutData {
  pub fn is_signed_in(&self) -> bool {
    self.customer.is_some()
  }

  pub fn saved_addresses(&self) -> &[SavedAddress] {
    self.customer.as_ref().map(|c| c.addresses.as_slice()).unwrap_or(&[])
  }

  pub fn view(&self, step: Option<&str>, state: &AppState) -> CheckoutView {
    CheckoutView::derive(&self.order, step, self.is_signed_in(), &state.config.checkout_policy)
  }
}

/// Issues the four page reads concurrently. `None` when there is no active order.
async fn load_checkout(state: &AppState, session: &GatewaySession) -> Result<Option<CheckoutData>, AppError> {
  let gateway = &state.gateway;
  let (order, countries, shipping_methods, customer) = tokio::try_join!(
    gateway.active_order(session),
    gateway.available_countries(session),
    gateway.eligible_shipping_methods(session),
    gateway.active_customer(session),
  )?;

  Ok(order.map(|order| CheckoutData {
    order,
    countries,
    shipping_methods,
    customer,
  }))
}

fn see_other(location: &str) -> HttpResponse {
  HttpResponse::SeeOther().insert_header((LOCATION, location)).finish()
}

fn html(status: StatusCode, body: String) -> HttpResponse {
  HttpResponse::build(status)
    .content_type("text/html; charset=utf-8")
    .body(body)
}

#[instrument(name = "handler::checkout_page", skip(app_state, session), fields(step = ?query.step))]
pub async fn checkout_page_handler(
  app_state: web::Data<AppState>,
  session: ShopperSession,
  query: web::Query<CheckoutQuery>,
) -> Result<HttpResponse, AppError> {
  let Some(data) = load_checkout(&app_state, &session.0).await? else {
    info!("No active order; redirecting to the storefront.");
    return Ok(see_other(HOME_PATH));
  };

  let view = data.view(query.step.as_deref(), &app_state);
  let config = &app_state.config;
  let page = CheckoutPage::new(&view, &data, &config.checkout_policy.required_fields, &config.payment_path);
  Ok(html(StatusCode::OK, page.render()?))
}

#[instrument(name = "handler::checkout_json", skip(app_state, session), fields(step = ?query.step))]
pub async fn checkout_json_handler(
  app_state: web::Data<AppState>,
  session: ShopperSession,
  query: web::Query<CheckoutQuery>,
) -> Result<HttpResponse, AppError> {
  let Some(data) = load_checkout(&app_state, &session.0).await? else {
    return Ok(HttpResponse::Ok().json(json!({ "activeOrder": null, "redirectTo": HOME_PATH })));
  };

  let view = data.view(query.step.as_deref(), &app_state);
  let required_fields = app_state
    .config
    .checkout_policy
    .required_fields
    .iter()
    .map(|f| f.wire_name())
    .collect::<Vec<_>>();

  Ok(HttpResponse::Ok().json(json!({
    "activeOrder": data.order,
    "view": view,
    "availableCountries": data.countries,
    "eligibleShippingMethods": data.shipping_methods,
    "savedAddresses": data.saved_addresses(),
    "requiredFields": required_fields,
  })))
}

/// Receives every checkout form. Runs the submission pipeline, then answers
/// JSON clients with the outcome and browsers with a redirect or a re-render.
#[instrument(name = "handler::active_order", skip_all, fields(action = ?form.get("action")))]
pub async fn active_order_handler(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  session: ShopperSession,
  form: web::Form<FormFields>,
) -> Result<HttpResponse, AppError> {
  let fields = form.into_inner();
  let action = ActiveOrderAction::from_fields(&fields)?;
  let session = session.into_inner();

  let ctx = SubmissionCtxData::new(
    app_state.gateway.clone(),
    session.clone(),
    app_state.config.checkout_policy.clone(),
    action,
  );
  let report = app_state.submissions.run(ctx).await?;

  if wants_json(&req) {
    return Ok(submission_json(&report));
  }

  if report.succeeded() {
    let target = CheckoutState::new(report.landing_step());
    info!(location = %target.location(), "Submission accepted; redirecting.");
    return Ok(see_other(&target.location()));
  }

  let Some(data) = load_checkout(&app_state, &session).await? else {
    return Ok(see_other(HOME_PATH));
  };
  let view = data.view(Some(report.step.as_str()), &app_state);
  let config = &app_state.config;
  let page = CheckoutPage::new(&view, &data, &config.checkout_policy.required_fields, &config.payment_path)
    .with_submission(&fields, &report);
  let status = if report.field_errors.is_empty() {
    StatusCode::OK
  } else {
    StatusCode::UNPROCESSABLE_ENTITY
  };
  Ok(html(status, page.render()?))
}

fn submission_json(report: &SubmissionReport) -> HttpResponse {
  let status = if report.field_errors.is_empty() {
    StatusCode::OK
  } else {
    StatusCode::UNPROCESSABLE_ENTITY
  };
  HttpResponse::build(status).json(json!({
    "activeOrder": report.order,
    "errorCode": report.error_code,
    "errorMessage": report.error_message,
    "fieldErrors": report.field_errors.to_map(),
    "nextStep": report.navigate_to(),
  }))
}

/// Re-checks the payment gate against a fresh order before handing off.
#[instrument(name = "handler::proceed_to_payment", skip_all)]
pub async fn proceed_to_payment_handler(
  app_state: web::Data<AppState>,
  session: ShopperSession,
) -> Result<HttpResponse, AppError> {
  let Some(order) = app_state.gateway.active_order(&session.0).await? else {
    return Ok(see_other(HOME_PATH));
  };

  let view = CheckoutView::derive(
    &order,
    Some(CheckoutStep::Shipping.as_str()),
    false,
    &app_state.config.checkout_policy,
  );
  match view.ensure_payment_ready() {
    Ok(()) => {
      info!(order_code = %order.code, "Checkout complete; handing off to payment.");
      Ok(see_other(&app_state.config.payment_path))
    }
    Err(CheckoutError::PaymentNotReady { reason }) => {
      warn!(order_code = %order.code, %reason, "Payment requested before checkout was complete.");
      Ok(see_other(&CheckoutState::new(CheckoutStep::Shipping).location()))
    }
    Err(e) => Err(e.into()),
  }
}
