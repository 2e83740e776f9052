// storefront/src/web/render.rs

//! HTML rendering of the checkout page with MiniJinja.
//!
//! The template is embedded in the binary. It receives a fully decided
//! `CheckoutPage`: which step is open, which fields carry a `required`
//! marker and which headers are links all come from the checkout core.

use crate::errors::Result;
use crate::web::handlers::checkout_handlers::CheckoutData;
use checkout::{
  display_or_dash, CheckoutStep, CheckoutView, Country, CustomerForm, EligibleShippingMethod, FormFields, Order,
  RequiredFields, SavedAddress, ShippingField, SubmissionReport,
};
use minijinja::Environment;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::BTreeMap;

const CHECKOUT_TEMPLATE: &str = include_str!("../../templates/checkout.html");

static ENGINE: OnceCell<Environment<'static>> = OnceCell::new();

fn init_engine() -> std::result::Result<Environment<'static>, minijinja::Error> {
  let mut env = Environment::new();
  env.add_filter("price", price);
  env.add_filter("or_dash", or_dash);
  env.add_template("checkout.html", CHECKOUT_TEMPLATE)?;
  Ok(env)
}

/// Builds the template engine on first use; a broken template surfaces as `AppError::Render`.
pub fn engine() -> Result<&'static Environment<'static>> {
  Ok(ENGINE.get_or_try_init(init_engine)?)
}

/// Minor units to a two-decimal amount, e.g. `1250` to `12.50`.
fn price(minor_units: i64) -> String {
  let sign = if minor_units < 0 { "-" } else { "" };
  let abs = minor_units.unsigned_abs();
  format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

fn or_dash(value: Option<String>) -> String {
  display_or_dash(value.as_deref()).to_string()
}

/// The book entry already on the order, else the customer's default.
fn preselected_saved_address<'a>(saved: &'a [SavedAddress], order: &Order) -> Option<&'a str> {
  order
    .shipping_address
    .as_ref()
    .and_then(|current| saved.iter().find(|a| a.matches(current)))
    .or_else(|| saved.iter().find(|a| a.default_shipping_address))
    .map(|a| a.id.as_str())
}

#[derive(Debug, Serialize)]
pub struct AddressFieldRow {
  pub name: &'static str,
  pub label: &'static str,
  pub required: bool,
  pub value: String,
}

/// Template context for one render of the checkout page.
#[derive(Debug, Serialize)]
pub struct CheckoutPage<'a> {
  pub view: &'a CheckoutView,
  pub order: &'a Order,
  pub countries: &'a [Country],
  pub shipping_methods: &'a [EligibleShippingMethod],
  pub saved_addresses: &'a [SavedAddress],
  pub selected_saved_address_id: Option<&'a str>,
  pub form_step: Option<CheckoutStep>,
  pub customer_form: CustomerForm,
  pub address_fields: Vec<AddressFieldRow>,
  pub selected_method_id: Option<&'a str>,
  pub field_errors: BTreeMap<&'static str, String>,
  pub error_message: Option<String>,
  pub payment_path: &'a str,
  pub show_payment_button: bool,
}

impl<'a> CheckoutPage<'a> {
  pub fn new(view: &'a CheckoutView, data: &'a CheckoutData, required: &RequiredFields, payment_path: &'a str) -> Self {
    let order = &data.order;
    let customer_form = order
      .customer
      .as_ref()
      .map(|c| CustomerForm {
        email_address: c.email_address.clone(),
        first_name: c.first_name.clone(),
        last_name: c.last_name.clone(),
      })
      .unwrap_or_default();
    let address_fields = ShippingField::ALL
      .into_iter()
      .map(|field| AddressFieldRow {
        name: field.wire_name(),
        label: field.label(),
        required: required.is_required(field),
        value: order
          .shipping_address
          .as_ref()
          .and_then(|a| field.value_in(a))
          .unwrap_or_default()
          .to_string(),
      })
      .collect();

    Self {
      view,
      order,
      countries: &data.countries,
      shipping_methods: &data.shipping_methods,
      saved_addresses: data.saved_addresses(),
      selected_saved_address_id: preselected_saved_address(data.saved_addresses(), order),
      form_step: view.form_step(),
      customer_form,
      address_fields,
      selected_method_id: order.selected_shipping_method().map(|m| m.id.as_str()),
      field_errors: BTreeMap::new(),
      error_message: None,
      payment_path,
      show_payment_button: view.shows_payment_button(),
    }
  }

  /// Puts a failed submission back on the page: the shopper's own input
  /// and the messages explaining what went wrong.
  pub fn with_submission(mut self, fields: &FormFields, report: &SubmissionReport) -> Self {
    let submitted = |name: &str| fields.get(name).cloned().unwrap_or_default();
    match report.step {
      CheckoutStep::Customer => {
        self.customer_form = CustomerForm {
          email_address: submitted("emailAddress"),
          first_name: submitted("firstName"),
          last_name: submitted("lastName"),
        };
      }
      CheckoutStep::Address => {
        for row in &mut self.address_fields {
          if let Some(value) = fields.get(row.name) {
            row.value = value.clone();
          }
        }
      }
      CheckoutStep::Shipping => {}
    }
    self.field_errors = report.field_errors.to_map();
    self.error_message = report.error_message.clone();
    self
  }

  pub fn render(&self) -> Result<String> {
    let template = engine()?.get_template("checkout.html")?;
    Ok(template.render(self)?)
  }
}
