// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use checkout::{
  ActiveCustomer, CheckoutError, ContextData, PipelineControl, CheckoutResult, Country, Customer, CustomerForm, EligibleShippingMethod,
  GatewaySession, MutationOutcome, Order, OrderAddress, OrderGateway, SavedAddress, SavedCountry, ShippingAddressInput,
  ShippingField, ShippingLine, ShippingMethodRef,
};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Level;

// --- Order fixtures ---

pub fn customer() -> Customer {
  Customer {
    id: Some("cust-1".to_string()),
    email_address: "ada@example.com".to_string(),
    first_name: "Ada".to_string(),
    last_name: "Lovelace".to_string(),
  }
}

/// Every field filled, so it satisfies both the strict and the minimal policy.
pub fn full_address() -> OrderAddress {
  OrderAddress {
    full_name: Some("Ada Lovelace".to_string()),
    company: None,
    street_line1: Some("12 St James's Square".to_string()),
    street_line2: None,
    city: Some("London".to_string()),
    province: Some("Greater London".to_string()),
    postal_code: Some("SW1Y 4JH".to_string()),
    country_code: Some("GB".to_string()),
    phone_number: Some("020 7946 0018".to_string()),
  }
}

pub fn standard_shipping() -> ShippingMethodRef {
  ShippingMethodRef {
    id: "1".to_string(),
    name: "Standard Shipping".to_string(),
  }
}

pub fn empty_order() -> Order {
  Order {
    id: "ord-1".to_string(),
    code: "ABC123".to_string(),
    currency_code: "GBP".to_string(),
    ..Default::default()
  }
}

/// Customer attached, full address, one shipping line with a method.
pub fn complete_order() -> Order {
  Order {
    customer: Some(customer()),
    shipping_address: Some(full_address()),
    shipping_lines: vec![ShippingLine {
      shipping_method: Some(standard_shipping()),
      price_with_tax: 500,
    }],
    total_with_tax: 4500,
    ..empty_order()
  }
}

/// Customer and address done, no delivery method chosen yet.
pub fn complete_order_without_shipping() -> Order {
  Order {
    shipping_lines: Vec::new(),
    ..complete_order()
  }
}

pub fn saved_address(id: &str) -> SavedAddress {
  SavedAddress {
    id: id.to_string(),
    full_name: Some("Ada Lovelace".to_string()),
    company: Some("Analytical Engines Ltd".to_string()),
    street_line1: "12 St James's Square".to_string(),
    street_line2: None,
    city: Some("London".to_string()),
    province: Some("Greater London".to_string()),
    postal_code: Some("SW1Y 4JH".to_string()),
    country: SavedCountry {
      code: "GB".to_string(),
      name: "United Kingdom".to_string(),
    },
    phone_number: Some("020 7946 0018".to_string()),
    default_shipping_address: true,
  }
}

// --- In-memory gateway ---

/// Applies mutations to an in-memory order and counts every mutation call.
pub struct InMemoryGateway {
  pub order: Mutex<Option<Order>>,
  pub customer: Option<ActiveCustomer>,
  /// When set, every mutation is answered with this error payload.
  pub reject_with: Option<String>,
  /// When set, every mutation fails at the transport level.
  pub transport_down: bool,
  pub mutation_calls: AtomicUsize,
  pub last_address: Mutex<Option<ShippingAddressInput>>,
}

impl InMemoryGateway {
  pub fn with_order(order: Order) -> Self {
    Self {
      order: Mutex::new(Some(order)),
      customer: None,
      reject_with: None,
      transport_down: false,
      mutation_calls: AtomicUsize::new(0),
      last_address: Mutex::new(None),
    }
  }

  pub fn rejecting(order: Order, message: &str) -> Self {
    Self {
      reject_with: Some(message.to_string()),
      ..Self::with_order(order)
    }
  }

  pub fn signed_in(order: Order, customer: ActiveCustomer) -> Self {
    Self {
      customer: Some(customer),
      ..Self::with_order(order)
    }
  }

  pub fn mutation_count(&self) -> usize {
    self.mutation_calls.load(Ordering::SeqCst)
  }

  fn mutate(&self, apply: impl FnOnce(&mut Order)) -> CheckoutResult<MutationOutcome> {
    self.mutation_calls.fetch_add(1, Ordering::SeqCst);
    if self.transport_down {
      return Err(CheckoutError::gateway("mutation", anyhow::anyhow!("connection refused")));
    }
    if let Some(message) = &self.reject_with {
      return Ok(MutationOutcome::Rejected {
        error_code: Some("TEST_ERROR".to_string()),
        message: message.clone(),
      });
    }
    let mut guard = self.order.lock();
    let Some(order) = guard.as_mut() else {
      return Ok(MutationOutcome::rejected("No active order"));
    };
    apply(order);
    Ok(MutationOutcome::Updated(order.clone()))
  }
}

#[async_trait]
impl OrderGateway for InMemoryGateway {
  async fn active_order(&self, _session: &GatewaySession) -> CheckoutResult<Option<Order>> {
    Ok(self.order.lock().clone())
  }

  async fn available_countries(&self, _session: &GatewaySession) -> CheckoutResult<Vec<Country>> {
    Ok(vec![Country {
      id: "1".to_string(),
      code: "GB".to_string(),
      name: "United Kingdom".to_string(),
    }])
  }

  async fn eligible_shipping_methods(&self, _session: &GatewaySession) -> CheckoutResult<Vec<EligibleShippingMethod>> {
    Ok(vec![EligibleShippingMethod {
      id: "1".to_string(),
      name: "Standard Shipping".to_string(),
      description: String::new(),
      price_with_tax: 500,
    }])
  }

  async fn active_customer(&self, _session: &GatewaySession) -> CheckoutResult<Option<ActiveCustomer>> {
    Ok(self.customer.clone())
  }

  async fn set_order_customer(&self, _session: &GatewaySession, form: &CustomerForm) -> CheckoutResult<MutationOutcome> {
    let form = form.clone();
    self.mutate(move |order| {
      order.customer = Some(Customer {
        id: None,
        email_address: form.email_address,
        first_name: form.first_name,
        last_name: form.last_name,
      })
    })
  }

  async fn set_checkout_shipping(
    &self,
    _session: &GatewaySession,
    address: &ShippingAddressInput,
  ) -> CheckoutResult<MutationOutcome> {
    *self.last_address.lock() = Some(address.clone());
    let get = |field: ShippingField| address.get(field).map(str::to_string);
    self.mutate(|order| {
      order.shipping_address = Some(OrderAddress {
        full_name: get(ShippingField::FullName),
        company: get(ShippingField::Company),
        street_line1: get(ShippingField::StreetLine1),
        street_line2: get(ShippingField::StreetLine2),
        city: get(ShippingField::City),
        province: get(ShippingField::Province),
        postal_code: get(ShippingField::PostalCode),
        country_code: get(ShippingField::CountryCode),
        phone_number: get(ShippingField::PhoneNumber),
      })
    })
  }

  async fn set_shipping_method(&self, _session: &GatewaySession, shipping_method_id: &str) -> CheckoutResult<MutationOutcome> {
    let id = shipping_method_id.to_string();
    self.mutate(move |order| {
      order.shipping_lines = vec![ShippingLine {
        shipping_method: Some(ShippingMethodRef {
          id,
          name: "Standard Shipping".to_string(),
        }),
        price_with_tax: 500,
      }]
    })
  }
}

// --- Generic pipeline fixtures ---

/// Records which handlers ran, in order.
#[derive(Debug, Clone, Default)]
pub struct StepTrace {
  pub visited: Vec<String>,
  pub order_code: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TestError {
  #[error("Checkout framework error: {0}")]
  Checkout(String),
  #[error("Handler failed: {0}")]
  Handler(String),
}

impl From<CheckoutError> for TestError {
  fn from(err: CheckoutError) -> Self {
    TestError::Checkout(format!("{:?}", err))
  }
}

pub type TraceFuture = Pin<Box<dyn Future<Output = Result<PipelineControl, TestError>> + Send>>;

pub fn recording_handler(
  label: &'static str,
) -> impl Fn(ContextData<StepTrace>) -> TraceFuture + Send + Sync + 'static {
  move |ctx: ContextData<StepTrace>| -> TraceFuture {
    Box::pin(async move {
      ctx.write().visited.push(label.to_string());
      Ok(PipelineControl::Continue)
    })
  }
}

pub fn failing_handler(
  label: &'static str,
  message: &'static str,
) -> impl Fn(ContextData<StepTrace>) -> TraceFuture + Send + Sync + 'static {
  move |ctx: ContextData<StepTrace>| -> TraceFuture {
    Box::pin(async move {
      ctx.write().visited.push(label.to_string());
      Err(TestError::Handler(message.to_string()))
    })
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
