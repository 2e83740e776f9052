// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use checkout::{
  ActiveCustomer, CheckoutResult, Country, Customer, CustomerForm, EligibleShippingMethod, GatewaySession,
  MutationOutcome, Order, OrderAddress, OrderGateway, ShippingAddressInput, ShippingField, ShippingLine,
  ShippingMethodRef,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use storefront::config::AppConfig;
use storefront::state::AppState;

pub fn empty_order() -> Order {
  Order {
    id: "ord-1".to_string(),
    code: "ABC123".to_string(),
    currency_code: "GBP".to_string(),
    total_with_tax: 4000,
    ..Default::default()
  }
}

pub fn complete_order() -> Order {
  Order {
    customer: Some(Customer {
      id: Some("cust-1".to_string()),
      email_address: "ada@example.com".to_string(),
      first_name: "Ada".to_string(),
      last_name: "Lovelace".to_string(),
    }),
    shipping_address: Some(OrderAddress {
      full_name: Some("Ada Lovelace".to_string()),
      street_line1: Some("12 St James's Square".to_string()),
      city: Some("London".to_string()),
      province: Some("Greater London".to_string()),
      postal_code: Some("SW1Y 4JH".to_string()),
      country_code: Some("GB".to_string()),
      phone_number: Some("020 7946 0018".to_string()),
      ..Default::default()
    }),
    shipping_lines: vec![ShippingLine {
      shipping_method: Some(ShippingMethodRef {
        id: "1".to_string(),
        name: "Standard Shipping".to_string(),
      }),
      price_with_tax: 500,
    }],
    ..empty_order()
  }
}

/// A Shop API stand-in holding one order. Remembers the last session it saw.
#[derive(Default)]
pub struct FakeShopApi {
  pub order: Mutex<Option<Order>>,
  pub customer: Option<ActiveCustomer>,
  pub reject_with: Option<String>,
  pub mutations: AtomicUsize,
  pub last_session: Mutex<Option<GatewaySession>>,
}

impl FakeShopApi {
  pub fn with_order(order: Order) -> Self {
    Self {
      order: Mutex::new(Some(order)),
      ..Default::default()
    }
  }

  pub fn mutation_count(&self) -> usize {
    self.mutations.load(Ordering::SeqCst)
  }

  fn mutate(&self, session: &GatewaySession, apply: impl FnOnce(&mut Order)) -> CheckoutResult<MutationOutcome> {
    self.mutations.fetch_add(1, Ordering::SeqCst);
    *self.last_session.lock() = Some(session.clone());
    if let Some(message) = &self.reject_with {
      return Ok(MutationOutcome::rejected(message.clone()));
    }
    let mut guard = self.order.lock();
    match guard.as_mut() {
      Some(order) => {
        apply(order);
        Ok(MutationOutcome::Updated(order.clone()))
      }
      None => Ok(MutationOutcome::rejected("No active order")),
    }
  }
}

#[async_trait]
impl OrderGateway for FakeShopApi {
  async fn active_order(&self, session: &GatewaySession) -> CheckoutResult<Option<Order>> {
    *self.last_session.lock() = Some(session.clone());
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

  async fn set_order_customer(&self, session: &GatewaySession, form: &CustomerForm) -> CheckoutResult<MutationOutcome> {
    let form = form.clone();
    self.mutate(session, move |order| {
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
    session: &GatewaySession,
    address: &ShippingAddressInput,
  ) -> CheckoutResult<MutationOutcome> {
    let get = |field: ShippingField| address.get(field).map(str::to_string);
    self.mutate(session, |order| {
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

  async fn set_shipping_method(&self, session: &GatewaySession, shipping_method_id: &str) -> CheckoutResult<MutationOutcome> {
    let id = shipping_method_id.to_string();
    self.mutate(session, move |order| {
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

pub fn app_state(api: Arc<FakeShopApi>) -> AppState {
  AppState::new(api, Arc::new(AppConfig::new("http://shop.test/shop-api")))
}
