// storefront/src/services/shop_api.rs

//! `OrderGateway` over the commerce backend's GraphQL Shop API.
//!
//! Every call POSTs `{ query, variables }` to one endpoint and forwards the
//! shopper's `Cookie` and `Authorization` headers so the backend resolves
//! the same active order the browser sees.

use async_trait::async_trait;
use checkout::{
  ActiveCustomer, CheckoutError, CheckoutResult, Country, CustomerForm, EligibleShippingMethod, GatewaySession,
  MutationOutcome, Order, OrderGateway, ShippingAddressInput,
};
use reqwest::header::{AUTHORIZATION, COOKIE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const ORDER_FRAGMENT: &str = r#"
fragment OrderDetail on Order {
  __typename
  id
  code
  currencyCode
  totalWithTax
  customer { id emailAddress firstName lastName }
  shippingAddress {
    fullName company streetLine1 streetLine2 city province postalCode countryCode phoneNumber
  }
  shippingLines { priceWithTax shippingMethod { id name } }
}
"#;

const ERROR_FIELDS: &str = "... on ErrorResult { __typename errorCode message }";

const AVAILABLE_COUNTRIES: &str = "query AvailableCountries { availableCountries { id code name } }";

const ELIGIBLE_SHIPPING_METHODS: &str =
  "query EligibleShippingMethods { eligibleShippingMethods { id name description priceWithTax } }";

const ACTIVE_CUSTOMER: &str = r#"
query ActiveCustomerAddresses {
  activeCustomer {
    id
    addresses {
      id fullName company streetLine1 streetLine2 city province postalCode
      country { code name }
      phoneNumber defaultShippingAddress
    }
  }
}
"#;

#[derive(Serialize)]
struct GraphqlRequest<'a> {
  query: &'a str,
  variables: Value,
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
  data: Option<T>,
  #[serde(default)]
  errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
  message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveOrderData {
  active_order: Option<Order>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvailableCountriesData {
  available_countries: Vec<Country>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EligibleShippingMethodsData {
  eligible_shipping_methods: Vec<EligibleShippingMethod>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveCustomerData {
  active_customer: Option<ActiveCustomer>,
}

pub struct ShopApiGateway {
  client: reqwest::Client,
  endpoint: String,
}

impl ShopApiGateway {
  pub fn new(endpoint: impl Into<String>, timeout: Duration) -> CheckoutResult<Self> {
    let client = reqwest::Client::builder()
      .connect_timeout(timeout)
      .timeout(timeout)
      .build()
      .map_err(|e| CheckoutError::Configuration(format!("Failed to build Shop API client: {}", e)))?;
    Ok(Self {
      client,
      endpoint: endpoint.into(),
    })
  }

  async fn execute<T: DeserializeOwned>(
    &self,
    operation: &'static str,
    session: &GatewaySession,
    query: &str,
    variables: Value,
  ) -> CheckoutResult<T> {
    let mut request = self.client.post(&self.endpoint).json(&GraphqlRequest { query, variables });
    if let Some(cookie) = &session.cookie {
      request = request.header(COOKIE, cookie);
    }
    if let Some(token) = &session.authorization {
      request = request.header(AUTHORIZATION, token);
    }

    let response = request
      .send()
      .await
      .and_then(reqwest::Response::error_for_status)
      .map_err(|e| CheckoutError::gateway(operation, e))?;
    let body: GraphqlResponse<T> = response
      .json()
      .await
      .map_err(|e| CheckoutError::gateway(operation, e))?;

    if !body.errors.is_empty() {
      let messages = body.errors.into_iter().map(|e| e.message).collect::<Vec<_>>().join("; ");
      warn!(operation, %messages, "Shop API returned GraphQL errors.");
      return Err(CheckoutError::gateway(operation, anyhow::anyhow!(messages)));
    }
    debug!(operation, "Shop API call succeeded.");
    body
      .data
      .ok_or_else(|| CheckoutError::gateway(operation, anyhow::anyhow!("response carried no data")))
  }

  /// Runs a mutation whose result is `Order | ErrorResult`.
  async fn mutate(
    &self,
    operation: &'static str,
    session: &GatewaySession,
    query: &str,
    variables: Value,
  ) -> CheckoutResult<MutationOutcome> {
    let mut data: Value = self.execute(operation, session, query, variables).await?;
    let payload = data
      .get_mut(operation)
      .map(Value::take)
      .ok_or_else(|| CheckoutError::gateway(operation, anyhow::anyhow!("missing '{}' in response", operation)))?;
    mutation_outcome(operation, payload)
  }
}

fn order_mutation(name: &str, signature: &str, call: &str) -> String {
  format!(
    "mutation {name}({signature}) {{ {call} {{ ...OrderDetail {errors} }} }} {fragment}",
    name = name,
    signature = signature,
    call = call,
    errors = ERROR_FIELDS,
    fragment = ORDER_FRAGMENT,
  )
}

/// Splits a union payload on `__typename`: an `Order` is an update, anything
/// else is an error result carrying `errorCode` and `message`.
pub(crate) fn mutation_outcome(operation: &'static str, payload: Value) -> CheckoutResult<MutationOutcome> {
  match payload.get("__typename").and_then(Value::as_str) {
    Some("Order") => serde_json::from_value::<Order>(payload)
      .map(MutationOutcome::Updated)
      .map_err(|e| CheckoutError::gateway(operation, e)),
    Some(_) => Ok(MutationOutcome::Rejected {
      error_code: payload.get("errorCode").and_then(Value::as_str).map(str::to_string),
      message: payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("The order could not be updated")
        .to_string(),
    }),
    None => Err(CheckoutError::gateway(
      operation,
      anyhow::anyhow!("mutation result has no __typename"),
    )),
  }
}

#[async_trait]
impl OrderGateway for ShopApiGateway {
  #[instrument(name = "ShopApi::active_order", skip_all, err(Display))]
  async fn active_order(&self, session: &GatewaySession) -> CheckoutResult<Option<Order>> {
    let query = format!("query ActiveOrder {{ activeOrder {{ ...OrderDetail }} }} {}", ORDER_FRAGMENT);
    let data: ActiveOrderData = self.execute("activeOrder", session, &query, json!({})).await?;
    Ok(data.active_order)
  }

  #[instrument(name = "ShopApi::available_countries", skip_all, err(Display))]
  async fn available_countries(&self, session: &GatewaySession) -> CheckoutResult<Vec<Country>> {
    let data: AvailableCountriesData = self
      .execute("availableCountries", session, AVAILABLE_COUNTRIES, json!({}))
      .await?;
    Ok(data.available_countries)
  }

  #[instrument(name = "ShopApi::eligible_shipping_methods", skip_all, err(Display))]
  async fn eligible_shipping_methods(&self, session: &GatewaySession) -> CheckoutResult<Vec<EligibleShippingMethod>> {
    let data: EligibleShippingMethodsData = self
      .execute("eligibleShippingMethods", session, ELIGIBLE_SHIPPING_METHODS, json!({}))
      .await?;
    Ok(data.eligible_shipping_methods)
  }

  #[instrument(name = "ShopApi::active_customer", skip_all, err(Display))]
  async fn active_customer(&self, session: &GatewaySession) -> CheckoutResult<Option<ActiveCustomer>> {
    let data: ActiveCustomerData = self
      .execute("activeCustomer", session, ACTIVE_CUSTOMER, json!({}))
      .await?;
    Ok(data.active_customer)
  }

  #[instrument(name = "ShopApi::set_order_customer", skip_all, err(Display))]
  async fn set_order_customer(&self, session: &GatewaySession, customer: &CustomerForm) -> CheckoutResult<MutationOutcome> {
    let query = order_mutation(
      "SetCustomerForOrder",
      "$input: CreateCustomerInput!",
      "setCustomerForOrder(input: $input)",
    );
    self
      .mutate("setCustomerForOrder", session, &query, json!({ "input": customer }))
      .await
  }

  #[instrument(name = "ShopApi::set_checkout_shipping", skip_all, err(Display))]
  async fn set_checkout_shipping(
    &self,
    session: &GatewaySession,
    address: &ShippingAddressInput,
  ) -> CheckoutResult<MutationOutcome> {
    let query = order_mutation(
      "SetOrderShippingAddress",
      "$input: CreateAddressInput!",
      "setOrderShippingAddress(input: $input)",
    );
    self
      .mutate("setOrderShippingAddress", session, &query, json!({ "input": address }))
      .await
  }

  #[instrument(name = "ShopApi::set_shipping_method", skip_all, fields(%shipping_method_id), err(Display))]
  async fn set_shipping_method(&self, session: &GatewaySession, shipping_method_id: &str) -> CheckoutResult<MutationOutcome> {
    let query = order_mutation(
      "SetShippingMethod",
      "$id: [ID!]!",
      "setOrderShippingMethod(shippingMethodId: $id)",
    );
    self
      .mutate("setOrderShippingMethod", session, &query, json!({ "id": [shipping_method_id] }))
      .await
  }
}
