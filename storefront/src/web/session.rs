// storefront/src/web/session.rs

use actix_web::http::header::{HeaderMap, ACCEPT, AUTHORIZATION, COOKIE};
use actix_web::{FromRequest, HttpRequest};
use checkout::GatewaySession;
use std::convert::Infallible;

/// The shopper's credentials as they arrived on the request, ready to be
/// forwarded to the Shop API. Guests simply carry no headers.
#[derive(Debug, Clone)]
pub struct ShopperSession(pub GatewaySession);

impl ShopperSession {
  pub fn into_inner(self) -> GatewaySession {
    self.0
  }
}

impl FromRequest for ShopperSession {
  type Error = Infallible;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let headers = req.headers();
    let session = GatewaySession {
      cookie: header_string(headers, COOKIE),
      authorization: header_string(headers, AUTHORIZATION),
    };
    futures_util::future::ready(Ok(ShopperSession(session)))
  }
}

fn header_string(headers: &HeaderMap, name: actix_web::http::header::HeaderName) -> Option<String> {
  headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .filter(|v| !v.is_empty())
    .map(str::to_string)
}

/// Fetch-style clients ask for JSON; plain form posts get redirects and HTML.
pub fn wants_json(req: &HttpRequest) -> bool {
  req
    .headers()
    .get(ACCEPT)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|accept| accept.contains("application/json"))
}
