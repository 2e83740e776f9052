// storefront/src/services/mod.rs
pub mod shop_api;

pub use shop_api::ShopApiGateway;
