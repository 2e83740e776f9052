// storefront/src/lib.rs

//! Server-rendered checkout for a GraphQL commerce backend.
//!
//! Step sequencing, completion and validation live in the `checkout` crate;
//! this crate wires them to HTTP routes, the Shop API and an HTML template.

pub mod config;
pub mod errors;
pub mod services;
pub mod state;
pub mod web;
