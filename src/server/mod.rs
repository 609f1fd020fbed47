//! Server module: the HTTP surface of the foods resource
//!
//! - `ServerBuilder` wires configuration and a collection into a router
//! - `exposure::rest` holds the routes and handlers

pub mod builder;
pub mod exposure;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
