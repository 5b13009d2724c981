//! HTTP layer: routes, handlers, middleware and the response envelope.

pub mod constants;
pub mod middleware;
pub mod response;
pub mod services;

pub use response::ResponseEnvelope;
pub use services::configure_routes;
