//! Backend library modules for the tabemap restaurant finder.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-trace middleware re-exported for server assembly.
pub use middleware::trace::Trace;
