//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (any origin, JSON API methods)
//! 5. Session layer (tower-sessions with in-memory store)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{AdminGate, OptionalIdentity, clear_current_identity, set_current_identity};
pub use request_id::{RequestId, request_id_middleware};
pub use session::create_session_layer;
