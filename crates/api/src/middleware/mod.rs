//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (`http_request` span with status and latency)
//! 3. Request ID (recorded on the span, echoed in the response)
//! 4. CORS and `X-Content-Type-Options`
//!
//! Caller identity is resolved per handler by the [`RequireCaller`]
//! extractor, so public reads never look at it.

pub mod identity;
pub mod request_id;

pub use identity::{IdentityResolver, RequireCaller, TrustedHeader};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
