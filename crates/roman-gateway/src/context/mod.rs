//! Request-scoped context.
//!
//! The request ID is resolved once by middleware and handed to handlers as an
//! explicit `RequestContext` extension. Domain code never sees it.

pub mod request_id;

pub use request_id::{propagate_request_id, RequestContext, RequestId, REQUEST_ID_HEADER};
