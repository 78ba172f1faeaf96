//! HTTP layer: router and webhook handlers.

pub mod handlers;
pub mod router;
