//! Request handlers.

pub mod notifications;
