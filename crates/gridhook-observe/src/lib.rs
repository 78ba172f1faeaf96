//! Observability setup for gridhook.

pub mod tracing_setup;
