//! Middleware components for the HTTP surface

pub mod logging;
