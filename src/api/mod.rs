//! HTTP surface. Enable the `axum_api` feature.

mod types;

pub use types::*;

pub mod axum;
