//! Client for the upstream inference API.
//!
//! The relay never owns prediction state: every call is forwarded to the
//! upstream service with the configured credential attached, and the
//! upstream status code and JSON body come back untouched.
//!
//! # Architecture
//!
//! - [`UpstreamClient`] - issues `POST /predictions` and `GET /predictions/{id}`
//! - [`UpstreamResponse`] - the upstream status and parsed body, verbatim
//! - [`PredictionSummary`] - a read-only view of a prediction body, used for logging
//! - [`UpstreamError`] - missing credential or transport failure
//!
//! # Example
//!
//! ```rust,no_run
//! use aleto_upstream::UpstreamClient;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), aleto_upstream::UpstreamError> {
//!     let client = UpstreamClient::new("https://api.replicate.com/v1", Some("r8_...".into()))?;
//!     let created = client
//!         .create_prediction(&json!({ "version": "abc", "input": { "prompt": "hi" } }))
//!         .await?;
//!     println!("{} {}", created.status, created.body);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::UpstreamClient;
pub use error::UpstreamError;
pub use types::{PredictionStatus, PredictionSummary, UpstreamResponse};
