//! HTTP client module
//!
//! Thin wrapper over reqwest used by the endpoint fetcher and the constant
//! synchronizer.
//!
//! # Features
//!
//! - **Base URL joining**: endpoint names are resolved against the API root
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Authentication**: Optional API key attached to every request

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
