//! Fixed-window rate limiting keyed by client identifier.
//!
//! The window state lives in the external rate-limit store; this process
//! keeps no counters of its own.

pub mod models;
pub mod services;

pub use models::{RateLimitPolicy, RateLimitRecord};
pub use services::{GateDecision, SubmissionGate};
