use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::error::Result;
use crate::features::rate_limits::models::RateLimitPolicy;
use crate::modules::store::RateLimitStore;

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Rejected; the window expires in `retry_after_secs` (rounded up)
    Deny { retry_after_secs: i64 },
}

/// Fixed-window rate limiter over the external rate-limit store
///
/// Windows are reset lazily: an expired row is rewritten on the next request
/// from the same client, never purged.
pub struct SubmissionGate {
    store: Arc<dyn RateLimitStore>,
}

impl SubmissionGate {
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        Self { store }
    }

    /// Decide whether `client_id` may submit at `now`, recording the attempt.
    ///
    /// The row is read and then written in two round trips without a lock, so
    /// concurrent requests from one client can both read the same count and
    /// both be admitted. A stored expiry that could not be parsed counts as an
    /// expired window. Store failures are returned as errors, never as a
    /// decision.
    pub async fn check(
        &self,
        client_id: &str,
        policy: &RateLimitPolicy,
        now: DateTime<Utc>,
    ) -> Result<GateDecision> {
        let next_reset = now
            .checked_add_signed(policy.window())
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let Some(record) = self.store.find_rate_limit(client_id).await? else {
            self.store
                .insert_rate_limit(client_id, 1, next_reset)
                .await?;
            return Ok(GateDecision::Allow);
        };

        match record.reset_at {
            Some(reset_at) if now <= reset_at => {
                if record.count >= policy.max_requests {
                    let remaining_ms = (reset_at - now).num_milliseconds();
                    return Ok(GateDecision::Deny {
                        retry_after_secs: (remaining_ms + 999) / 1000,
                    });
                }

                self.store
                    .update_count(client_id, record.count + 1)
                    .await?;
            }
            _ => {
                self.store
                    .restart_window(client_id, 1, next_reset)
                    .await?;
            }
        }

        Ok(GateDecision::Allow)
    }
}
