use crate::{RateLimitDecision, RateLimitPolicy};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Sliding-window rate limiter with a block list.
///
/// Requests are tracked per `{endpoint}:{client}` key. A client that
/// exceeds an endpoint's limit is blocked for the policy's block
/// duration; until then every check reports the remaining wait.
///
/// Window bookkeeping races between concurrent checks are tolerated;
/// once a block record exists it is authoritative.
pub struct SlidingWindowLimiter {
    enabled: bool,
    policies: HashMap<String, RateLimitPolicy>,
    state: Mutex<LimiterState>,
}

#[derive(Default)]
struct LimiterState {
    /// Request timestamps per endpoint+client key
    windows: HashMap<String, Vec<Instant>>,
    /// Blocked keys and when the block lifts
    blocked: HashMap<String, Instant>,
}

impl SlidingWindowLimiter {
    pub fn new(enabled: bool, policies: HashMap<String, RateLimitPolicy>) -> Self {
        Self {
            enabled,
            policies,
            state: Mutex::new(LimiterState::default()),
        }
    }

    /// Check whether a request is allowed and record it if so.
    ///
    /// Endpoints without a configured policy are never throttled.
    pub fn check_and_record(&self, endpoint: &str, client_id: &str) -> RateLimitDecision {
        if !self.enabled {
            return RateLimitDecision::allowed();
        }

        let Some(policy) = self.policies.get(endpoint) else {
            return RateLimitDecision::allowed();
        };

        let key = format!("{}:{}", endpoint, client_id);
        let now = Instant::now();

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(&blocked_until) = state.blocked.get(&key) {
            if blocked_until > now {
                let retry_after = (blocked_until - now).as_secs().max(1);
                return RateLimitDecision::blocked(retry_after);
            }
            state.blocked.remove(&key);
        }

        let cutoff = now - Duration::from_secs(policy.window_secs);
        {
            let entry = state.windows.entry(key.clone()).or_default();
            entry.retain(|&t| t > cutoff);

            if entry.len() < policy.max_requests as usize {
                entry.push(now);
                return RateLimitDecision::allowed();
            }
        }

        state.windows.remove(&key);
        state
            .blocked
            .insert(key, now + Duration::from_secs(policy.block_secs));

        RateLimitDecision::blocked(policy.block_secs)
    }

    /// Drop expired blocks and stale window entries.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        state.blocked.retain(|_, &mut until| until > now);

        let policies = &self.policies;
        state.windows.retain(|key, times| {
            let window_secs = key
                .split_once(':')
                .and_then(|(endpoint, _)| policies.get(endpoint))
                .map(|p| p.window_secs)
                .unwrap_or(0);
            let cutoff = now - Duration::from_secs(window_secs);
            times.retain(|&t| t > cutoff);
            !times.is_empty()
        });
    }

    /// Number of endpoint+client keys currently tracked.
    pub fn tracked_clients(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.windows.len() + state.blocked.len()
    }

    /// Spawn a periodic cleanup task so idle clients do not accumulate.
    pub fn start_cleanup_task(self: &Arc<Self>, interval: Duration) {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                limiter.cleanup();
            }
        });
    }
}
