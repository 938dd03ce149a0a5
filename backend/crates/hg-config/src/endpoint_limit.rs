use serde::Deserialize;

/// Limit for one throttled endpoint: `max_requests` per `window_secs`,
/// then blocked for `block_secs`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EndpointLimit {
    pub max_requests: u32,
    pub window_secs: u64,
    pub block_secs: u64,
}

impl EndpointLimit {
    pub const fn new(max_requests: u32, window_secs: u64, block_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            block_secs,
        }
    }
}
