/// Per-endpoint limiter policy.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    /// Maximum requests allowed within the window
    pub max_requests: u32,
    /// Sliding window length in seconds
    pub window_secs: u64,
    /// How long a client stays blocked after exceeding the limit
    pub block_secs: u64,
}
