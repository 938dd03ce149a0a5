use serde::Deserialize;

// Session maintenance configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Expired-session sweep interval in hours (default: 6)
    #[serde(default = "default_cleanup_interval_hours")]
    pub cleanup_interval_hours: u32,

    /// Days an inactive session row is kept before pruning (default: 30)
    #[serde(default = "default_inactive_prune_days")]
    pub inactive_prune_days: u32,
}

fn default_cleanup_interval_hours() -> u32 {
    6
}

fn default_inactive_prune_days() -> u32 {
    30
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_hours: default_cleanup_interval_hours(),
            inactive_prune_days: default_inactive_prune_days(),
        }
    }
}
