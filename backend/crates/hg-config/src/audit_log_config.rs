use serde::Deserialize;

// Audit log retention configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuditLogConfig {
    /// Number of days to retain audit entries (default: 90)
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Cleanup interval in hours (default: 24)
    #[serde(default = "default_cleanup_interval_hours")]
    pub cleanup_interval_hours: u32,
}

fn default_retention_days() -> u32 {
    90
}

fn default_cleanup_interval_hours() -> u32 {
    24
}

impl Default for AuditLogConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            cleanup_interval_hours: default_cleanup_interval_hours(),
        }
    }
}
