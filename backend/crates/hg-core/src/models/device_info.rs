use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse device metadata parsed from a User-Agent header.
///
/// Parsing is best-effort and infallible: anything unrecognized falls
/// back to "Unknown" (browser/OS) and "desktop" (device type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub device_type: String,
    pub browser: String,
    pub os: String,
}

impl DeviceInfo {
    pub fn parse(user_agent: &str) -> Self {
        let ua = user_agent;

        let browser = if ua.contains("Edg/") || ua.contains("Edge/") {
            "Edge"
        } else if ua.contains("OPR/") || ua.contains("Opera") {
            "Opera"
        } else if ua.contains("Chrome/") {
            "Chrome"
        } else if ua.contains("Firefox/") {
            "Firefox"
        } else if ua.contains("Safari/") {
            "Safari"
        } else {
            "Unknown"
        };

        let os = if ua.contains("Windows") {
            "Windows"
        } else if ua.contains("Android") {
            "Android"
        } else if ua.contains("iPhone") || ua.contains("iPad") {
            "iOS"
        } else if ua.contains("Mac OS X") || ua.contains("Macintosh") {
            "macOS"
        } else if ua.contains("Linux") {
            "Linux"
        } else {
            "Unknown"
        };

        let device_type = if ua.contains("iPad") || ua.contains("Tablet") {
            "tablet"
        } else if ua.contains("Mobile") || ua.contains("Android") || ua.contains("iPhone") {
            "mobile"
        } else {
            "desktop"
        };

        Self {
            device_type: device_type.to_string(),
            browser: browser.to_string(),
            os: os.to_string(),
        }
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {} ({})", self.browser, self.os, self.device_type)
    }
}
