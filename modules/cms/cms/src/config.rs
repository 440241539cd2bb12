//! Configuration for the CMS module.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// CMS module configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CmsConfig {
    /// Site used when a request does not carry an explicit site header.
    pub default_site_id: i64,

    /// Time-to-live of the generated API document.
    #[serde(with = "humantime_duration")]
    pub docs_cache_ttl: Duration,

    /// Page size used when a list request does not ask for one.
    pub default_page_size: u64,

    /// Upper bound for `per_page`.
    pub max_page_size: u64,

    /// Title of the generated API document.
    pub docs_title: String,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            default_site_id: 0,
            docs_cache_ttl: Duration::from_secs(60 * 60),
            default_page_size: 25,
            max_page_size: 100,
            docs_title: "CMS API".to_owned(),
        }
    }
}

impl CmsConfig {
    /// Clamp a requested page size into `1..=max_page_size`.
    #[must_use]
    pub fn page_size(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1))
    }
}

/// `Duration` as a humantime string ("1h", "90s").
mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&humantime::format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw).map_err(de::Error::custom)
    }
}
