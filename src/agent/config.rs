//! Agent configuration: version tag, asset manifest, offline fallback.

use crate::types::Request;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Static configuration for a [`CacheAgent`](super::CacheAgent).
///
/// The cache name carries the version tag: changing it makes the agent
/// populate a fresh store on install and sweep the old one on activate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Version-qualified store name, e.g. `"site-cache-v2"`.
    pub cache_name: String,
    /// The agent's own origin. Responses for any other origin are never
    /// cached.
    pub origin: Url,
    /// URLs precached during install, resolved against `origin` when
    /// relative. Ordered, fixed, all-or-nothing.
    pub assets: Vec<String>,
    /// Manifest entry substituted for failed top-level navigations. Must
    /// appear in `assets`.
    pub offline_url: String,
}

impl AgentConfig {
    pub fn builder(cache_name: impl Into<String>, origin: Url) -> AgentConfigBuilder {
        AgentConfigBuilder {
            cache_name: cache_name.into(),
            origin,
            assets: Vec::new(),
            offline_url: None,
        }
    }

    /// Loads and validates a configuration from a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(s)
            .map_err(|e| Error::config(format!("invalid agent config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| Error::config(format!("invalid agent config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_name.is_empty() {
            return Err(Error::config("cache_name must not be empty"));
        }
        if self.origin.cannot_be_a_base() {
            return Err(Error::config(format!(
                "origin {} cannot serve as a base URL",
                self.origin
            )));
        }
        if !self.assets.contains(&self.offline_url) {
            return Err(Error::config(format!(
                "offline fallback {} must be listed in the asset manifest",
                self.offline_url
            )));
        }
        for asset in &self.assets {
            let url = self.resolve(asset)?;
            if url.origin() != self.origin.origin() {
                return Err(Error::config(format!(
                    "manifest asset {asset} resolves outside the agent origin"
                )));
            }
        }
        Ok(())
    }

    /// Manifest entries resolved to absolute URLs, in manifest order.
    pub fn asset_urls(&self) -> Result<Vec<Url>> {
        self.assets.iter().map(|a| self.resolve(a)).collect()
    }

    /// The request under which the offline fallback was precached.
    pub fn offline_request(&self) -> Result<Request> {
        Ok(Request::get(self.resolve(&self.offline_url)?))
    }

    fn resolve(&self, entry: &str) -> Result<Url> {
        self.origin
            .join(entry)
            .map_err(|e| Error::config(format!("manifest entry {entry} is not a valid URL: {e}")))
    }
}

/// Builder for [`AgentConfig`].
pub struct AgentConfigBuilder {
    cache_name: String,
    origin: Url,
    assets: Vec<String>,
    offline_url: Option<String>,
}

impl AgentConfigBuilder {
    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.assets.push(asset.into());
        self
    }

    pub fn with_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assets.extend(assets.into_iter().map(Into::into));
        self
    }

    pub fn with_offline_url(mut self, url: impl Into<String>) -> Self {
        self.offline_url = Some(url.into());
        self
    }

    pub fn build(self) -> Result<AgentConfig> {
        let offline_url = self
            .offline_url
            .ok_or_else(|| Error::config("an offline fallback URL is required"))?;
        let config = AgentConfig {
            cache_name: self.cache_name,
            origin: self.origin,
            assets: self.assets,
            offline_url,
        };
        config.validate()?;
        Ok(config)
    }
}
