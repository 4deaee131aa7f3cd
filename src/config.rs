// Copyright (C) 2025 Matías Salinas (support@fenden.com)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Deserialize;
use std::{error::Error, fs};

use crate::proxy::CDN_PROXY_PREFIX;

/// Characters with a special meaning in axum route patterns.
const ROUTE_META_CHARS: [char; 5] = ['*', ':', '{', '}', '?'];

/// Main configuration structure loaded from a YAML file.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Application identifier, used in logs.
    pub app_id: String,

    /// Port the proxy listens on.
    #[serde(default = "default_proxy_port")]
    pub proxy_port: u16,

    /// Path segment routed to the asset proxy. Must start and end with `/`.
    #[serde(default = "default_proxy_prefix")]
    pub proxy_prefix: String,
}

fn default_proxy_port() -> u16 {
    3000
}

fn default_proxy_prefix() -> String {
    CDN_PROXY_PREFIX.to_string()
}

impl Config {
    /// Parses configuration from a YAML file.
    ///
    /// # Returns
    /// - `Ok(Config)` if parsing and validation succeed.
    /// - `Err(Box<dyn Error>)` if the file is missing, malformed, or the
    ///   prefix cannot be mounted as a route.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        let parsed: Config = serde_yaml::from_str(&contents)?;

        parsed.validate()?;

        tracing::info!(
            "Asset proxy mounted at '{}*' on port {}",
            parsed.proxy_prefix,
            parsed.proxy_port
        );

        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.app_id.trim().is_empty() {
            return Err("app_id must not be empty.".into());
        }

        let prefix = &self.proxy_prefix;
        if prefix.len() < 3 || !prefix.starts_with('/') || !prefix.ends_with('/') {
            return Err(format!(
                "proxy_prefix '{prefix}' must look like '/segment/'."
            )
            .into());
        }

        if prefix.contains(ROUTE_META_CHARS) {
            return Err(format!(
                "proxy_prefix '{prefix}' contains route pattern characters."
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_id: "oxygen-cdn-proxy".to_string(),
            proxy_port: default_proxy_port(),
            proxy_prefix: default_proxy_prefix(),
        }
    }
}
