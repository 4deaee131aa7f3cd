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

use std::fmt;

use hyper::header::HOST;
use hyper::{HeaderMap, Uri};
use url::Url;

use crate::oxygen::env::OxygenEnv;

/// Base of every production asset URL.
pub const OXYGEN_CDN_BASE: &str = "https://cdn.shopify.com/oxygen";

/// Rendered in place of any identifier the platform did not send.
const MISSING_ID: &str = "undefined";

/// Base URL of the origin serving the storefront's static assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetsUrl {
    /// Local development: the host the request arrived on, e.g. `http://localhost:3000`.
    Dev(String),
    /// `https://cdn.shopify.com/oxygen/<shop>/<storefront>/<deployment>`
    Prod(String),
}

impl AssetsUrl {
    /// Builds the assets URL from an already extracted [`OxygenEnv`].
    ///
    /// `headers` and `uri` are only consulted in dev mode, to work out the
    /// origin the request was sent to.
    pub fn for_env(env: &OxygenEnv, headers: &HeaderMap, uri: &Uri) -> Self {
        if env.is_local() {
            return AssetsUrl::Dev(request_origin(headers, uri));
        }

        AssetsUrl::Prod(format!(
            "{}/{}/{}/{}",
            OXYGEN_CDN_BASE,
            env.shop_id.as_deref().unwrap_or(MISSING_ID),
            env.storefront_id.as_deref().unwrap_or(MISSING_ID),
            env.deployment_id.as_deref().unwrap_or(MISSING_ID),
        ))
    }

    pub fn as_str(&self) -> &str {
        match self {
            AssetsUrl::Dev(url) | AssetsUrl::Prod(url) => url,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, AssetsUrl::Dev(_))
    }
}

impl fmt::Display for AssetsUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the assets origin for an inbound request.
///
/// ```text
/// (prod) https://cdn.shopify.com/oxygen/55145660472/1000001971/evns5kqde
/// (dev)  http://localhost:3000
/// ```
///
/// Total over its input: missing identifiers become `undefined` path segments
/// and are left for the CDN to reject.
pub fn resolve_assets_url(headers: &HeaderMap, uri: &Uri) -> AssetsUrl {
    AssetsUrl::for_env(&OxygenEnv::from_headers(headers), headers, uri)
}

/// Scheme, host and port of the URL the request was sent to, serialized the
/// way a browser serializes `URL.origin` (default ports are dropped).
///
/// Servers usually see origin-form URIs (`/path?query`), in which case the
/// authority comes from the `Host` header.
pub fn request_origin(headers: &HeaderMap, uri: &Uri) -> String {
    let base = match (uri.scheme_str(), uri.authority()) {
        (Some(scheme), Some(authority)) => format!("{scheme}://{authority}"),
        _ => {
            let host = headers
                .get(HOST)
                .and_then(|v| v.to_str().ok())
                .filter(|h| !h.is_empty())
                .unwrap_or("localhost");
            format!("http://{host}")
        }
    };

    match Url::parse(&base) {
        Ok(url) => url.origin().ascii_serialization(),
        Err(e) => {
            tracing::warn!("⚠️ Could not parse request origin '{}': {}", base, e);
            "http://localhost".to_string()
        }
    }
}
