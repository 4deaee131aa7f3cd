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
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use hyper::client::HttpConnector;
use hyper::header::{HOST, HeaderName, HeaderValue};
use hyper::{Body, Client, HeaderMap, Method, Request, Response, Uri};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use url::Url;

use crate::error::ProxyError;
use crate::oxygen::{AssetsUrl, OxygenEnv};

/// Path segment that routes a request to the asset proxy.
pub const CDN_PROXY_PREFIX: &str = "/.cdn/";

/// Directives forced onto every successful asset response.
pub const CACHE_HEADERS: [(&str, &str); 3] = [
    ("cache-control", "public, max-age=31536000"),
    ("vary", "Accept-Encoding"),
    ("oxygen-full-page-cache-enable", "true"),
];

/// Outbound client able to reach both the local dev server and the CDN.
pub type CdnClient = Client<HttpsConnector<HttpConnector>>;

/// Shared state of the proxy route.
pub struct ProxyState {
    pub prefix: String,
    pub client: CdnClient,
}

impl ProxyState {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            client: build_client(),
        }
    }
}

/// Builds the outbound HTTP client. Connection pooling is left to hyper.
pub fn build_client() -> CdnClient {
    let https = HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();

    Client::builder().build(https)
}

/// Mounts the proxy under `<prefix>*path`.
pub fn build_router(state: ProxyState) -> Router {
    let route = format!("{}*path", state.prefix);
    Router::new()
        .route(&route, get(cdn_proxy_handler))
        .with_state(Arc::new(state))
}

/// Axum entry point. Transport errors become a `502` via [`ProxyError`].
pub async fn cdn_proxy_handler(
    State(state): State<Arc<ProxyState>>,
    req: Request<Body>,
) -> Result<Response<Body>, ProxyError> {
    proxy_asset(&state.client, &state.prefix, req).await
}

/// Forwards one asset request to its origin and returns the origin's response
/// with the caching policy applied.
///
/// Only fails when no upstream response was obtained at all.
pub async fn proxy_asset(
    client: &CdnClient,
    prefix: &str,
    req: Request<Body>,
) -> Result<Response<Body>, ProxyError> {
    let (parts, _body) = req.into_parts();

    let env = OxygenEnv::from_headers(&parts.headers);
    let assets_url = AssetsUrl::for_env(&env, &parts.headers, &parts.uri);
    let proxy_url = build_proxy_url(&assets_url, &parts.uri, prefix);

    tracing::debug!(
        dev = assets_url.is_dev(),
        country = env.buyer.country.as_deref().unwrap_or("-"),
        "🔀 Proxying '{}' to '{}'",
        parts.uri,
        proxy_url
    );

    let upstream = forward_request(client, &proxy_url, &parts.headers).await?;
    Ok(cache_response(upstream))
}

/// Removes the first occurrence of `prefix` from `path`.
///
/// This is a plain substring removal: the prefix does not have to sit at the
/// start of the path, and later occurrences are kept.
pub fn proxy_path(path: &str, prefix: &str) -> String {
    path.replacen(prefix, "", 1)
}

/// `<assets url>/<path without prefix><?query>`
pub fn build_proxy_url(assets_url: &AssetsUrl, uri: &Uri, prefix: &str) -> String {
    let search = match uri.query() {
        Some(query) if !query.is_empty() => format!("?{query}"),
        _ => String::new(),
    };

    format!("{}/{}{}", assets_url, proxy_path(uri.path(), prefix), search)
}

/// Serializes `url` the way a browser URL parser does, percent-encoding
/// characters a request URI cannot carry (`bad shop` becomes `bad%20shop`).
///
/// Identifiers are never validated, so whatever they contain reaches the
/// origin and any rejection shows up as the origin's status code.
pub fn normalize_target(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.into(),
        Err(e) => {
            tracing::debug!("Leaving asset URL '{}' as is: {}", url, e);
            url.to_string()
        }
    }
}

/// Sends a GET to `url` carrying every inbound header.
///
/// `Host` is left for the client to derive from `url`.
pub async fn forward_request(
    client: &CdnClient,
    url: &str,
    headers: &HeaderMap,
) -> Result<Response<Body>, ProxyError> {
    let url = normalize_target(url);
    let url = url.as_str();
    let mut builder = Request::builder().uri(url).method(Method::GET);

    for (key, value) in headers.iter() {
        if *key == HOST {
            continue;
        }
        builder = builder.header(key, value);
    }

    let req = builder
        .body(Body::empty())
        .map_err(|source| {
            tracing::warn!("❌ Error building asset request for '{}': {}", url, source);
            ProxyError::InvalidTarget {
                url: url.to_string(),
                source,
            }
        })?;

    client.request(req).await.map_err(|source| {
        tracing::warn!("❌ Request to asset origin '{}' failed: {}", url, source);
        ProxyError::Upstream {
            url: url.to_string(),
            source,
        }
    })
}

/// Applies the caching policy to an upstream response.
///
/// - 2xx: upstream headers with [`CACHE_HEADERS`] written over them.
/// - anything else: status and body only, every header dropped.
///
/// The body is handed over as is, never buffered.
pub fn cache_response<B>(upstream: Response<B>) -> Response<B> {
    let (mut parts, body) = upstream.into_parts();

    if !parts.status.is_success() {
        parts.headers.clear();
        return Response::from_parts(parts, body);
    }

    for (name, value) in CACHE_HEADERS {
        parts
            .headers
            .insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }

    Response::from_parts(parts, body)
}
