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

use axum::response::{IntoResponse, Response};
use hyper::StatusCode;
use thiserror::Error;

/// Failures of the asset proxy that never produced an upstream response.
///
/// An upstream that answers with 4xx/5xx is not an error here: its status is
/// passed through to the client.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The target is still not a valid request URI after URL normalization.
    #[error("invalid upstream URL '{url}': {source}")]
    InvalidTarget {
        url: String,
        #[source]
        source: hyper::http::Error,
    },

    /// Connection refused, DNS failure, TLS failure and the like.
    #[error("request to '{url}' failed: {source}")]
    Upstream {
        url: String,
        #[source]
        source: hyper::Error,
    },
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_GATEWAY, "Asset origin unavailable").into_response()
    }
}
