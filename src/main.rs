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

// ----------------------
// External dependencies
// ----------------------
use hyper::Server;                              // Hyper: HTTP server
use std::{net::SocketAddr, process::exit};      // Network + system utilities

use clap::Parser;                               // CLI argument parsing (via `--config`)
use tracing::{error, info};                     // Structured logging macros
use tracing_subscriber::EnvFilter;              // Log filtering via LOG_LEVEL

// ----------------------
// Internal dependencies
// ----------------------
use oxygen_cdn_proxy::config::Config;
use oxygen_cdn_proxy::proxy::{ProxyState, build_router};

/// ----------------------------
/// CLI ARGUMENT STRUCTURE
/// ----------------------------
/// Path to the configuration file, "config.yaml" if not provided.
#[derive(Parser, Debug)]
#[command(
    name = "oxygen-cdn-proxy",
    version,
    about = "Caching reverse proxy for Oxygen storefront assets"
)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "config.yaml")]
    config: String,
}

/// ----------------------------
/// LOGGING INITIALIZATION
/// ----------------------------
/// Verbosity comes from the `LOG_LEVEL` environment variable, "info" if
/// unset or invalid.
fn init_logging() {
    let filter = EnvFilter::try_new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// ---------------------------
/// APPLICATION ENTRY POINT
/// ---------------------------
#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Logging goes first so configuration errors are visible.
    init_logging();

    let config = match Config::from_file(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Failed to load config from '{}': {e}", args.config);
            exit(1);
        }
    };

    info!("🚀 Logging initialized for app_id: {}", config.app_id);

    let app = build_router(ProxyState::new(config.proxy_prefix.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.proxy_port));
    info!("🚀 Server listening at http://{}", addr);

    let server = match Server::try_bind(&addr) {
        Ok(builder) => builder,
        Err(e) => {
            error!("❌ Could not bind {}: {e}", addr);
            exit(1);
        }
    };

    if let Err(e) = server.serve(app.into_make_service()).await {
        error!("❌ Server error: {e}");
        exit(1);
    }
}
