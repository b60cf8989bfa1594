//! Liveness surface: a tiny HTTP endpoint plus a self-ping loop that keeps
//! free-tier hosts from idling the process out.

use axum::{Router, routing::get};
use reqwest::Client;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Answer for the hosting platform's health probe
async fn probe() -> &'static str {
    "Bot is running!"
}

/// Serve `GET /` on every interface. Bind and serve errors are logged and
/// the bot keeps running without the endpoint.
pub async fn serve(port: u16) {
    let app = Router::new()
        .route("/", get(probe))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting keep-alive server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(why) => {
            warn!("Cannot bind keep-alive server on {}: {}", addr, why);
            return;
        }
    };

    if let Err(why) = axum::serve(listener, app).await {
        warn!("Keep-alive server stopped: {}", why);
    }
}

/// Request our own liveness URL forever. The first tick fires immediately,
/// then once per interval; failures only warn.
pub async fn ping_loop(url: String, interval: Duration) {
    let client = Client::new();
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;
        match client.get(&url).send().await {
            Ok(response) => debug!("Keep-alive ping: {}", response.status()),
            Err(why) => warn!("Keep-alive ping failed: {}", why),
        }
    }
}
