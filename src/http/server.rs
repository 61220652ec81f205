//! HTTP server for registration and liveness.
//!
//! # Responsibilities
//! - Create the Axum router with the registration and health handlers
//! - Wire up middleware (request ID, tracing, request timeout)
//! - Derive the registrant address from the connection, never from input
//! - Run with graceful shutdown

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::observability::metrics;
use crate::registry::Registry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared membership store.
    pub registry: Registry,
    /// Fallback port for registrants that omit or garble `port`.
    pub default_service_port: u16,
}

/// HTTP server for the service directory.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over the shared registry.
    pub fn new(config: &Config, registry: Registry) -> Self {
        let state = AppState {
            registry,
            default_service_port: config.registry.default_service_port,
        };
        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &Config, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/register", get(register_handler).post(register_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Liveness of the directory itself, not of any registrant.
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "OK" }))
}

#[derive(Debug, Deserialize)]
struct RegisterParams {
    key: String,
    // Kept as a string so an unparsable value falls back to the default
    // port instead of rejecting the registration.
    port: Option<String>,
}

/// Register the caller under `key`. The address comes from the connection's
/// remote endpoint; only the port is caller-supplied.
async fn register_handler(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    Query(params): Query<RegisterParams>,
) -> StatusCode {
    let port = params
        .port
        .as_deref()
        .and_then(|raw| raw.parse::<u16>().ok())
        .unwrap_or(state.default_service_port);

    state.registry.upsert(&params.key, remote.ip(), port);
    metrics::record_registration();
    metrics::record_registry_size(state.registry.len());

    tracing::info!(key = %params.key, address = %remote.ip(), port, "service registered");
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router(registry: Registry) -> Router {
        let state = AppState {
            registry,
            default_service_port: 8000,
        };
        HttpServer::build_router(&Config::default(), state)
    }

    fn request_from(uri: &str, remote: &str) -> Request<Body> {
        let mut request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo::<SocketAddr>(remote.parse().unwrap()));
        request
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let router = test_router(Registry::new(5));

        let response = router
            .oneshot(request_from("/health", "10.0.0.1:55555"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "status": "OK" }));
    }

    #[tokio::test]
    async fn register_uses_the_connection_address() {
        let registry = Registry::new(5);
        let router = test_router(registry.clone());

        let response = router
            .oneshot(request_from("/register?key=svc1&port=9000", "10.0.0.1:55555"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].key, "svc1");
        assert_eq!(snapshot[0].address, "10.0.0.1".parse::<std::net::IpAddr>().unwrap());
        assert_eq!(snapshot[0].port, 9000);
    }

    #[tokio::test]
    async fn unparsable_port_falls_back_to_the_default() {
        let registry = Registry::new(5);
        let router = test_router(registry.clone());

        let response = router
            .oneshot(request_from("/register?key=svc1&port=banana", "10.0.0.1:55555"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(registry.snapshot()[0].port, 8000);
    }

    #[tokio::test]
    async fn missing_port_falls_back_to_the_default() {
        let registry = Registry::new(5);
        let router = test_router(registry.clone());

        let response = router
            .oneshot(request_from("/register?key=svc1", "10.0.0.2:1234"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(registry.snapshot()[0].port, 8000);
    }

    #[tokio::test]
    async fn missing_key_is_rejected() {
        let registry = Registry::new(5);
        let router = test_router(registry.clone());

        let response = router
            .oneshot(request_from("/register?port=9000", "10.0.0.1:55555"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn reregistration_overwrites_the_previous_record() {
        let registry = Registry::new(5);
        let router = test_router(registry.clone());

        let first = request_from("/register?key=svc1&port=9000", "10.0.0.1:55555");
        router.clone().oneshot(first).await.unwrap();
        let second = request_from("/register?key=svc1&port=9001", "10.0.0.9:55555");
        router.oneshot(second).await.unwrap();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].port, 9001);
        assert_eq!(snapshot[0].address, "10.0.0.9".parse::<std::net::IpAddr>().unwrap());
    }
}
