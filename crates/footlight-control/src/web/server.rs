//! Axum HTTP server

use axum::http::{header, HeaderValue, Method};
use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use super::routes::build_router;
use crate::handle::ControlHandle;
use crate::{error::ControlError, Result};

/// Application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub control: ControlHandle,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub allowed_origins: Vec<String>,
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            // Secure by default: bind to localhost
            host: "127.0.0.1".to_string(),
            port: 8080,
            enable_cors: true,
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl WebServerConfig {
    /// Create a new web server config
    pub fn new(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Set the host address
    pub fn with_host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    /// Set CORS enabled/disabled
    pub fn with_cors(mut self, enable: bool) -> Self {
        self.enable_cors = enable;
        self
    }

    /// Set allowed origins for CORS
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ControlError::HttpError(format!("Invalid address: {}", e)))
    }
}

/// Assemble the router with middleware and state
pub fn build_app(config: &WebServerConfig, state: AppState) -> Result<Router> {
    let app = build_router()
        .layer(middleware::from_fn(security_headers))
        .with_state(state);

    if !config.enable_cors {
        return Ok(app);
    }

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    // "*" or no origins means permissive
    if config.allowed_origins.iter().any(|o| o == "*") || config.allowed_origins.is_empty() {
        Ok(app.layer(cors_layer.allow_origin(Any)))
    } else {
        let origins: Result<Vec<HeaderValue>> = config
            .allowed_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| ControlError::HttpError(format!("Invalid origin header: {}", e)))
            })
            .collect();

        Ok(app.layer(cors_layer.allow_origin(origins?)))
    }
}

/// Web server for the configuration API
pub struct WebServer {
    config: WebServerConfig,
    control: ControlHandle,
}

impl WebServer {
    pub fn new(config: WebServerConfig, control: ControlHandle) -> Self {
        Self { config, control }
    }

    /// Run the web server until it fails
    pub async fn run(self) -> Result<()> {
        let addr = self.config.socket_addr()?;
        let app = build_app(
            &self.config,
            AppState {
                control: self.control,
            },
        )?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ControlError::HttpError(format!("Failed to bind: {}", e)))?;

        tracing::info!("Web server listening on {}", addr);

        axum::serve(listener, app.into_make_service())
            .await
            .map_err(|e| ControlError::HttpError(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Spawn the server in a background task
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}

/// Security headers middleware
async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    // Prevent MIME sniffing
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    // Prevent clickjacking
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use tower::ServiceExt;

    #[test]
    fn test_web_server_config() {
        let config = WebServerConfig::new(8080)
            .with_host("0.0.0.0".to_string())
            .with_cors(false)
            .with_allowed_origins(vec!["http://localhost:3000".to_string()]);

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(!config.enable_cors);
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_invalid_host() {
        let config = WebServerConfig::new(80).with_host("not a host".to_string());
        assert!(config.socket_addr().is_err());
    }

    #[tokio::test]
    async fn test_security_headers() {
        let app = axum::Router::new()
            .route("/", axum::routing::get(|| async { "Hello" }))
            .layer(middleware::from_fn(security_headers));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers
                .get("X-Content-Type-Options")
                .and_then(|h| h.to_str().ok()),
            Some("nosniff")
        );
        assert_eq!(
            headers.get("X-Frame-Options").and_then(|h| h.to_str().ok()),
            Some("DENY")
        );
        assert_eq!(
            headers.get("Referrer-Policy").and_then(|h| h.to_str().ok()),
            Some("no-referrer")
        );
    }
}
