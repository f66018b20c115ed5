//! Forwarding to domain services.
//!
//! The gateway does not interpret domain payloads. Method, path, query,
//! body and content headers pass through unchanged; the authenticated
//! principal travels in `X-User-Id` / `X-User-Email`.

use std::fmt;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, Method, Response, StatusCode, header};
use bytes::Bytes;
use tracing::{debug, warn};

use tickgate_core::config::UpstreamConfig;
use tickgate_core::error::{AppError, ErrorKind};
use tickgate_core::result::AppResult;
use tickgate_core::types::Claims;

/// Header carrying the authenticated principal id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated principal email.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Request headers copied to the upstream call.
const FORWARDED_REQUEST_HEADERS: [HeaderName; 4] = [
    header::CONTENT_TYPE,
    header::ACCEPT,
    header::ACCEPT_LANGUAGE,
    header::IF_NONE_MATCH,
];

/// Response headers copied back to the client.
const FORWARDED_RESPONSE_HEADERS: [HeaderName; 4] = [
    header::CONTENT_TYPE,
    header::CACHE_CONTROL,
    header::ETAG,
    header::LOCATION,
];

/// Domain services behind the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Auth,
    Dashboards,
    Analytics,
    Users,
    Watchlists,
    Alerts,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Auth => "auth",
            Self::Dashboards => "dashboards",
            Self::Analytics => "analytics",
            Self::Users => "users",
            Self::Watchlists => "watchlists",
            Self::Alerts => "alerts",
        };
        f.write_str(s)
    }
}

/// A request to forward.
#[derive(Debug)]
pub struct ProxyRequest<'a> {
    pub method: Method,
    /// Path and query exactly as received.
    pub path_and_query: &'a str,
    pub headers: &'a HeaderMap,
    pub body: Bytes,
    pub claims: Option<&'a Claims>,
}

/// HTTP client for domain services.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig, fallback_timeout_seconds: u64) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout(fallback_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    fn base_url(&self, service: Service) -> Option<&str> {
        let url = match service {
            Service::Auth => &self.config.auth,
            Service::Dashboards => &self.config.dashboards,
            Service::Analytics => &self.config.analytics,
            Service::Users => &self.config.users,
            Service::Watchlists => &self.config.watchlists,
            Service::Alerts => &self.config.alerts,
        };
        url.as_deref().map(|u| u.trim_end_matches('/'))
    }

    /// Forward `request` to `service`.
    ///
    /// Unconfigured services fail with `NotImplemented`; transport errors
    /// with `ExternalService`.
    pub async fn forward(&self, service: Service, request: ProxyRequest<'_>) -> AppResult<Response<Body>> {
        let base = self.base_url(service).ok_or_else(|| {
            debug!(%service, "No upstream configured");
            AppError::not_implemented(format!("No upstream configured for {service}"))
        })?;
        let url = format!("{base}{}", request.path_and_query);

        let mut call = self.http.request(request.method.clone(), &url);
        for name in FORWARDED_REQUEST_HEADERS.iter() {
            if let Some(value) = request.headers.get(name) {
                call = call.header(name, value);
            }
        }
        if let Some(claims) = request.claims {
            call = call
                .header(USER_ID_HEADER, &claims.principal_id)
                .header(USER_EMAIL_HEADER, &claims.email);
        }
        if !request.body.is_empty() {
            call = call.body(request.body);
        }

        let upstream = call.send().await.map_err(|e| {
            warn!(%service, url = %url, error = %e, "Upstream call failed");
            AppError::with_source(ErrorKind::ExternalService, format!("{service} service unreachable"), e)
        })?;

        let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        let mut builder = Response::builder().status(status);
        for name in FORWARDED_RESPONSE_HEADERS.iter() {
            if let Some(value) = upstream.headers().get(name) {
                builder = builder.header(name, value);
            }
        }
        let body = upstream.bytes().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, format!("{service} response truncated"), e)
        })?;

        builder
            .body(Body::from(body))
            .map_err(|e| AppError::internal(format!("Failed to build proxied response: {e}")))
    }
}
