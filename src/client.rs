//! OpenProject API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Higher-level operations are implemented via traits on entity types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use url::Url;

use crate::auth::Auth;
use crate::error::{OpenProjectError, Result};

const USER_AGENT: &str = concat!("openproject-rs/", env!("CARGO_PKG_VERSION"));

/// Low-level OpenProject API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the `Get`, `List`, `Create` and `Delete` traits on
/// model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool and, for session authentication, the same session.
///
/// # Example
///
/// ```no_run
/// use openproject::{Auth, OpenProjectClient};
///
/// # fn example() -> openproject::Result<()> {
/// // Create from environment variables
/// let client = OpenProjectClient::from_env()?;
///
/// // Or configure manually
/// let client = OpenProjectClient::new(
///     "https://community.openproject.org",
///     Auth::api_key("your-api-key"),
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OpenProjectClient {
    http: Client,
    base_url: Arc<Url>,
    auth: Arc<Auth>,
}

impl std::fmt::Debug for OpenProjectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenProjectClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth.kind())
            .finish_non_exhaustive()
    }
}

impl OpenProjectClient {
    /// Create a client from environment variables.
    ///
    /// Uses `OPENPROJECT_URL` for the instance URL and, if set,
    /// `OPENPROJECT_API_KEY` for API key authentication.
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENPROJECT_URL` is not set or is invalid.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("OPENPROJECT_URL").map_err(|_| {
            OpenProjectError::ConfigMissing(
                "OPENPROJECT_URL environment variable not set".to_string(),
            )
        })?;

        let auth = match env::var("OPENPROJECT_API_KEY") {
            Ok(key) if !key.is_empty() => Auth::api_key(key),
            _ => Auth::None,
        };

        Self::new(&base_url, auth)
    }

    /// Create a new client for the instance at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root URL of the OpenProject instance
    ///   (e.g., `https://community.openproject.org`)
    /// * `auth` - Authentication strategy applied to every request
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: &str, auth: Auth) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(OpenProjectError::HttpError)?;

        Self::with_http_client(http, base_url, auth)
    }

    /// Create a client that reuses a caller-configured `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_http_client(http: Client, base_url: &str, auth: Auth) -> Result<Self> {
        // Keep the trailing slash so relative endpoint paths are appended.
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            auth: Arc::new(auth),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the authentication strategy.
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Resolve an endpoint path against the base URL.
    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.url(path)?;
        self.send(self.http.get(url)).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.url(path)?;
        self.send(self.http.get(url).query(query)).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let url = self.url(path)?;
        self.send(self.http.post(url).json(body)).await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let url = self.url(path)?;
        self.send(self.http.delete(url)).await
    }

    /// Download the raw body of a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn download(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.get(path).await?;
        let bytes = response.bytes().await.map_err(OpenProjectError::HttpError)?;
        Ok(bytes.to_vec())
    }

    /// Authenticate, send and check a request.
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let mut request = builder.build().map_err(OpenProjectError::HttpError)?;
        self.auth.apply(&mut request, &self.http).await?;

        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(OpenProjectError::HttpError)?;

        Self::check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(OpenProjectError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        Err(OpenProjectError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    ///
    /// OpenProject answers with an error document of the form
    /// `{"_type": "Error", "errorIdentifier": "...", "message": "..."}`.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(id) = json.get("errorIdentifier").and_then(|m| m.as_str()) {
                return id.to_string();
            }
        }

        if body.trim().is_empty() {
            return format!("request failed with status code {}", status.as_u16());
        }

        body
    }
}
