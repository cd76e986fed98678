//! Authentication strategies for OpenProject requests.
//!
//! Every request built by [`OpenProjectClient`](crate::OpenProjectClient) is
//! decorated by exactly one [`Auth`] strategy right before it is sent:
//!
//! - HTTP basic auth (including OpenProject API keys, which use the fixed
//!   `apikey` user name)
//! - Session cookies obtained from a one-time login request
//! - Per-request HS256 JWT signing with a query string hash

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::header::{HeaderValue, AUTHORIZATION, COOKIE, SET_COOKIE};
use reqwest::{Client, Method, Request};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use url::Url;

use crate::error::{OpenProjectError, Result};

/// User name OpenProject expects when authenticating with an API key.
pub const API_KEY_USER: &str = "apikey";

/// Lifetime of a signed JWT, in seconds.
const JWT_LIFETIME_SECS: i64 = 59;

/// Timeout for the session login request.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(60);

/// Authentication strategy applied to every outgoing request.
#[derive(Clone, Default)]
pub enum Auth {
    /// Anonymous access.
    #[default]
    None,
    /// HTTP basic authentication.
    Basic { username: String, password: String },
    /// Cookie based session authentication.
    Session(SessionAuth),
    /// JWT request signing.
    Jwt(JwtAuth),
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Session(session) => f
                .debug_struct("Session")
                .field("username", &session.username)
                .field("auth_url", &session.auth_url.as_str())
                .finish_non_exhaustive(),
            Self::Jwt(jwt) => f
                .debug_struct("Jwt")
                .field("issuer", &jwt.issuer)
                .finish_non_exhaustive(),
        }
    }
}

impl Auth {
    /// Basic authentication with a user name and password.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Basic authentication with an OpenProject API key.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::basic(API_KEY_USER, key)
    }

    /// Session authentication against the given login URL.
    ///
    /// The login request is only issued when the first API request is sent.
    pub fn session(
        username: impl Into<String>,
        password: impl Into<String>,
        auth_url: Url,
    ) -> Self {
        Self::Session(SessionAuth {
            username: username.into(),
            password: password.into(),
            auth_url,
            cookies: Arc::new(RwLock::new(None)),
        })
    }

    /// JWT signing with a shared secret.
    pub fn jwt(secret: impl Into<Vec<u8>>, issuer: impl Into<String>) -> Self {
        Self::Jwt(JwtAuth {
            secret: secret.into(),
            issuer: issuer.into(),
        })
    }

    /// Short name of the strategy, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic { .. } => "basic",
            Self::Session(_) => "session",
            Self::Jwt(_) => "jwt",
        }
    }

    /// Decorate a built request with credentials.
    pub(crate) async fn apply(&self, request: &mut Request, http: &Client) -> Result<()> {
        match self {
            Self::None => {}
            Self::Basic { username, password } => {
                if !username.is_empty() {
                    let value = sensitive(&basic_header(username, password))?;
                    request.headers_mut().insert(AUTHORIZATION, value);
                }
            }
            Self::Session(session) => {
                let cookies = session.cookie_header(http).await?;
                request.headers_mut().insert(COOKIE, sensitive(&cookies)?);
            }
            Self::Jwt(jwt) => {
                let token = jwt.token_for(request.method(), request.url())?;
                let value = sensitive(&format!("JWT {token}"))?;
                request.headers_mut().insert(AUTHORIZATION, value);
            }
        }
        Ok(())
    }
}

/// Cookie session credentials with a lazily populated cookie cache.
#[derive(Clone)]
pub struct SessionAuth {
    username: String,
    password: String,
    auth_url: Url,
    cookies: Arc<RwLock<Option<String>>>,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

impl SessionAuth {
    /// Return the cached `Cookie` header value, logging in on first use.
    async fn cookie_header(&self, http: &Client) -> Result<String> {
        {
            let cached = self.cookies.read().await;
            if let Some(cookies) = cached.as_ref() {
                return Ok(cookies.clone());
            }
        }

        let mut cached = self.cookies.write().await;

        // Another request may have logged in while we waited for the lock.
        if let Some(cookies) = cached.as_ref() {
            return Ok(cookies.clone());
        }

        let cookies = self.login(http).await?;
        *cached = Some(cookies.clone());
        Ok(cookies)
    }

    #[tracing::instrument(skip_all, fields(auth_url = %self.auth_url))]
    async fn login(&self, http: &Client) -> Result<String> {
        let response = http
            .post(self.auth_url.clone())
            .timeout(LOGIN_TIMEOUT)
            .json(&LoginBody {
                username: &self.username,
                password: &self.password,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OpenProjectError::Auth(format!(
                "session login returned HTTP {status}"
            )));
        }

        let cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(cookie_pair)
            .collect();

        if cookies.is_empty() {
            return Err(OpenProjectError::Auth(
                "session login returned no cookies".to_string(),
            ));
        }

        tracing::debug!(count = cookies.len(), "session established");
        Ok(cookies.join("; "))
    }
}

/// JWT signing credentials.
#[derive(Clone)]
pub struct JwtAuth {
    secret: Vec<u8>,
    issuer: String,
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    iat: i64,
    exp: i64,
    qsh: String,
}

impl JwtAuth {
    /// Sign a token for one request.
    pub fn token_for(&self, method: &Method, url: &Url) -> Result<String> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.issuer,
            iat,
            exp: iat + JWT_LIFETIME_SECS,
            qsh: query_string_hash(method, url),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )?;
        Ok(token)
    }
}

/// Hex encoded SHA-256 of the canonical request.
pub fn query_string_hash(method: &Method, url: &Url) -> String {
    let digest = Sha256::digest(canonical_request(method, url).as_bytes());
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Canonical form of a request used for the `qsh` claim.
///
/// `METHOD&/path&k1=v1&k2=v2`, with the `jwt` parameter excluded and the
/// parameters sorted.
pub fn canonical_request(method: &Method, url: &Url) -> String {
    let raw_path = urlencoding::decode(url.path())
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| url.path().to_string());
    let path = format!("/{}", raw_path.trim_matches('/').replace('&', "%26"));

    let mut grouped: Vec<(String, String)> = Vec::new();
    for (key, value) in url.query_pairs() {
        if key == "jwt" {
            continue;
        }
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, joined)) => joined.push_str(&value),
            None => grouped.push((key.into_owned(), value.into_owned())),
        }
    }

    let mut params: Vec<String> = grouped
        .iter()
        .map(|(key, value)| {
            format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
        })
        .collect();
    params.sort();

    format!(
        "{}&{}&{}",
        method.as_str().to_uppercase(),
        path,
        params.join("&")
    )
}

fn basic_header(username: &str, password: &str) -> String {
    let credentials = format!("{username}:{password}");
    format!("Basic {}", BASE64.encode(credentials.as_bytes()))
}

/// Extract `name=value` from a `Set-Cookie` header, skipping empty values.
fn cookie_pair(header: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    if name.is_empty() || value.is_empty() {
        return None;
    }
    Some(format!("{name}={value}"))
}

fn sensitive(value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|e| OpenProjectError::Auth(format!("invalid header value: {e}")))?;
    header.set_sensitive(true);
    Ok(header)
}
