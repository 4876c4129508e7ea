use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::Url;

use crate::models::{Post, PostIdInput, Session, SessionResponse};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const SESSION_COOKIE: &str = "next-auth.session-token";
const SECURE_SESSION_COOKIE: &str = "__Secure-next-auth.session-token";

/// The two mutations a post card can perform.
///
/// Passed to the card explicitly so tests can substitute a recorder for the
/// HTTP client.
pub trait PostApi: Send + Sync {
    fn add_like(&self, post_id: &str) -> Result<()>;
    fn delete_post(&self, post_id: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    session_token: Option<String>,
    timeout: Duration,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(base_url, None, DEFAULT_TIMEOUT)
    }

    pub fn with_options(
        base_url: impl Into<String>,
        session_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base = sanitize_base_url(base_url.into())?;
        let client = build_client(&base, session_token.as_deref(), timeout)?;
        Ok(Self {
            base_url: base,
            session_token,
            timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_session_token(&self) -> bool {
        self.session_token.is_some()
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<()> {
        let base = sanitize_base_url(base_url.into())?;
        // The cookie name depends on the scheme, so the client is rebuilt.
        self.client = build_client(&base, self.session_token.as_deref(), self.timeout)?;
        self.base_url = base;
        Ok(())
    }

    pub fn list_posts(&self) -> Result<Vec<Post>> {
        let url = self.url("/api/posts")?;
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.json()?)
    }

    pub fn get_post(&self, post_id: &str) -> Result<Post> {
        let url = self.url(&format!("/api/posts/{post_id}"))?;
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.json()?)
    }

    pub fn get_session(&self) -> Result<Option<Session>> {
        let url = self.url("/api/auth/session")?;
        let response = self.client.get(url).send()?.error_for_status()?;
        let body: SessionResponse = response.json()?;
        Ok(body.into_session())
    }

    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }

    /// Resolves an avatar or other asset reference against the API base.
    pub fn resolve_asset_url(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_string()
        } else if reference.starts_with('/') {
            format!("{}{reference}", self.base_url)
        } else {
            format!("{}/{reference}", self.base_url)
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).context("invalid base URL")?;
        url.set_path(path.trim_start_matches('/'));
        Ok(url)
    }
}

impl PostApi for ApiClient {
    fn add_like(&self, post_id: &str) -> Result<()> {
        let url = self.url("/api/addLike")?;
        self.client
            .post(url)
            .json(&PostIdInput::new(post_id))
            .send()?
            .error_for_status()?;
        Ok(())
    }

    fn delete_post(&self, post_id: &str) -> Result<()> {
        let url = self.url("/api/deletePost")?;
        self.client
            .delete(url)
            .json(&PostIdInput::new(post_id))
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

fn build_client(base: &str, session_token: Option<&str>, timeout: Duration) -> Result<Client> {
    let mut headers = HeaderMap::new();
    if let Some(token) = session_token {
        headers.insert(COOKIE, session_cookie(session_cookie_name(base), token)?);
    }
    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .context("failed to build HTTP client")
}

fn session_cookie(name: &str, token: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(&format!("{name}={token}"))
        .context("session token is not a valid cookie value")
}

/// Checks that `token` can be sent as the session cookie.
pub fn validate_session_token(token: &str) -> Result<()> {
    session_cookie(SECURE_SESSION_COOKIE, token).map(|_| ())
}

fn session_cookie_name(base: &str) -> &'static str {
    if base.starts_with("https://") {
        SECURE_SESSION_COOKIE
    } else {
        SESSION_COOKIE
    }
}

pub(crate) fn sanitize_base_url(mut base: String) -> Result<String> {
    base = base.trim().to_string();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    let _ = Url::parse(&base).context("invalid base URL")?;
    Ok(base)
}
