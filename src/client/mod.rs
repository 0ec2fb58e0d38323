pub mod factory;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::Method;
use serde_json::Value;

use crate::nav::{navigate_later, Navigator};
use crate::notify::Notifier;
use crate::token::TokenStore;
use crate::types::response::{normalize, Envelope};

pub const MIME_JSON: &str = "application/json";

/// Options for one gateway call. `with_auth` is an explicit, per-call
/// decision: a missing token on an authenticated call still goes out on
/// the wire unauthenticated and lets the backend reject it.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
    pub with_auth: bool,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn put(body: Option<Value>) -> Self {
        Self {
            method: Method::PUT,
            body,
            ..Self::default()
        }
    }

    pub fn patch(body: Option<Value>) -> Self {
        Self {
            method: Method::PATCH,
            body,
            ..Self::default()
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    pub fn with_auth(mut self) -> Self {
        self.with_auth = true;
        self
    }
}

/// Issues HTTP calls and shapes every response into an [`Envelope`].
///
/// Transport failures (DNS, refused connection, aborted read) propagate
/// as errors; anything that produced an HTTP status comes back as an
/// envelope, failed or not. A 401 on an authenticated call additionally
/// wipes stored credentials and schedules a deferred navigation to the
/// login page, without changing what the caller gets back.
pub struct HttpGateway {
    client: reqwest::Client,
    store: Arc<TokenStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    login_page: String,
    redirect_delay: Duration,
}

impl HttpGateway {
    pub fn new(
        store: Arc<TokenStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        login_page: String,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            store,
            navigator,
            notifier,
            login_page,
            redirect_delay,
        }
    }

    pub async fn request(&self, url: &str, opts: RequestOptions) -> Result<Envelope> {
        debug!("Request {} '{url}'", opts.method);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(MIME_JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(MIME_JSON));
        for (name, value) in &opts.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("invalid header name '{name}'"))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("invalid value for header '{name}'"))?;
            headers.insert(name, value);
        }

        let mut req = self.client.request(opts.method, url).headers(headers);
        if opts.with_auth {
            if let Some(token) = self.store.access_token() {
                req = req.header(AUTHORIZATION, format!("Bearer {token}"));
            }
        }
        if let Some(body) = &opts.body {
            req = req.body(serde_json::to_string(body).context("encode request body")?);
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("request '{url}'"))?;
        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .with_context(|| format!("read response body from '{url}'"))?;

        let envelope = normalize(status, &text);
        self.handle_unauthorized(opts.with_auth, &envelope);
        Ok(envelope)
    }

    /// Multipart variant for file uploads. No JSON content type is set,
    /// the multipart boundary header comes from the form itself.
    pub async fn upload(&self, url: &str, form: Form, with_auth: bool) -> Result<Envelope> {
        debug!("Upload to '{url}'");

        let mut req = self.client.post(url).multipart(form);
        if with_auth {
            if let Some(token) = self.store.access_token() {
                req = req.header(AUTHORIZATION, format!("Bearer {token}"));
            }
        }

        let resp = req.send().await.with_context(|| format!("upload '{url}'"))?;
        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .with_context(|| format!("read response body from '{url}'"))?;

        let envelope = normalize(status, &text);
        self.handle_unauthorized(with_auth, &envelope);
        Ok(envelope)
    }

    /// Fire-and-forget: the envelope still flows back to the caller so it
    /// can render its own failure message before the redirect lands.
    fn handle_unauthorized(&self, with_auth: bool, envelope: &Envelope) {
        if !with_auth || envelope.status != 401 {
            return;
        }

        warn!("Unauthorized response, clearing stored credentials");
        self.store.clear_all();
        self.notifier
            .warn("Your session has expired, please sign in again");

        navigate_later(
            self.navigator.clone(),
            &self.login_page,
            self.redirect_delay,
        );
    }
}
