use std::sync::Arc;

use anyhow::Result;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

use crate::api::Api;
use crate::client::{HttpGateway, RequestOptions};
use crate::token::TokenStore;
use crate::types::token::Credentials;

use super::Outcome;

/// Key paths checked, in order, when an auth response carries tokens.
/// Backends in this ecosystem put them in several different places.
const ACCESS_TOKEN_PATHS: [&[&str]; 5] = [
    &["accessToken"],
    &["token"],
    &["jwt"],
    &["data", "accessToken"],
    &["data", "token"],
];
const REFRESH_TOKEN_PATHS: [&[&str]; 2] = [&["refreshToken"], &["data", "refreshToken"]];

/// Account and session operations. Every method reports via [`Outcome`]:
/// an HTTP-level failure is `success == false`, not an error. Responses
/// carrying tokens or a user object are written through to the token
/// store before the outcome returns.
pub struct AuthService {
    gateway: Arc<HttpGateway>,
    api: Api,
    store: Arc<TokenStore>,
}

impl AuthService {
    pub fn new(gateway: Arc<HttpGateway>, api: Api, store: Arc<TokenStore>) -> Self {
        Self {
            gateway,
            api,
            store,
        }
    }

    pub async fn register(&self, body: Value) -> Result<Outcome> {
        self.simple(self.api.auth_register(), RequestOptions::post(body), "Account created")
            .await
    }

    pub async fn send_otp(&self, body: Value) -> Result<Outcome> {
        self.simple(self.api.auth_send_otp(), RequestOptions::post(body), "OTP sent")
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Outcome> {
        let body = json!({"email": email, "password": password});
        let envelope = self
            .gateway
            .request(&self.api.auth_login(), RequestOptions::post(body))
            .await?;
        if !envelope.ok {
            return Ok(Outcome::fail(&envelope));
        }

        let payload = envelope.data;
        let access = first_string(&payload, &ACCESS_TOKEN_PATHS);
        let refresh = first_string(&payload, &REFRESH_TOKEN_PATHS);
        self.store
            .set_credentials(&Credentials::new(access, refresh));

        if let Some(user) = user_in(&payload) {
            self.store.set_user(user);
        }

        let message = first_string(&payload, &[&["message"], &["data", "message"]])
            .unwrap_or_else(|| String::from("Signed in"));
        Ok(Outcome::ok(Some(message), Some(payload)))
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Outcome> {
        let body = json!({"refreshToken": refresh_token});
        let envelope = self
            .gateway
            .request(&self.api.auth_refresh_token(), RequestOptions::post(body))
            .await?;
        if !envelope.ok {
            return Ok(Outcome::fail(&envelope));
        }

        let payload = envelope.data;
        let access = first_string(&payload, &[&["accessToken"], &["data", "accessToken"]]);
        let rotated = first_string(&payload, &REFRESH_TOKEN_PATHS);

        // Only store when the backend actually produced a new access
        // token; a refresh that rotates nothing must not blank anything.
        if access.is_some() {
            let refresh = rotated.or_else(|| Some(refresh_token.to_string()));
            self.store.set_credentials(&Credentials::new(access, refresh));
        }

        Ok(Outcome::ok(None, Some(payload)))
    }

    /// Ends the session. Local credentials are wiped no matter what the
    /// backend says, a dead session on the server must not keep a live
    /// one on the client.
    pub async fn logout(&self, refresh_token: &str) -> Result<Outcome> {
        let body = json!({"refreshToken": refresh_token});
        let envelope = self
            .gateway
            .request(
                &self.api.auth_logout(),
                RequestOptions::post(body).with_auth(),
            )
            .await?;

        self.store.clear_all();

        if !envelope.ok {
            return Ok(Outcome::fail(&envelope));
        }

        let message = first_string(&envelope.data, &[&["message"]])
            .unwrap_or_else(|| String::from("Signed out"));
        Ok(Outcome::ok(Some(message), None))
    }

    pub async fn forgot_password(&self, body: Value) -> Result<Outcome> {
        self.simple(
            self.api.auth_forgot_password(),
            RequestOptions::post(body),
            "Password reset email sent",
        )
        .await
    }

    pub async fn reset_password(&self, body: Value) -> Result<Outcome> {
        self.simple(
            self.api.auth_reset_password(),
            RequestOptions::post(body),
            "Password has been reset",
        )
        .await
    }

    pub async fn profile(&self) -> Result<Outcome> {
        let envelope = self
            .gateway
            .request(&self.api.auth_profile(), RequestOptions::get().with_auth())
            .await?;
        if !envelope.ok {
            return Ok(Outcome::fail(&envelope));
        }

        let payload = envelope.data;
        let user = user_in(&payload).unwrap_or(&payload).clone();
        self.store.set_user(&user);

        Ok(Outcome::ok(None, Some(user)))
    }

    pub async fn update_profile(&self, body: Value) -> Result<Outcome> {
        let envelope = self
            .gateway
            .request(
                &self.api.auth_profile(),
                RequestOptions::patch(Some(body)).with_auth(),
            )
            .await?;
        if !envelope.ok {
            return Ok(Outcome::fail(&envelope));
        }

        let payload = envelope.data;
        let user = user_in(&payload).unwrap_or(&payload).clone();
        self.store.set_user(&user);

        let message = first_string(&payload, &[&["message"]])
            .unwrap_or_else(|| String::from("Profile updated"));
        Ok(Outcome::ok(Some(message), Some(user)))
    }

    pub async fn upload_avatar(&self, file_name: &str, data: Vec<u8>) -> Result<Outcome> {
        let part = Part::bytes(data).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let envelope = self
            .gateway
            .upload(&self.api.auth_avatar(), form, true)
            .await?;
        if !envelope.ok {
            let message = first_string(&envelope.data, &[&["message"]])
                .unwrap_or_else(|| String::from("Unable to upload avatar"));
            return Ok(Outcome {
                success: false,
                message: Some(message),
                errors: envelope.errors,
                data: None,
            });
        }

        let avatar_url = first_string(&envelope.data, &[&["avatarUrl"], &["data", "avatarUrl"]]);
        let message = first_string(&envelope.data, &[&["message"]])
            .unwrap_or_else(|| String::from("Avatar uploaded"));
        Ok(Outcome::ok(
            Some(message),
            Some(json!({"avatarUrl": avatar_url})),
        ))
    }

    pub async fn all_users(&self) -> Result<Outcome> {
        let envelope = self
            .gateway
            .request(&self.api.auth_users(), RequestOptions::get().with_auth())
            .await?;
        if !envelope.ok {
            return Ok(Outcome::fail(&envelope));
        }

        let payload = envelope.data;
        let users = payload
            .get("users")
            .or_else(|| payload.get("data").and_then(|d| d.get("users")))
            .cloned()
            .unwrap_or(payload);
        Ok(Outcome::ok(None, Some(users)))
    }

    pub async fn lock_user(&self, user_id: &str, body: Value) -> Result<Outcome> {
        self.simple(
            self.api.auth_lock_user(user_id),
            RequestOptions::put(Some(body)).with_auth(),
            "User locked",
        )
        .await
    }

    pub async fn unlock_user(&self, user_id: &str) -> Result<Outcome> {
        self.simple(
            self.api.auth_unlock_user(user_id),
            RequestOptions::put(None).with_auth(),
            "User unlocked",
        )
        .await
    }

    pub async fn mark_violation(&self, user_id: &str, body: Value) -> Result<Outcome> {
        self.simple(
            self.api.auth_violations(user_id),
            RequestOptions::post(body).with_auth(),
            "Violation recorded",
        )
        .await
    }

    /// Shared shape of the plain endpoints: failure envelope becomes a
    /// soft failure, success carries the payload and its message (or the
    /// per-operation default).
    async fn simple(
        &self,
        url: String,
        opts: RequestOptions,
        default_message: &str,
    ) -> Result<Outcome> {
        let envelope = self.gateway.request(&url, opts).await?;
        if !envelope.ok {
            return Ok(Outcome::fail(&envelope));
        }

        let message = first_string(&envelope.data, &[&["message"]])
            .unwrap_or_else(|| default_message.to_string());
        Ok(Outcome::ok(Some(message), Some(envelope.data)))
    }
}

fn user_in(payload: &Value) -> Option<&Value> {
    payload
        .get("user")
        .or_else(|| payload.get("data").and_then(|d| d.get("user")))
}

fn string_at(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    current
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn first_string(value: &Value, paths: &[&[&str]]) -> Option<String> {
    paths.iter().find_map(|path| string_at(value, path))
}
