use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use log::warn;
use serde_json::Value;

use crate::storage::Storage;
use crate::types::token::{Credentials, TokenClaims};

const ACCESS_KEY: &str = "access_token";
const REFRESH_KEY: &str = "refresh_token";
const USER_KEY: &str = "user_info";

const ADMIN_ROLES: [&str; 1] = ["ADMIN"];
const CLIENT_ROLES: [&str; 2] = ["CLIENT", "USER"];

/// Persists credentials and the cached user profile, and answers role
/// questions by decoding the access token payload.
///
/// Storage faults never surface to callers: reads degrade to `None` and
/// writes log a warning, because a broken token cache must not take the
/// whole client down with it.
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Writes whichever tokens are present and non-empty. An omitted or
    /// empty field never blanks a previously stored value.
    pub fn set_credentials(&self, credentials: &Credentials) {
        if let Some(token) = non_empty(credentials.access_token.as_deref()) {
            self.write(ACCESS_KEY, token);
        }
        if let Some(token) = non_empty(credentials.refresh_token.as_deref()) {
            self.write(REFRESH_KEY, token);
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_KEY)
    }

    /// Removes tokens and the cached user. Idempotent.
    pub fn clear_all(&self) {
        self.delete(ACCESS_KEY);
        self.delete(REFRESH_KEY);
        self.delete(USER_KEY);
    }

    /// True iff an access token is stored. No expiry or validity check,
    /// the backend is the authority on both.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    pub fn set_user(&self, user: &Value) {
        match serde_json::to_string(user) {
            Ok(encoded) => self.write(USER_KEY, &encoded),
            Err(err) => warn!("Failed to encode user profile: {err:#}"),
        }
    }

    /// Cached profile, or `None` when absent or stored malformed.
    pub fn user(&self) -> Option<Value> {
        let encoded = self.read(USER_KEY)?;
        serde_json::from_str(&encoded).ok()
    }

    /// Decodes the claims segment of a JWT-like token: the second
    /// dot-separated segment, base64url without padding, holding JSON.
    /// Returns `None` on any malformed or foreign-format input, this must
    /// never panic or error out of a role check.
    pub fn decode_claims(&self, token: &str) -> Option<Value> {
        let segment = token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(segment).ok()?;
        let payload = String::from_utf8(bytes).ok()?;
        serde_json::from_str(&payload).ok()
    }

    pub fn user_role(&self) -> Option<String> {
        let token = self.access_token()?;
        let claims = self.decode_claims(&token)?;
        claims
            .get("roleName")
            .and_then(Value::as_str)
            .or_else(|| claims.get("role").and_then(Value::as_str))
            .map(String::from)
    }

    pub fn is_admin(&self) -> bool {
        self.role_in(&ADMIN_ROLES)
    }

    pub fn is_client(&self) -> bool {
        self.role_in(&CLIENT_ROLES)
    }

    /// Typed identity hints from the access token, `None` when no token
    /// is stored or its payload does not decode.
    pub fn user_from_token(&self) -> Option<TokenClaims> {
        let token = self.access_token()?;
        let claims = self.decode_claims(&token)?;
        serde_json::from_value(claims).ok()
    }

    fn role_in(&self, roles: &[&str]) -> bool {
        match self.user_role() {
            Some(role) => roles.iter().any(|r| role.eq_ignore_ascii_case(r)),
            None => false,
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("Failed to read '{key}' from storage: {err:#}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.storage.set(key, value) {
            warn!("Failed to write '{key}' to storage: {err:#}");
        }
    }

    fn delete(&self, key: &str) {
        if let Err(err) = self.storage.remove(key) {
            warn!("Failed to remove '{key}' from storage: {err:#}");
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::storage::MemoryStorage;

    use super::*;

    fn new_store() -> TokenStore {
        TokenStore::new(Arc::new(MemoryStorage::new()))
    }

    /// Builds a structurally valid token around the given claims. The
    /// header and signature segments are junk on purpose, nothing here
    /// verifies them.
    fn fake_token(claims: &Value) -> String {
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("header.{payload}.signature")
    }

    #[test]
    fn test_set_credentials_merge() {
        let store = new_store();
        store.set_credentials(&Credentials::new(Some("t1".to_string()), None));
        store.set_credentials(&Credentials::new(None, Some("r1".to_string())));

        assert_eq!(store.access_token().as_deref(), Some("t1"));
        assert_eq!(store.refresh_token().as_deref(), Some("r1"));

        // Empty strings must not blank stored values either.
        store.set_credentials(&Credentials::new(Some(String::new()), None));
        assert_eq!(store.access_token().as_deref(), Some("t1"));
    }

    #[test]
    fn test_clear_all() {
        let store = new_store();
        store.set_credentials(&Credentials::new(
            Some("t1".to_string()),
            Some("r1".to_string()),
        ));
        store.set_user(&json!({"id": 1}));
        assert!(store.is_authenticated());

        store.clear_all();
        assert!(!store.is_authenticated());
        assert_eq!(store.refresh_token(), None);
        assert_eq!(store.user(), None);

        // Idempotent.
        store.clear_all();
    }

    #[test]
    fn test_user_roundtrip() {
        let store = new_store();
        assert_eq!(store.user(), None);

        let user = json!({"id": 7, "email": "a@b.c"});
        store.set_user(&user);
        assert_eq!(store.user(), Some(user));
    }

    #[test]
    fn test_user_malformed() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(USER_KEY, "{broken").unwrap();
        let store = TokenStore::new(storage);
        assert_eq!(store.user(), None);
    }

    #[test]
    fn test_decode_claims() {
        let store = new_store();
        let claims = json!({"userId": "u1", "roleName": "ADMIN"});
        let decoded = store.decode_claims(&fake_token(&claims)).unwrap();
        assert_eq!(decoded, claims);

        assert_eq!(store.decode_claims("not.a.jwt"), None);
        assert_eq!(store.decode_claims("noseparators"), None);
        assert_eq!(store.decode_claims(""), None);
    }

    #[test]
    fn test_roles() {
        let store = new_store();
        assert_eq!(store.user_role(), None);
        assert!(!store.is_admin());
        assert!(!store.is_client());

        let token = fake_token(&json!({"roleName": "admin"}));
        store.set_credentials(&Credentials::new(Some(token), None));
        assert_eq!(store.user_role().as_deref(), Some("admin"));
        assert!(store.is_admin());
        assert!(!store.is_client());

        // The plain `role` key is the fallback claim.
        let token = fake_token(&json!({"role": "USER"}));
        store.set_credentials(&Credentials::new(Some(token), None));
        assert!(store.is_client());
        assert!(!store.is_admin());
    }

    #[test]
    fn test_user_from_token() {
        let store = new_store();
        assert!(store.user_from_token().is_none());

        let token = fake_token(&json!({
            "userId": 42,
            "email": "a@b.c",
            "roleName": "CLIENT",
            "deviceId": "d-1",
        }));
        store.set_credentials(&Credentials::new(Some(token), None));

        let claims = store.user_from_token().unwrap();
        assert_eq!(claims.user_id, Some(json!(42)));
        assert_eq!(claims.email.as_deref(), Some("a@b.c"));
        assert_eq!(claims.role_name.as_deref(), Some("CLIENT"));
        assert_eq!(claims.role_id, None);
        assert_eq!(claims.device_id.as_deref(), Some("d-1"));
    }
}
