use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tokens issued by the auth endpoints. Either field may be absent when a
/// response only rotates one of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Identity hints carried in the access token payload. Decoded
/// structurally, never verified; any field the backend omits is `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    // Ids are kept as raw values, backends disagree on number vs string.
    pub user_id: Option<Value>,
    pub email: Option<String>,
    pub role_name: Option<String>,
    pub role_id: Option<Value>,
    pub device_id: Option<String>,
}

impl Credentials {
    pub fn new(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }
}
