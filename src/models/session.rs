use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub const USER_SESSION_KEY: &str = "rh_user_session";
pub const ADMIN_SESSION_KEY: &str = "admin_session";

/// Admin sessions are valid for 24 hours after creation.
pub const ADMIN_SESSION_MAX_AGE_MS: i64 = 24 * 60 * 60 * 1000;

/// A record the session store can persist. Each kind lives under its own fixed key.
pub trait SessionRecord: Serialize + DeserializeOwned {
    const KEY: &'static str;
    /// Lifetime after issue, if the record kind has one.
    const MAX_AGE_MS: Option<i64> = None;
}

/// The signed-in user, without the password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ativo: Option<String>,
    /// `"admin"` when an administrator opened the tools dashboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl SessionRecord for UserSession {
    const KEY: &'static str = USER_SESSION_KEY;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSession {
    pub email: String,
    pub is_admin: bool,
    #[serde(default)]
    pub name: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl AdminSession {
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp > ADMIN_SESSION_MAX_AGE_MS
    }
}

impl SessionRecord for AdminSession {
    const KEY: &'static str = ADMIN_SESSION_KEY;
    const MAX_AGE_MS: Option<i64> = Some(ADMIN_SESSION_MAX_AGE_MS);
}
