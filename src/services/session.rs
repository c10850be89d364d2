// src/services/session.rs
// A saved record is sealed into an HS256 token whose audience is the record's
// fixed key, so a user token never loads as an admin session and vice versa.
// Tokens also carry the issuing store's epoch. A restarted process has a new
// epoch and rejects everything issued before it, including cleared tokens
// whose revocation lived only in the old process.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::session::SessionRecord;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to encode session: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    jti: String,
    aud: String,
    epoch: String,
    iat_ms: i64,
    data: T,
}

pub struct SessionStore {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    epoch: String,
    /// Revoked token ids, with the time after which the token is dead anyway.
    revoked: Mutex<HashMap<String, Option<i64>>>,
}

impl SessionStore {
    pub fn new(secret: &[u8]) -> Self {
        SessionStore {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            epoch: Uuid::new_v4().to_string(),
            revoked: Mutex::new(HashMap::new()),
        }
    }

    /// Serializes `record` under its key and returns the token the client keeps.
    pub fn save<T: SessionRecord>(&self, record: &T) -> Result<String, SessionError> {
        self.save_at(record, Utc::now().timestamp_millis())
    }

    pub fn save_at<T: SessionRecord>(&self, record: &T, now_ms: i64) -> Result<String, SessionError> {
        let envelope = Envelope {
            jti: Uuid::new_v4().to_string(),
            aud: T::KEY.to_string(),
            epoch: self.epoch.clone(),
            iat_ms: now_ms,
            data: record,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &envelope, &self.encoding_key)?)
    }

    /// `None` when the token is absent, unreadable, issued for another key,
    /// issued by an earlier process, past the record's lifetime, or cleared.
    pub async fn load<T: SessionRecord>(&self, token: Option<&str>) -> Option<T> {
        self.load_at(token, Utc::now().timestamp_millis()).await
    }

    pub async fn load_at<T: SessionRecord>(&self, token: Option<&str>, now_ms: i64) -> Option<T> {
        let envelope = self.open::<T>(token?, now_ms)?;
        if self.revoked.lock().await.contains_key(&envelope.jti) {
            return None;
        }
        Some(envelope.data)
    }

    pub async fn clear<T: SessionRecord>(&self, token: Option<&str>) {
        self.clear_at::<T>(token, Utc::now().timestamp_millis()).await
    }

    /// Revokes the token and drops revocations of tokens that can no longer
    /// load because their lifetime has passed.
    pub async fn clear_at<T: SessionRecord>(&self, token: Option<&str>, now_ms: i64) {
        let Some(envelope) = token.and_then(|t| self.open::<T>(t, now_ms)) else {
            return;
        };
        let dead_after = T::MAX_AGE_MS.map(|max| envelope.iat_ms.saturating_add(max));

        let mut revoked = self.revoked.lock().await;
        revoked.retain(|_, dead| dead.map_or(true, |at| at >= now_ms));
        revoked.insert(envelope.jti, dead_after);
        tracing::debug!(key = T::KEY, revoked = revoked.len(), "session cleared");
    }

    #[cfg(test)]
    async fn revoked_count(&self) -> usize {
        self.revoked.lock().await.len()
    }

    fn open<T: SessionRecord>(&self, token: &str, now_ms: i64) -> Option<Envelope<T>> {
        // Record lifetimes are checked below against `iat_ms`, not `exp`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[T::KEY]);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::from(["aud".to_string()]);

        let envelope = match decode::<Envelope<T>>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(key = T::KEY, error = %e, "discarding unreadable session");
                return None;
            }
        };
        if envelope.epoch != self.epoch {
            tracing::debug!(key = T::KEY, "discarding session from an earlier process");
            return None;
        }
        if T::MAX_AGE_MS.is_some_and(|max| now_ms.saturating_sub(envelope.iat_ms) > max) {
            tracing::debug!(key = T::KEY, "discarding session past its lifetime");
            return None;
        }
        Some(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::{AdminSession, UserSession, ADMIN_SESSION_MAX_AGE_MS};

    const NOW: i64 = 1_700_000_000_000;

    fn store() -> SessionStore {
        SessionStore::new(b"test-secret")
    }

    fn ana() -> UserSession {
        UserSession {
            unique_id: Some("u1".to_string()),
            name: "Ana".to_string(),
            email: "ana@rh.com".to_string(),
            ativo: Some("true".to_string()),
            role: None,
        }
    }

    #[tokio::test]
    async fn save_then_load_returns_record() {
        let store = store();
        let token = store.save(&ana()).expect("save");
        assert_eq!(store.load::<UserSession>(Some(&token)).await, Some(ana()));
    }

    #[tokio::test]
    async fn absent_or_garbage_token_loads_nothing() {
        let store = store();
        assert_eq!(store.load::<UserSession>(None).await, None);
        assert_eq!(store.load::<UserSession>(Some("not-a-token")).await, None);
    }

    #[tokio::test]
    async fn token_from_another_key_loads_nothing() {
        let store = store();
        let token = store.save(&ana()).expect("save");
        assert_eq!(store.load::<AdminSession>(Some(&token)).await, None);
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_loads_nothing() {
        let token = SessionStore::new(b"other").save(&ana()).expect("save");
        assert_eq!(store().load::<UserSession>(Some(&token)).await, None);
    }

    #[tokio::test]
    async fn clear_revokes_only_that_token() {
        let store = store();
        let first = store.save(&ana()).expect("save");
        let second = store.save(&ana()).expect("save");

        store.clear::<UserSession>(Some(&first)).await;

        assert_eq!(store.load::<UserSession>(Some(&first)).await, None);
        assert!(store.load::<UserSession>(Some(&second)).await.is_some());
    }

    #[tokio::test]
    async fn cleared_token_stays_dead_after_restart() {
        let before = SessionStore::new(b"test-secret");
        let token = before.save(&ana()).expect("save");
        before.clear::<UserSession>(Some(&token)).await;

        let after = SessionStore::new(b"test-secret");
        assert_eq!(after.load::<UserSession>(Some(&token)).await, None);
    }

    #[tokio::test]
    async fn token_from_an_earlier_process_loads_nothing() {
        let token = SessionStore::new(b"test-secret").save(&ana()).expect("save");
        assert_eq!(store().load::<UserSession>(Some(&token)).await, None);
    }

    fn admin(timestamp: i64) -> AdminSession {
        AdminSession {
            email: "admin@rh.com".to_string(),
            is_admin: true,
            name: "Administrador".to_string(),
            timestamp,
        }
    }

    #[tokio::test]
    async fn admin_token_past_a_day_loads_nothing() {
        let store = store();
        let token = store.save_at(&admin(NOW), NOW).expect("save");
        assert!(store.load_at::<AdminSession>(Some(&token), NOW + ADMIN_SESSION_MAX_AGE_MS).await.is_some());
        assert_eq!(
            store.load_at::<AdminSession>(Some(&token), NOW + ADMIN_SESSION_MAX_AGE_MS + 1).await,
            None
        );
    }

    #[tokio::test]
    async fn expired_admin_revocations_are_pruned() {
        let store = store();
        let old = store.save_at(&admin(NOW), NOW).expect("save");
        let user = store.save_at(&ana(), NOW).expect("save");
        store.clear_at::<AdminSession>(Some(&old), NOW + 1).await;
        store.clear_at::<UserSession>(Some(&user), NOW + 1).await;
        assert_eq!(store.revoked_count().await, 2);

        let later = NOW + ADMIN_SESSION_MAX_AGE_MS + 10;
        let fresh = store.save_at(&admin(later), later).expect("save");
        store.clear_at::<AdminSession>(Some(&fresh), later).await;

        // The day-old admin id is gone; the user id and the new one remain.
        assert_eq!(store.revoked_count().await, 2);
        assert_eq!(store.load_at::<AdminSession>(Some(&old), later).await, None);
        assert_eq!(store.load_at::<UserSession>(Some(&user), later).await, None);
    }

    #[tokio::test]
    async fn clearing_nothing_is_harmless() {
        let store = store();
        store.clear::<UserSession>(None).await;
        store.clear::<UserSession>(Some("garbage")).await;
    }
}
