//! Token Service — issues signed bearer tokens on a successful
//! verification and validates them on demand.
//!
//! Validation is a dual check, deliberately: the JWT signature makes a
//! token cheap to reject early without touching storage, while the sled
//! lookup by digest is what makes server-side revocation possible and
//! rejects a token whose signature verifies but whose record was deleted
//! or revoked. Neither check alone is sufficient.

use crate::error::TokenError;
use crate::model::TokenRecord;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

pub struct TokenService {
    tree: sled::Tree,
    secret: String,
}

impl TokenService {
    pub fn new(tree: sled::Tree, secret: String) -> Self {
        Self { tree, secret }
    }

    pub fn issue(
        &self,
        subject: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<(String, TokenRecord), TokenError> {
        let expires_at = now + ttl;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Store(e.to_string()))?;

        let record = TokenRecord {
            subject: subject.to_string(),
            issued_at: now,
            expires_at,
            revoked: false,
        };
        let encoded =
            serde_json::to_vec(&record).map_err(|e| TokenError::Store(e.to_string()))?;
        self.tree
            .insert(digest(&token), encoded)
            .map_err(|e| TokenError::Store(e.to_string()))?;

        Ok((token, record))
    }

    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        self.validate_record(token, now).map(|record| record.subject)
    }

    /// Same checks as [`validate`](Self::validate), but returns the full
    /// persisted record rather than just the subject — used by the
    /// protected-resource endpoint, which echoes `issued_at`/`expires_at`
    /// back to the caller.
    pub fn validate_record(&self, token: &str, now: DateTime<Utc>) -> Result<TokenRecord, TokenError> {
        // Signature first: cheap, and rejects a forged token before touching
        // storage. `exp` is checked separately against the injected clock
        // rather than jsonwebtoken's own wall-clock check, so expiry is
        // deterministic under a `FixedClock` in tests.
        let mut validation = Validation::default();
        validation.validate_exp = false;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| TokenError::InvalidSignature)?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        let bytes = self
            .tree
            .get(digest(token))
            .map_err(|e| TokenError::Store(e.to_string()))?
            .ok_or(TokenError::Unknown)?;
        let record: TokenRecord =
            serde_json::from_slice(&bytes).map_err(|e| TokenError::Store(e.to_string()))?;

        if record.revoked {
            return Err(TokenError::Revoked);
        }
        if now >= record.expires_at {
            return Err(TokenError::Expired);
        }

        Ok(record)
    }

    pub fn revoke(&self, token: &str) -> Result<(), TokenError> {
        let key = digest(token);
        let bytes = self
            .tree
            .get(&key)
            .map_err(|e| TokenError::Store(e.to_string()))?
            .ok_or(TokenError::Unknown)?;
        let mut record: TokenRecord =
            serde_json::from_slice(&bytes).map_err(|e| TokenError::Store(e.to_string()))?;
        record.revoked = true;
        let encoded =
            serde_json::to_vec(&record).map_err(|e| TokenError::Store(e.to_string()))?;
        self.tree
            .insert(key, encoded)
            .map_err(|e| TokenError::Store(e.to_string()))?;
        Ok(())
    }
}

fn digest(token: &str) -> Vec<u8> {
    Sha256::digest(token.as_bytes()).to_vec()
}
