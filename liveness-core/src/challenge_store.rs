//! Challenge Store — a `sled`-backed keyed mapping from challenge id to
//! challenge record, mirroring the reference service's use of a named
//! `sled::Tree` per record kind within one `sled::Db`.
//!
//! `consume` is the one operation that matters for correctness under
//! concurrency: it has to look like a single atomic "read, check, write"
//! to every caller even though two requests for the same id can race.
//! `sled::Tree::fetch_and_update` gives us exactly that — sled retries the
//! closure against a fresh read if the key changed underneath it, so the
//! closure's final invocation is always consistent with what actually gets
//! committed.

use crate::clock::SecureRng;
use crate::error::ChallengeError;
use crate::model::{Challenge, GestureTag};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use std::cell::RefCell;
use std::sync::Arc;

pub struct ChallengeStore {
    tree: sled::Tree,
    rng: Arc<dyn SecureRng>,
}

impl ChallengeStore {
    pub fn new(tree: sled::Tree, rng: Arc<dyn SecureRng>) -> Self {
        Self { tree, rng }
    }

    /// Sample `step_count` distinct tags from `enabled` without replacement
    /// using the injected RNG, then persist a fresh challenge.
    pub fn create(
        &self,
        enabled: &[GestureTag],
        step_count: usize,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<Challenge, ChallengeError> {
        let steps = sample_distinct(enabled, step_count, self.rng.as_ref());
        let challenge = Challenge {
            id: generate_id(self.rng.as_ref()),
            steps,
            created_at: now,
            expires_at: now + ttl,
            used: false,
        };
        let encoded =
            serde_json::to_vec(&challenge).map_err(|e| ChallengeError::Store(e.to_string()))?;
        self.tree
            .insert(challenge.id.as_bytes(), encoded)
            .map_err(|e| ChallengeError::Store(e.to_string()))?;
        Ok(challenge)
    }

    /// Atomically reads, validates, and marks a challenge used. Exactly
    /// one of any number of concurrent callers for the same id observes
    /// `Ok`; the rest see `AlreadyUsed` (or, if the window already closed,
    /// `Expired`).
    pub fn consume(&self, id: &str, now: DateTime<Utc>) -> Result<Challenge, ChallengeError> {
        let outcome: RefCell<Option<Result<Challenge, ChallengeError>>> = RefCell::new(None);

        self.tree
            .fetch_and_update(id.as_bytes(), |existing| match existing {
                None => {
                    *outcome.borrow_mut() = Some(Err(ChallengeError::NotFound));
                    None
                }
                Some(bytes) => match serde_json::from_slice::<Challenge>(bytes) {
                    Err(e) => {
                        *outcome.borrow_mut() = Some(Err(ChallengeError::Store(e.to_string())));
                        Some(bytes.to_vec())
                    }
                    Ok(mut challenge) => {
                        if challenge.used {
                            *outcome.borrow_mut() = Some(Err(ChallengeError::AlreadyUsed));
                            Some(bytes.to_vec())
                        } else if challenge.is_expired(now) {
                            *outcome.borrow_mut() = Some(Err(ChallengeError::Expired));
                            Some(bytes.to_vec())
                        } else {
                            challenge.used = true;
                            let encoded = serde_json::to_vec(&challenge)
                                .expect("a Challenge always serializes");
                            *outcome.borrow_mut() = Some(Ok(challenge));
                            Some(encoded)
                        }
                    }
                },
            })
            .map_err(|e| ChallengeError::Store(e.to_string()))?;

        outcome
            .into_inner()
            .unwrap_or(Err(ChallengeError::NotFound))
    }

    /// Best-effort deletion of rows past their grace window. Never runs on
    /// the request path; errors are swallowed by the caller (the
    /// background sweep job logs and moves on).
    pub fn sweep(&self, now: DateTime<Utc>, grace: Duration) -> Result<usize, ChallengeError> {
        let mut removed = 0usize;
        for entry in self.tree.iter() {
            let (key, bytes) = entry.map_err(|e| ChallengeError::Store(e.to_string()))?;
            let Ok(challenge) = serde_json::from_slice::<Challenge>(&bytes) else {
                continue;
            };
            if now >= challenge.expires_at + grace {
                self.tree
                    .remove(key)
                    .map_err(|e| ChallengeError::Store(e.to_string()))?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn generate_id(rng: &dyn SecureRng) -> String {
    let mut bytes = [0u8; 16]; // 128 bits, comfortably above the 122-bit floor
    rng.fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn sample_distinct(pool: &[GestureTag], count: usize, rng: &dyn SecureRng) -> Vec<GestureTag> {
    let mut remaining: Vec<GestureTag> = pool.to_vec();
    let mut sampled = Vec::with_capacity(count.min(remaining.len()));
    while sampled.len() < count && !remaining.is_empty() {
        let mut idx_byte = [0u8; 8];
        rng.fill(&mut idx_byte);
        let idx = (u64::from_le_bytes(idx_byte) as usize) % remaining.len();
        sampled.push(remaining.swap_remove(idx));
    }
    sampled
}
