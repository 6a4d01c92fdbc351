//! Per-user session state.
//!
//! Sessions are keyed by the author's display name and live for the
//! lifetime of the process. Nothing here is persisted.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use fatebot_domain::FateRoll;

use crate::commands::args::CommandArgs;
use crate::commands::definition::HandlerId;

/// The entity a user plays, plus the handle used to ping them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub entity: String,
    pub mention: String,
}

/// A targeted command that could not find a target, kept for `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingInvocation {
    pub handler: HandlerId,
    pub args: CommandArgs,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSession {
    pub claim: Option<Claim>,
    pub last_roll: Option<FateRoll>,
    pub pending: Option<PendingInvocation>,
}

/// Process-wide session store.
///
/// Map entries are only borrowed inside synchronous sections; every await
/// happens on a cloned `Arc<Mutex>` after the entry guard is gone.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, UserSession>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize invocations of one user. Other users are unaffected.
    pub async fn lock_user(&self, user: &str) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(user.to_string()).or_default().clone();
        lock.lock_owned().await
    }

    pub fn claim(&self, user: &str, entity: impl Into<String>, mention: impl Into<String>) {
        self.sessions.entry(user.to_string()).or_default().claim = Some(Claim {
            entity: entity.into(),
            mention: mention.into(),
        });
    }

    /// Drop the user's claim, returning it if there was one.
    pub fn unclaim(&self, user: &str) -> Option<Claim> {
        self.sessions
            .get_mut(user)
            .and_then(|mut session| session.claim.take())
    }

    pub fn claimed(&self, user: &str) -> Option<Claim> {
        self.sessions
            .get(user)
            .and_then(|session| session.claim.clone())
    }

    /// Every active claim as `(user, claim)`, sorted by user.
    pub fn claims(&self) -> Vec<(String, Claim)> {
        let mut claims: Vec<(String, Claim)> = self
            .sessions
            .iter()
            .filter_map(|entry| {
                entry
                    .value()
                    .claim
                    .clone()
                    .map(|claim| (entry.key().clone(), claim))
            })
            .collect();
        claims.sort_by(|a, b| a.0.cmp(&b.0));
        claims
    }

    /// Who plays `entity`, if anyone. Compared case-insensitively.
    pub fn claimant_of(&self, entity: &str) -> Option<(String, Claim)> {
        self.claims()
            .into_iter()
            .find(|(_, claim)| claim.entity.eq_ignore_ascii_case(entity))
    }

    pub fn set_last_roll(&self, user: &str, roll: FateRoll) {
        self.sessions.entry(user.to_string()).or_default().last_roll = Some(roll);
    }

    pub fn last_roll(&self, user: &str) -> Option<FateRoll> {
        self.sessions
            .get(user)
            .and_then(|session| session.last_roll.clone())
    }

    /// Store the invocation waiting for a target, replacing any older one.
    pub fn set_pending(&self, user: &str, pending: PendingInvocation) {
        self.sessions.entry(user.to_string()).or_default().pending = Some(pending);
    }

    pub fn pending(&self, user: &str) -> Option<PendingInvocation> {
        self.sessions
            .get(user)
            .and_then(|session| session.pending.clone())
    }

    pub fn clear_pending(&self, user: &str) -> Option<PendingInvocation> {
        self.sessions
            .get_mut(user)
            .and_then(|mut session| session.pending.take())
    }

    pub fn session(&self, user: &str) -> UserSession {
        self.sessions
            .get(user)
            .map(|session| session.clone())
            .unwrap_or_default()
    }
}
