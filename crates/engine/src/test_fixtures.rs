//! Shared builders for engine tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use fatebot_shared::{ChatMessage, EntityView, GameSnapshot, MentionTarget, StressTrackView};
use tokio_util::sync::CancellationToken;

use crate::app::Services;
use crate::infrastructure::ports::{BackendPort, MockBackendPort, RandomPort};
use crate::infrastructure::random::FixedRandom;
use crate::infrastructure::settings::BotSettings;
use crate::stores::SessionStore;

pub fn message(author: &str, text: &str) -> ChatMessage {
    ChatMessage {
        text: text.to_string(),
        author_display_name: author.to_string(),
        author_mention: format!("<@{}>", author.to_lowercase()),
        explicit_mentions: Vec::new(),
        author_roles: Vec::new(),
    }
}

pub fn mention(display_name: &str) -> MentionTarget {
    MentionTarget {
        display_name: display_name.to_string(),
        mention: format!("<@{}>", display_name.to_lowercase()),
    }
}

pub fn entity(name: &str, fate: i32, refresh: i32) -> EntityView {
    EntityView {
        name: name.to_string(),
        fate,
        refresh,
        aspects: Vec::new(),
        stress: BTreeMap::new(),
    }
}

pub fn with_stress(mut view: EntityView, track: &str, max: u32, checked: &[u32]) -> EntityView {
    view.stress.insert(
        track.to_string(),
        StressTrackView {
            max,
            checked: checked.to_vec(),
        },
    );
    view
}

pub fn snapshot(entities: &[EntityView]) -> GameSnapshot {
    GameSnapshot {
        entities: entities
            .iter()
            .map(|view| (view.name.clone(), view.clone()))
            .collect(),
        order: Default::default(),
    }
}

/// Services around the given ports with default settings.
pub fn services_with(
    backend: impl BackendPort + 'static,
    random: impl RandomPort + 'static,
) -> Services {
    Services {
        backend: Arc::new(backend),
        random: Arc::new(random),
        sessions: Arc::new(SessionStore::new()),
        settings: Arc::new(BotSettings::default()),
        shutdown: CancellationToken::new(),
        started_at: chrono::Utc::now(),
    }
}

pub fn services(backend: MockBackendPort) -> Services {
    services_with(backend, FixedRandom(0))
}

/// Services whose backend must not be called, plus their session store.
pub fn context_parts() -> (Services, Arc<SessionStore>) {
    let services = services(MockBackendPort::new());
    let sessions = Arc::clone(&services.sessions);
    (services, sessions)
}
