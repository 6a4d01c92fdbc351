//! Wire types for the game-tracking backend.
//!
//! The backend owns every entity, stress track and the turn order. The bot
//! only reads `GET /game` snapshots and sends `POST /commands` requests.
//!
//! ## Envelopes
//!
//! Both endpoints answer with an `{ ok, ... }` envelope. A command result may
//! itself be another `{ ok, result, description }` envelope (the backend
//! wraps its command layer's answer), so decoding unwraps nested envelopes
//! until it reaches a payload or a rejection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// GET /game
// =============================================================================

/// Raw `GET /game` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameEnvelope {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub entities: BTreeMap<String, EntityView>,
    #[serde(default)]
    pub order: OrderView,
}

impl GameEnvelope {
    /// `ok: false` means "no data available": an empty snapshot, not an error.
    pub fn into_snapshot(self) -> GameSnapshot {
        if !self.ok {
            return GameSnapshot::default();
        }
        GameSnapshot {
            entities: self.entities,
            order: self.order,
        }
    }
}

/// Game state as of one `GET /game` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub entities: BTreeMap<String, EntityView>,
    pub order: OrderView,
}

impl GameSnapshot {
    /// Entity by its canonical name.
    pub fn entity(&self, name: &str) -> Option<&EntityView> {
        self.entities.get(name)
    }
}

/// A tracked character, NPC or scene prop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub name: String,
    #[serde(default)]
    pub fate: i32,
    #[serde(default)]
    pub refresh: i32,
    #[serde(default)]
    pub aspects: Vec<AspectView>,
    #[serde(default)]
    pub stress: BTreeMap<String, StressTrackView>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AspectView {
    pub name: String,
    /// sticky, fragile or a consequence severity; absent for plain aspects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Free invocations stacked on the aspect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StressTrackView {
    pub max: u32,
    /// Zero-based indices of checked boxes
    #[serde(default)]
    pub checked: Vec<u32>,
}

/// Turn order state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    /// Acting order once started
    #[serde(default)]
    pub order: Vec<String>,
    /// Index into `order` of whoever is acting
    #[serde(default)]
    pub current: Option<usize>,
    /// Entities added before the order was started
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub deferred: Vec<String>,
}

impl OrderView {
    pub fn is_started(&self) -> bool {
        !self.order.is_empty()
    }

    pub fn current_entity(&self) -> Option<&str> {
        self.current
            .and_then(|index| self.order.get(index))
            .map(String::as_str)
    }
}

// =============================================================================
// POST /commands
// =============================================================================

/// Request body for `POST /commands`.
///
/// Command-specific fields travel as strings, the way the backend's form
/// layer expects them (`amount: "2"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            entity: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn field(mut self, key: &str, value: impl ToString) -> Self {
        self.fields.insert(key.to_string(), value.to_string());
        self
    }

    /// Add the field only when a value is present.
    pub fn optional_field(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }
}

/// Response body for `POST /commands`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fallback text when the backend rejects without a description.
pub const REJECTED_WITHOUT_DESCRIPTION: &str = "The game server rejected that command.";

/// Why an envelope did not yield a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The backend refused the command; the description is meant for players
    Rejected(String),
    /// A nested envelope could not be decoded
    Malformed(String),
}

impl CommandEnvelope {
    /// Unwrap nested envelopes down to the payload.
    pub fn into_payload(self) -> Result<CommandPayload, EnvelopeError> {
        let mut envelope = self;
        loop {
            if !envelope.ok {
                return Err(EnvelopeError::Rejected(
                    envelope
                        .description
                        .unwrap_or_else(|| REJECTED_WITHOUT_DESCRIPTION.to_string()),
                ));
            }
            match envelope.result {
                Some(value) if is_envelope(&value) => {
                    envelope = serde_json::from_value(value)
                        .map_err(|e| EnvelopeError::Malformed(e.to_string()))?;
                }
                Some(value) => return Ok(CommandPayload::from_value(value)),
                None => return Ok(CommandPayload::Empty),
            }
        }
    }
}

fn is_envelope(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.get("ok").is_some_and(Value::is_boolean))
}

/// What a successful command handed back.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandPayload {
    Entity(EntityView),
    Order(OrderView),
    Other(Value),
    Empty,
}

impl CommandPayload {
    pub fn from_value(value: Value) -> Self {
        let Some(object) = value.as_object() else {
            return if value.is_null() {
                CommandPayload::Empty
            } else {
                CommandPayload::Other(value)
            };
        };

        if object.contains_key("name") && object.contains_key("fate") {
            if let Ok(entity) = serde_json::from_value::<EntityView>(value.clone()) {
                return CommandPayload::Entity(entity);
            }
        }
        if object.get("order").is_some_and(Value::is_array) {
            if let Ok(order) = serde_json::from_value::<OrderView>(value.clone()) {
                return CommandPayload::Order(order);
            }
        }
        CommandPayload::Other(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_game_envelope_not_ok_is_empty() {
        let envelope: GameEnvelope =
            serde_json::from_value(json!({ "ok": false, "description": "no game" })).unwrap();
        assert_eq!(envelope.into_snapshot(), GameSnapshot::default());
    }

    #[test]
    fn test_game_envelope_decodes_entities_and_order() {
        let envelope: GameEnvelope = serde_json::from_value(json!({
            "ok": true,
            "entities": {
                "Weft": {
                    "name": "Weft", "fate": 3, "refresh": 3,
                    "aspects": [{ "name": "On Fire", "kind": "fragile", "tags": 1 }],
                    "stress": { "physical": { "max": 3, "checked": [1] } }
                }
            },
            "order": { "order": ["Weft"], "current": 0, "entities": [], "deferred": [] }
        }))
        .unwrap();
        let snapshot = envelope.into_snapshot();
        let weft = snapshot.entity("Weft").unwrap();
        assert_eq!(weft.aspects[0].tags, Some(1));
        assert_eq!(weft.stress["physical"].checked, vec![1]);
        assert_eq!(snapshot.order.current_entity(), Some("Weft"));
    }

    #[test]
    fn test_command_request_serializes_flat_string_fields() {
        let request = CommandRequest::new("increment_fp")
            .entity("Weft")
            .field("amount", 2);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "command": "increment_fp", "entity": "Weft", "amount": "2" })
        );
    }

    #[test]
    fn test_command_request_omits_missing_entity() {
        let request = CommandRequest::new("order_next").optional_field("kind", None::<&str>);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "command": "order_next" })
        );
    }

    #[test]
    fn test_nested_envelope_unwraps_to_entity() {
        let envelope: CommandEnvelope = serde_json::from_value(json!({
            "ok": true,
            "result": { "ok": true, "result": {
                "name": "Weft", "fate": 5, "refresh": 3, "stress": {}, "aspects": []
            }}
        }))
        .unwrap();
        match envelope.into_payload().unwrap() {
            CommandPayload::Entity(entity) => {
                assert_eq!(entity.name, "Weft");
                assert_eq!(entity.fate, 5);
            }
            other => panic!("expected entity payload, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_rejection_surfaces_description() {
        let envelope: CommandEnvelope = serde_json::from_value(json!({
            "ok": true,
            "result": { "ok": false, "description": "Weft has no fate points left" }
        }))
        .unwrap();
        assert_eq!(
            envelope.into_payload().unwrap_err(),
            EnvelopeError::Rejected("Weft has no fate points left".into())
        );
    }

    #[test]
    fn test_undecodable_nested_envelope_is_malformed() {
        let envelope: CommandEnvelope = serde_json::from_value(json!({
            "ok": true,
            "result": { "ok": true, "description": 5 }
        }))
        .unwrap();
        assert!(matches!(
            envelope.into_payload(),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejection_without_description() {
        let envelope = CommandEnvelope {
            ok: false,
            result: None,
            description: None,
        };
        assert_eq!(
            envelope.into_payload().unwrap_err(),
            EnvelopeError::Rejected(REJECTED_WITHOUT_DESCRIPTION.into())
        );
    }

    #[test]
    fn test_order_payload() {
        let payload = CommandPayload::from_value(json!({
            "order": ["Weft", "Warp"], "current": 1, "entities": [], "deferred": ["Loom"]
        }));
        match payload {
            CommandPayload::Order(order) => assert_eq!(order.current_entity(), Some("Warp")),
            other => panic!("expected order payload, got {:?}", other),
        }
    }

    #[test]
    fn test_other_and_empty_payloads() {
        assert_eq!(CommandPayload::from_value(Value::Null), CommandPayload::Empty);
        assert_eq!(
            CommandPayload::from_value(json!("removed")),
            CommandPayload::Other(json!("removed"))
        );
    }
}
