//! Fatebot Shared - wire contracts between the bot and its collaborators
//!
//! This crate contains the types exchanged with:
//! - the game-tracking backend (`GET /game`, `POST /commands`)
//! - the chat-platform gateway (inbound `ChatMessage`, outbound `Reply`)
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and serde_json
//! 2. **No business logic** - Pure data types and envelope decoding
//! 3. **Lenient decoding** - Missing optional fields default instead of failing

pub mod backend;
pub mod chat;

pub use backend::{
    AspectView, CommandEnvelope, CommandPayload, CommandRequest, EntityView, EnvelopeError,
    GameEnvelope, GameSnapshot, OrderView, StressTrackView, REJECTED_WITHOUT_DESCRIPTION,
};
pub use chat::{Attachment, ChatMessage, MentionTarget, MessageResponse, Reply};
