//! Game system vocabulary.
//!
//! Only FATE Core is tracked by the backend this bot talks to.

mod fate_core;

pub use fate_core::{AspectKind, ConsequenceSeverity, LadderRating};
