//! Whiskers Domain - the pet, its vocabulary, and the fold.
//!
//! Pure types with no I/O. The engine owns the single [`PetState`]
//! instance; everything here is about keeping it valid.

pub mod entities;
pub mod error;
pub mod value_objects;

pub use entities::{PetState, INITIAL_THOUGHT};
pub use error::DomainError;
pub use value_objects::{Action, Mood, Position, PositionBounds, StructuredReply};
