//! Value objects - Immutable objects defined by their attributes

mod action;
mod mood;
mod position;
mod reply;

pub use action::Action;
pub use mood::Mood;
pub use position::{Position, PositionBounds};
pub use reply::StructuredReply;
