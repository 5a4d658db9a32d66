//! Domain entities - Core business objects with identity

mod pet_state;

pub use pet_state::{PetState, INITIAL_THOUGHT};
