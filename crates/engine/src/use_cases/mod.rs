//! Use cases - User story orchestration.

pub mod pet;

pub use pet::{ChatOutcome, PetService};
