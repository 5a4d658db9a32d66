//! Whiskers Protocol - Shared types for the backend and its clients
//!
//! This crate contains all types that cross the process boundary:
//! - Wire-format DTOs (REST + WebSocket)
//! - WebSocket message types (ClientMessage, ServerMessage)
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json, chrono and the domain vocabulary
//! 2. **No business logic** - Pure data types and serialization

pub mod dto;
pub mod messages;

pub use dto::{ChatReplyData, ChatRequest, ErrorData, HealthData, PetStateData, PositionData};
pub use messages::{ClientMessage, ServerMessage};
