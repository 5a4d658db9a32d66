//! Whiskers Engine library.
//!
//! Server side of the virtual pet: one shared pet, chat through a language
//! model (or offline keywords), results pushed to every websocket subscriber.
//!
//! ## Structure
//!
//! - `use_cases/` - The pet service, responders, and reply repair
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP and WebSocket entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
