//! Room coordinator for terakoya, a collaborative code editor.
//!
//! Participants share one code buffer, one language selection, a chat log,
//! a mutual-exclusion typing lock, and a run-output channel per room. This
//! crate owns the per-room state, serializes mutations, and fans consistent
//! updates out to every connected participant over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
