//! Domain models for the task list.
//!
//! # Core Concepts
//!
//! - [`Task`]: The persisted entity. Owned by the store; the client only reads
//!   it and mutates it through submitted intents addressed by [`TaskId`].
//! - [`Fields`]: The untyped field map a client submits. Every mutation enters
//!   the system in this shape and is validated before it touches the store.

mod fields;
mod task;

pub use fields::*;
pub use task::*;
