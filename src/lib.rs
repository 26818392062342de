//! A single-list task tracker.
//!
//! Clients submit intents as untyped field maps. The [`dispatch`] layer
//! validates them and applies exactly one store write each; the
//! [`controller`] layer tracks, per row, whether a mutation is in flight and
//! which single row is being edited, and re-reads the whole list after every
//! successful mutation.

pub mod api;
pub mod client;
pub mod config;
pub mod controller;
pub mod db;
pub mod dispatch;
pub mod models;
pub mod store;
pub mod validation;
pub mod view;
