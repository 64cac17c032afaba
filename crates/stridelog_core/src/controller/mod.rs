//! Use-case orchestration between the store, persistence and the UI.
//!
//! # Responsibility
//! - Own form-mode state and the validation boundary.
//! - Keep storage/UI collaborators behind injected traits.

pub mod ports;
pub mod workout_controller;
